use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

pub const MAX_DESCRIPTION_LEN: usize = 300;
pub const MIN_DESCRIPTION_LEN: usize = 50;

pub const STOCK_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1495020689067-958852a7765e?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1586281380349-632531db7ed4?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1563986768609-322da13575f3?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1611224923853-80b023f02d71?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1557804506-669a67965ba0?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1584464491033-06628f3a6b7b?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
    "https://images.unsplash.com/photo-1588681664899-f142ff2dc9b1?w=800&h=600&fit=crop&crop=entropy&cs=tinysrgb&q=80",
];

const FILLER_SENTENCES: &[&str] = &[
    "Stay informed with this latest news story covering important developments and updates.",
    "This breaking news report provides comprehensive coverage of recent events and their impact.",
    "Get the latest updates on this developing story with detailed information and analysis.",
    "Read about the latest developments in this important news story affecting our community.",
    "Comprehensive coverage of this significant news event with expert analysis and updates.",
    "Important news update covering key developments and their implications for the future.",
    "Breaking news coverage providing detailed information about this developing situation.",
    "Latest news report with comprehensive details about this important story.",
    "Stay updated with this significant news development and its potential impact.",
    "Detailed coverage of this important news story with the latest information and updates.",
];

const IMAGE_PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "no-image", "noimage", "default-image"];

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)This article has been reviewed according to Science X's editorial process and policies.*?Editors have highlighted the following attribute.*?:",
        r"(?i)This article has been reviewed according to.*?editorial process.*?:",
        r"(?i)Editors have highlighted the following attribute.*?:",
        r"(?i)The following article was published.*?:",
        r"(?i)Read more\s*\.{3,}",
        r"(?i)Continue reading.*$",
        r"(?i)Source:.*$",
        r"\[[^\]]*\]$",
        r"^\s*\.\.\.\s*",
        r"\s*\.\.\.\s*$",
        r"(?i)Click here to read more",
        r"(?i)Read full article",
        r"(?i)Visit.*?for more",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// RNG seeded from the article URL so the same upstream article always
/// gets the same stock image and filler sentence.
pub fn article_rng(url: &str) -> StdRng {
    let seed = url
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    StdRng::seed_from_u64(seed)
}

pub fn clean_description<R: Rng>(raw: Option<&str>, rng: &mut R) -> String {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return filler_sentence(rng).to_string(),
    };

    let mut text = HTML_TAG.replace_all(raw, " ").into_owned();
    text = decode_entities(&text);
    for pattern in BOILERPLATE.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    let mut text = WHITESPACE.replace_all(&text, " ").trim().to_string();

    if text.chars().count() < MIN_DESCRIPTION_LEN {
        return filler_sentence(rng).to_string();
    }

    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }

    if text.chars().count() > MAX_DESCRIPTION_LEN {
        let mut cut: String = text.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
        cut.push_str("...");
        text = cut;
    }

    text
}

pub fn filler_sentence<R: Rng>(rng: &mut R) -> &'static str {
    FILLER_SENTENCES[rng.random_range(0..FILLER_SENTENCES.len())]
}

/// Keep an upstream image only if it is an absolute http(s) URL that does
/// not look like placeholder artwork; otherwise pick from the stock pool.
pub fn validate_image<R: Rng>(candidate: Option<&str>, rng: &mut R) -> String {
    if let Some(candidate) = candidate.map(str::trim) {
        if is_usable_image(candidate) {
            return candidate.to_string();
        }
    }
    stock_image(rng).to_string()
}

pub fn stock_image<R: Rng>(rng: &mut R) -> &'static str {
    STOCK_IMAGES[rng.random_range(0..STOCK_IMAGES.len())]
}

fn is_usable_image(candidate: &str) -> bool {
    let parsed = match url::Url::parse(candidate) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return false;
    }
    let lower = candidate.to_lowercase();
    !IMAGE_PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8217;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
