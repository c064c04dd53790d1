use chrono::{Duration, Utc};
use rand::Rng;

use crate::article::{Article, Category};
use crate::dedup;
use crate::normalize::STOCK_IMAGES;

/// Upper bound for the random age given to each fallback article.
pub const MAX_AGE_SECS: i64 = 3600;

const BASE_URL: &str = "https://brightlens.news/briefs";

struct Topic {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
}

const fn topic(slug: &'static str, title: &'static str, description: &'static str) -> Topic {
    Topic {
        slug,
        title,
        description,
    }
}

const LATEST: &[Topic] = &[
    topic(
        "climate-summit",
        "Global Climate Summit Reaches Historic Agreement",
        "World leaders agree on ambitious climate targets for 2030, marking a significant step forward in environmental protection.",
    ),
    topic(
        "quantum-computing",
        "Tech Innovation Breakthrough in Quantum Computing",
        "Researchers achieve a new milestone in quantum computing that could change how large datasets are processed.",
    ),
    topic(
        "trade-relations",
        "International Trade Relations Show Positive Trends",
        "Economic indicators suggest improving trade relationships between major global markets after a turbulent year.",
    ),
    topic(
        "medical-discovery",
        "Revolutionary Medical Discovery Changes Treatment Approach",
        "Scientists develop a therapeutic method showing remarkable success against conditions once considered incurable.",
    ),
    topic(
        "mars-water",
        "Space Mission Finds Potential Water Sources on Mars",
        "Rover findings suggest underground water reservoirs that could one day support crewed missions to the red planet.",
    ),
    topic(
        "ocean-cleanup",
        "Ocean Cleanup Technology Shows Remarkable Results",
        "Advanced filtration systems remove large volumes of plastic from coastal waters during their first full season.",
    ),
];

const KENYA: &[Topic] = &[
    topic(
        "economy-recovery",
        "Kenya's Economy Shows Strong Recovery Signs",
        "Economic indicators show promising growth in agriculture and manufacturing, boosting investor confidence.",
    ),
    topic(
        "education-reforms",
        "Education Reforms Launch Across Kenyan Schools",
        "The government rolls out education reforms aimed at improving learning outcomes and reducing inequalities.",
    ),
    topic(
        "rural-connectivity",
        "Infrastructure Development Boosts Rural Connectivity",
        "New road and digital infrastructure projects link remote areas to major economic centres.",
    ),
    topic(
        "universal-coverage",
        "Healthcare Access Improves with Universal Coverage",
        "Expanded facilities and services bring medical care closer to underserved communities across the country.",
    ),
    topic(
        "tourism-rebound",
        "Tourism Sector Recovery Exceeds Expectations",
        "Visitor numbers rebound strongly as the tourism industry benefits from improved marketing and infrastructure.",
    ),
    topic(
        "silicon-savannah",
        "Nairobi Tech Hub Attracts Global Investment",
        "The Silicon Savannah continues to draw international technology companies and startups to the capital.",
    ),
];

const WORLD: &[Topic] = &[
    topic(
        "security-summit",
        "Leaders Gather for Regional Security Summit",
        "Heads of state meet to discuss border security, trade corridors and a shared response to humanitarian crises.",
    ),
    topic(
        "aid-corridor",
        "Humanitarian Aid Corridor Opens After Talks",
        "Negotiators agree on safe passage for relief convoys carrying food and medicine to displaced families.",
    ),
    topic(
        "election-results",
        "Election Observers Praise Peaceful Vote",
        "International monitors report an orderly process and high turnout across polling stations nationwide.",
    ),
    topic(
        "heritage-preservation",
        "Cultural Heritage Preservation Initiative Expands",
        "A new programme will digitally preserve some of the world's most endangered cultural sites and archives.",
    ),
    topic(
        "migration-pact",
        "New Migration Pact Signed by Neighbouring States",
        "The agreement sets shared rules for asylum processing and seasonal work permits across the region.",
    ),
];

const TECHNOLOGY: &[Topic] = &[
    topic(
        "ai-ethics",
        "Artificial Intelligence Ethics Framework Established",
        "An international consortium publishes guidelines for responsible development and deployment of AI systems.",
    ),
    topic(
        "mobile-money",
        "Mobile Money Platform Expands Cross-Border Payments",
        "Users can now send funds to neighbouring countries instantly, with lower fees for small transfers.",
    ),
    topic(
        "chip-battery",
        "New Chip Design Promises Longer Battery Life",
        "A manufacturer unveils a processor architecture that cuts power draw for phones and laptops.",
    ),
    topic(
        "cybersecurity-alert",
        "Cybersecurity Agencies Warn of Phishing Campaign",
        "Officials urge businesses to update credentials after a wave of targeted attacks on email accounts.",
    ),
    topic(
        "open-source-release",
        "Open Source Project Ships Major Release",
        "The community behind a popular developer toolkit releases faster builds and a redesigned plugin system.",
    ),
];

const BUSINESS: &[Topic] = &[
    topic(
        "rates-steady",
        "Central Bank Holds Interest Rates Steady",
        "Policymakers left the benchmark rate unchanged, citing easing inflation and a stable currency.",
    ),
    topic(
        "economic-momentum",
        "Global Economic Recovery Shows Momentum",
        "Markets demonstrate resilience as employment rates improve across several major economies.",
    ),
    topic(
        "sme-lending",
        "Small Business Lending Reaches Record High",
        "Banks report strong demand for credit from small and medium enterprises expanding into new markets.",
    ),
    topic(
        "export-growth",
        "Horticulture Exports Climb on Strong Demand",
        "Flower and avocado shipments rise as producers secure new buyers in Europe and the Middle East.",
    ),
    topic(
        "stock-rally",
        "Stock Market Rally Lifts Banking Shares",
        "Investors returned to financial stocks after quarterly earnings beat analyst expectations.",
    ),
];

const HEALTH: &[Topic] = &[
    topic(
        "vaccine-rollout",
        "Vaccination Drive Reaches Remote Communities",
        "Mobile clinics deliver routine immunisations to families living far from permanent health facilities.",
    ),
    topic(
        "mental-health",
        "Mental Health Services Expand in Public Hospitals",
        "New counselling units open in county hospitals as demand for psychological support continues to grow.",
    ),
    topic(
        "malaria-research",
        "Researchers Report Progress on Malaria Treatment",
        "Clinical trial results point to a shorter course of therapy with fewer side effects for young children.",
    ),
    topic(
        "fitness-study",
        "Study Links Daily Walking to Longer Life",
        "Scientists find that moderate daily activity significantly lowers the risk of heart disease in adults.",
    ),
    topic(
        "nutrition-guidelines",
        "Updated Nutrition Guidelines Focus on Whole Foods",
        "Health authorities recommend more vegetables and fewer processed snacks in school meal programmes.",
    ),
];

const ENTERTAINMENT: &[Topic] = &[
    topic(
        "film-festival",
        "Film Festival Celebrates African Storytelling",
        "Directors from across the continent premiere features and documentaries to sold-out audiences.",
    ),
    topic(
        "streaming-originals",
        "Streaming Service Commissions Local Originals",
        "A global platform announces a slate of new series produced in Nairobi and Lagos.",
    ),
    topic(
        "concert-tour",
        "Award-Winning Musician Announces Stadium Tour",
        "The chart-topping artist will perform in eight cities, with tickets going on sale next week.",
    ),
    topic(
        "theatre-revival",
        "Classic Play Returns to the National Theatre",
        "A new production reimagines the beloved drama with an all-star cast and contemporary staging.",
    ),
    topic(
        "music-awards",
        "Nominees Unveiled for Annual Music Awards",
        "Emerging artists feature prominently alongside established stars in this year's list of nominees.",
    ),
];

const SPORTS: &[Topic] = &[
    topic(
        "marathon-record",
        "Marathon Record Falls in Berlin",
        "A Kenyan runner shaved seconds off the course record in near-perfect racing conditions.",
    ),
    topic(
        "league-title",
        "Title Race Tightens After Weekend Fixtures",
        "Only two points separate the top three clubs with five rounds of the season remaining.",
    ),
    topic(
        "rugby-sevens",
        "Rugby Sevens Squad Named for World Series",
        "The coach blends experienced campaigners with young talent ahead of the opening tournament.",
    ),
    topic(
        "olympic-preparations",
        "Olympic Preparations Intensify at Training Camps",
        "Athletes step up high-altitude sessions as qualification deadlines for the games approach.",
    ),
    topic(
        "transfer-window",
        "Transfer Window Closes With Late Signings",
        "Clubs completed a flurry of deadline-day deals to strengthen their squads for the second half.",
    ),
];

fn topics(category: Category) -> &'static [Topic] {
    match category {
        Category::Latest => LATEST,
        Category::Kenya => KENYA,
        Category::World => WORLD,
        Category::Technology => TECHNOLOGY,
        Category::Business => BUSINESS,
        Category::Health => HEALTH,
        Category::Entertainment => ENTERTAINMENT,
        Category::Sports => SPORTS,
    }
}

/// Source label stamped on fallback articles.
pub fn source_label(category: Category) -> &'static str {
    match category {
        Category::Latest => "Live News Feed",
        Category::Kenya => "Kenya News Live",
        Category::World => "World News Live",
        Category::Technology => "Tech News Live",
        Category::Business => "Business News Live",
        Category::Health => "Health News Live",
        Category::Entertainment => "Entertainment Live",
        Category::Sports => "Sports News Live",
    }
}

/// Build the fallback set for `category`. Each article is dated up to an
/// hour in the past using `rng`, then the set goes through the same
/// dedupe and ordering as live results.
pub fn fallback<R: Rng>(category: Category, source: &str, rng: &mut R) -> Vec<Article> {
    let now = Utc::now();
    let articles = topics(category)
        .iter()
        .enumerate()
        .map(|(i, topic)| Article {
            title: topic.title.to_string(),
            description: topic.description.to_string(),
            url: format!("{}/{}/{}", BASE_URL, category.as_str(), topic.slug),
            image_url: STOCK_IMAGES[i % STOCK_IMAGES.len()].to_string(),
            published_at: Some(now - Duration::seconds(rng.random_range(0..=MAX_AGE_SECS))),
            source: source.to_string(),
            category,
        })
        .collect();

    dedup::finalize(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn content(articles: &[Article]) -> BTreeSet<(String, String, String)> {
        articles
            .iter()
            .map(|a| (a.title.clone(), a.description.clone(), a.url.clone()))
            .collect()
    }

    #[test]
    fn test_every_category_is_non_empty_after_dedupe() {
        let mut rng = StdRng::seed_from_u64(1);
        for category in Category::ALL {
            let articles = fallback(category, source_label(category), &mut rng);
            assert_eq!(
                articles.len(),
                topics(category).len(),
                "fallback topics for {category} collapsed in dedupe"
            );
            assert!(articles.iter().all(|a| a.category == category));
        }
    }

    #[test]
    fn test_content_is_stable_across_calls() {
        let first = fallback(Category::Kenya, "Kenya News Live", &mut StdRng::seed_from_u64(7));
        let second = fallback(Category::Kenya, "Kenya News Live", &mut StdRng::seed_from_u64(99));
        assert_eq!(content(&first), content(&second));
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = fallback(Category::Sports, "Sports News Live", &mut StdRng::seed_from_u64(3));
        let b = fallback(Category::Sports, "Sports News Live", &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_newest_first_within_the_last_hour() {
        let now = Utc::now();
        let articles = fallback(
            Category::Business,
            "Business News Live",
            &mut StdRng::seed_from_u64(5),
        );
        for pair in articles.windows(2) {
            assert!(pair[0].sort_key() >= pair[1].sort_key());
        }
        for a in &articles {
            let age = now - a.published_at.unwrap();
            assert!(age <= Duration::seconds(MAX_AGE_SECS + 5));
        }
    }

    #[test]
    fn test_output_is_already_deduplicated() {
        let articles = fallback(Category::World, "World News Live", &mut StdRng::seed_from_u64(11));
        assert_eq!(dedup::dedupe(articles.clone()), articles);
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(source_label(Category::Kenya), "Kenya News Live");
        assert_eq!(source_label(Category::Latest), "Live News Feed");
        let articles = fallback(
            Category::Health,
            source_label(Category::Health),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(articles.iter().all(|a| a.source == "Health News Live"));
    }
}
