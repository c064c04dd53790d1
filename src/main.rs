use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brightlens_news::config::Config;
use brightlens_news::fetcher::Fetcher;
use brightlens_news::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brightlens_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("BRIGHTLENS_CONFIG").unwrap_or_else(|_| "providers.toml".to_string());
    let config = Config::load(&config_path)?;
    info!(
        "Loaded configuration from {} (cache ttl {}s, deadline {}s)",
        config_path, config.cache_ttl_secs, config.aggregate_timeout_secs
    );

    let fetcher = Arc::new(Fetcher::from_config(&config));
    let state = Arc::new(AppState { fetcher });

    let app = routes::router(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    info!("Server starting on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
