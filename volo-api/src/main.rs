use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volo_api::{app, worker, AppState};
use volo_core::repository::OfferRepository;
use volo_core::source::OfferSource;
use volo_offer::{AcceptAll, AuthenticityValidator, ChatClassifier, ScraperConfig, SimulatedScraper};
use volo_store::app_config::Config;
use volo_store::{DbClient, InMemoryOfferRepository, PostgresOfferRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volo_api=debug,volo_store=info,volo_offer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Volo API on port {}", config.server.port);

    // Offer store
    let (repo, db): (Arc<dyn OfferRepository>, Option<DbClient>) = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await?;
            (Arc::new(PostgresOfferRepository::new(db.pool.clone())), Some(db))
        }
        None => {
            tracing::warn!("No database url configured, keeping offers in memory");
            (Arc::new(InMemoryOfferRepository::new()), None)
        }
    };

    // Authenticity classifier
    let validator: Arc<dyn AuthenticityValidator> = match &config.validation.api_key {
        Some(key) => Arc::new(ChatClassifier::new(
            &config.validation.base_url,
            key,
            &config.validation.model,
            Duration::from_secs(config.validation.timeout_seconds),
        )?),
        None => Arc::new(AcceptAll),
    };

    let scraper_config = ScraperConfig {
        request_delay: Duration::from_millis(config.scraper.request_delay_ms),
        round_trip_probability: config.scraper.round_trip_probability.clamp(0.0, 1.0),
        ..ScraperConfig::default()
    };
    let source: Arc<dyn OfferSource> = Arc::new(SimulatedScraper::new(scraper_config, validator));

    // Initial refresh, then hourly
    let retention = config
        .refresh
        .retention()
        .context("refresh.retention_hours out of range")?;
    let cycle = Arc::new(worker::RefreshCycle::new(repo.clone(), source.clone(), retention));
    cycle.tick().await;
    let refresh_handle = worker::spawn_refresh_worker(cycle, config.refresh.interval());

    let app = app(AppState::new(repo, source), &config.cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    refresh_handle.abort();
    if let Some(db) = db {
        db.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
