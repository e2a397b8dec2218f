use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use volo_core::search::ListQuery;
use volo_shared::ListedOffer;

use crate::error::AppError;
use crate::query::OfferStats;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OfferListResponse {
    pub total: usize,
    pub offers: Vec<ListedOffer>,
    pub data_source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScrapingTargets {
    pub airlines: usize,
    pub cruise_lines: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: OfferStats,
    pub data_source: &'static str,
    pub scraping_targets: ScrapingTargets,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/offers", get(list_offers))
        .route("/api/stats", get(get_stats))
}

/// GET /api/offers
/// Stored offers above a discount threshold, highest discount first.
pub async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<OfferListResponse>, AppError> {
    query.validate()?;

    let page = state.query.list(&query).await?;

    Ok(Json(OfferListResponse {
        total: page.total,
        offers: page.offers,
        data_source: "web_scraped_data",
    }))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.query.stats().await?;
    let sources = state.source.describe();

    Ok(Json(StatsResponse {
        stats,
        data_source: "web_scraping",
        scraping_targets: ScrapingTargets {
            airlines: sources.airlines.len(),
            cruise_lines: sources.cruise_lines.len(),
        },
    }))
}
