use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use volo_core::search::SearchCriteria;
use volo_shared::ListedOffer;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search_id: Uuid,
    pub total_results: usize,
    pub offers: Vec<ListedOffer>,
    pub timestamp: DateTime<Utc>,
    pub data_source: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/search", post(search_offers))
}

/// POST /api/search
/// Live search: offers come straight from the source, never from the store.
pub async fn search_offers(
    State(state): State<AppState>,
    Json(criteria): Json<SearchCriteria>,
) -> Result<Json<SearchResponse>, AppError> {
    criteria.validate()?;

    let outcome = state.query.search(&criteria).await?;

    Ok(Json(SearchResponse {
        search_id: outcome.search_id,
        total_results: outcome.offers.len(),
        offers: outcome.offers,
        timestamp: outcome.timestamp,
        data_source: "live_web_scraping",
    }))
}
