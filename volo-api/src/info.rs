use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/health", get(health))
        .route("/api/scraping-info", get(scraping_info))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Volo API - Travel Deals Aggregator" }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "scraping_method": "direct_web_scraping",
    }))
}

async fn scraping_info(State(state): State<AppState>) -> Json<Value> {
    let sources = state.source.describe();

    Json(json!({
        "flight_sources": {
            "total": sources.airlines.len(),
            "airlines": sources.airlines,
        },
        "cruise_sources": {
            "total": sources.cruise_lines.len(),
            "cruise_lines": sources.cruise_lines,
        },
        "update_frequency": "hourly",
    }))
}
