use axum::{http::HeaderValue, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use volo_store::app_config::CorsConfig;

pub mod error;
pub mod info;
pub mod offers;
pub mod query;
pub mod search;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(info::routes())
        .merge(search::routes())
        .merge(offers::routes())
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<&str> = config.origins.split(',').map(str::trim).filter(|o| !o.is_empty()).collect();

    let allow_origin = if origins.is_empty() || origins.contains(&"*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
