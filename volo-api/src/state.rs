use std::sync::Arc;
use volo_core::repository::OfferRepository;
use volo_core::source::OfferSource;

use crate::query::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub source: Arc<dyn OfferSource>,
}

impl AppState {
    pub fn new(repo: Arc<dyn OfferRepository>, source: Arc<dyn OfferSource>) -> Self {
        Self {
            query: Arc::new(QueryService::new(repo, source.clone())),
            source,
        }
    }
}
