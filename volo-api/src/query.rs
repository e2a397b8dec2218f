use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use volo_core::repository::OfferRepository;
use volo_core::search::{ListQuery, SearchCriteria};
use volo_core::source::OfferSource;
use volo_core::{CoreError, CoreResult};
use volo_offer::pricing::round_to;
use volo_shared::{sort_by_discount_desc, ListedOffer, OfferKind};

/// Result of a live search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub search_id: Uuid,
    pub offers: Vec<ListedOffer>,
    pub timestamp: DateTime<Utc>,
}

/// Stored offers for a listing. `total` counts matches before the limit is applied.
#[derive(Debug)]
pub struct OfferPage {
    pub total: usize,
    pub offers: Vec<ListedOffer>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OfferStats {
    pub total_offers: u64,
    pub flight_offers: u64,
    pub cruise_offers: u64,
    pub flight_avg_discount: f64,
    pub cruise_avg_discount: f64,
    pub max_flight_discount: f64,
    pub max_cruise_discount: f64,
}

/// Search, list and statistics over offers.
///
/// Search always goes to the source; list and stats only ever read the store.
pub struct QueryService {
    repo: Arc<dyn OfferRepository>,
    source: Arc<dyn OfferSource>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn OfferRepository>, source: Arc<dyn OfferSource>) -> Self {
        Self { repo, source }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> CoreResult<SearchOutcome> {
        let search_id = Uuid::new_v4();
        let mut offers = Vec::new();

        if criteria.offer_type.includes(OfferKind::Flight) {
            let flights = self.source.fetch_flights(search_id, &criteria.route()).await?;
            offers.extend(
                flights
                    .into_iter()
                    .filter(|f| f.discount_percentage >= criteria.min_discount)
                    .map(ListedOffer::from),
            );
        }

        if criteria.offer_type.includes(OfferKind::Cruise) {
            let cruises = self.source.fetch_cruises(search_id).await?;
            offers.extend(
                cruises
                    .into_iter()
                    .filter(|c| c.discount_percentage >= criteria.min_discount)
                    .map(ListedOffer::from),
            );
        }

        sort_by_discount_desc(&mut offers);
        tracing::info!(%search_id, results = offers.len(), "Live search completed");

        Ok(SearchOutcome {
            search_id,
            offers,
            timestamp: Utc::now(),
        })
    }

    pub async fn list(&self, query: &ListQuery) -> CoreResult<OfferPage> {
        let mut offers = Vec::new();

        if query.offer_type.includes(OfferKind::Flight) {
            let flights = self
                .repo
                .find_flights(query.min_discount, query.limit)
                .await
                .map_err(store_error)?;
            offers.extend(flights.into_iter().map(ListedOffer::from));
        }

        if query.offer_type.includes(OfferKind::Cruise) {
            let cruises = self
                .repo
                .find_cruises(query.min_discount, query.limit)
                .await
                .map_err(store_error)?;
            offers.extend(cruises.into_iter().map(ListedOffer::from));
        }

        sort_by_discount_desc(&mut offers);
        let total = offers.len();
        offers.truncate(query.limit);
        Ok(OfferPage { total, offers })
    }

    pub async fn stats(&self) -> CoreResult<OfferStats> {
        let flight_offers = self.repo.count(OfferKind::Flight).await.map_err(store_error)?;
        let cruise_offers = self.repo.count(OfferKind::Cruise).await.map_err(store_error)?;
        let flight = self.repo.discount_stats(OfferKind::Flight).await.map_err(store_error)?;
        let cruise = self.repo.discount_stats(OfferKind::Cruise).await.map_err(store_error)?;

        Ok(OfferStats {
            total_offers: flight_offers + cruise_offers,
            flight_offers,
            cruise_offers,
            flight_avg_discount: rounded(flight.avg),
            cruise_avg_discount: rounded(cruise.avg),
            max_flight_discount: rounded(flight.max),
            max_cruise_discount: rounded(cruise.max),
        })
    }
}

fn rounded(value: Option<f64>) -> f64 {
    value.map(|v| round_to(v, 1)).unwrap_or(0.0)
}

fn store_error(err: Box<dyn std::error::Error + Send + Sync>) -> CoreError {
    CoreError::StoreError(err.to_string())
}
