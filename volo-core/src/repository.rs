use async_trait::async_trait;
use chrono::{DateTime, Utc};
use volo_shared::{CruiseOffer, FlightOffer, OfferKind};

use crate::search::DiscountStats;

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for the two offer collections.
///
/// Flight and cruise collections are independent: no operation spans both,
/// and each call is atomic on its own collection only.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn insert_flights(&self, offers: &[FlightOffer]) -> RepoResult<u64>;

    async fn insert_cruises(&self, offers: &[CruiseOffer]) -> RepoResult<u64>;

    /// Flights with `discount_percentage >= min_discount`, highest discount first.
    async fn find_flights(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<FlightOffer>>;

    /// Cruises with `discount_percentage >= min_discount`, highest discount first.
    async fn find_cruises(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<CruiseOffer>>;

    async fn count(&self, kind: OfferKind) -> RepoResult<u64>;

    /// Average and maximum discount; both `None` when the collection is empty.
    async fn discount_stats(&self, kind: OfferKind) -> RepoResult<DiscountStats>;

    /// Remove offers created strictly before `cutoff`, returning how many went.
    async fn delete_older_than(&self, kind: OfferKind, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}
