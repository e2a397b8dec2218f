use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use volo_core::repository::{OfferRepository, RepoResult};
use volo_core::search::DiscountStats;
use volo_shared::{CruiseOffer, FlightOffer, OfferKind};

/// Process-local offer store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryOfferRepository {
    flights: RwLock<Vec<FlightOffer>>,
    cruises: RwLock<Vec<CruiseOffer>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn top_by_discount<T: Clone>(offers: &[T], discount: impl Fn(&T) -> f64, min_discount: f64, limit: usize) -> Vec<T> {
    let mut matching: Vec<T> = offers.iter().filter(|o| discount(*o) >= min_discount).cloned().collect();
    matching.sort_by(|a, b| discount(b).total_cmp(&discount(a)));
    matching.truncate(limit);
    matching
}

fn stats_of(discounts: impl Iterator<Item = f64>) -> DiscountStats {
    let (count, sum, max) = discounts.fold((0usize, 0.0, f64::MIN), |(n, s, m), d| (n + 1, s + d, m.max(d)));
    if count == 0 {
        return DiscountStats::default();
    }
    DiscountStats {
        avg: Some(sum / count as f64),
        max: Some(max),
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn insert_flights(&self, offers: &[FlightOffer]) -> RepoResult<u64> {
        self.flights.write().await.extend_from_slice(offers);
        Ok(offers.len() as u64)
    }

    async fn insert_cruises(&self, offers: &[CruiseOffer]) -> RepoResult<u64> {
        self.cruises.write().await.extend_from_slice(offers);
        Ok(offers.len() as u64)
    }

    async fn find_flights(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<FlightOffer>> {
        let flights = self.flights.read().await;
        Ok(top_by_discount(&flights, |f| f.discount_percentage, min_discount, limit))
    }

    async fn find_cruises(&self, min_discount: f64, limit: usize) -> RepoResult<Vec<CruiseOffer>> {
        let cruises = self.cruises.read().await;
        Ok(top_by_discount(&cruises, |c| c.discount_percentage, min_discount, limit))
    }

    async fn count(&self, kind: OfferKind) -> RepoResult<u64> {
        let count = match kind {
            OfferKind::Flight => self.flights.read().await.len(),
            OfferKind::Cruise => self.cruises.read().await.len(),
        };
        Ok(count as u64)
    }

    async fn discount_stats(&self, kind: OfferKind) -> RepoResult<DiscountStats> {
        let stats = match kind {
            OfferKind::Flight => stats_of(self.flights.read().await.iter().map(|f| f.discount_percentage)),
            OfferKind::Cruise => stats_of(self.cruises.read().await.iter().map(|c| c.discount_percentage)),
        };
        Ok(stats)
    }

    async fn delete_older_than(&self, kind: OfferKind, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let removed = match kind {
            OfferKind::Flight => {
                let mut flights = self.flights.write().await;
                let before = flights.len();
                flights.retain(|f| f.created_at >= cutoff);
                before - flights.len()
            }
            OfferKind::Cruise => {
                let mut cruises = self.cruises.write().await;
                let before = cruises.len();
                cruises.retain(|c| c.created_at >= cutoff);
                before - cruises.len()
            }
        };
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn flight(discount: f64, created_at: DateTime<Utc>) -> FlightOffer {
        FlightOffer {
            id: Uuid::new_v4(),
            source_api: "scraped_delta".to_string(),
            search_id: Uuid::new_v4(),
            departure_airport: "JFK".to_string(),
            arrival_airport: "LAX".to_string(),
            departure_date: created_at + Duration::days(10),
            return_date: None,
            airline: "Delta".to_string(),
            flight_number: "DL123".to_string(),
            original_price: 1000.0,
            current_price: 1000.0 * (1.0 - discount / 100.0),
            discount_percentage: discount,
            stops: 0,
            duration_minutes: 320,
            booking_link: "https://www.delta.com/booking/x".to_string(),
            is_authentic: true,
            validation_timestamp: created_at,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_find_filters_sorts_and_limits() {
        let repo = InMemoryOfferRepository::new();
        let now = Utc::now();
        let offers: Vec<FlightOffer> = [55.0, 72.5, 61.0, 90.1, 49.9].iter().map(|d| flight(*d, now)).collect();
        repo.insert_flights(&offers).await.unwrap();

        let found = repo.find_flights(60.0, 2).await.unwrap();
        let discounts: Vec<f64> = found.iter().map(|f| f.discount_percentage).collect();
        assert_eq!(discounts, vec![90.1, 72.5]);

        let all = repo.find_flights(50.0, 100).await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].discount_percentage >= w[1].discount_percentage));
    }

    #[tokio::test]
    async fn test_empty_stats_are_none() {
        let repo = InMemoryOfferRepository::new();
        assert_eq!(repo.count(OfferKind::Cruise).await.unwrap(), 0);
        assert_eq!(repo.discount_stats(OfferKind::Cruise).await.unwrap(), DiscountStats::default());
    }

    #[tokio::test]
    async fn test_stats_average_and_max() {
        let repo = InMemoryOfferRepository::new();
        let now = Utc::now();
        repo.insert_flights(&[flight(60.0, now), flight(80.0, now)]).await.unwrap();

        let stats = repo.discount_stats(OfferKind::Flight).await.unwrap();
        assert_eq!(stats.avg, Some(70.0));
        assert_eq!(stats.max, Some(80.0));
        assert_eq!(repo.count(OfferKind::Flight).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_older_than_is_idempotent() {
        let repo = InMemoryOfferRepository::new();
        let now = Utc::now();
        repo.insert_flights(&[
            flight(60.0, now - Duration::hours(30)),
            flight(70.0, now - Duration::hours(25)),
            flight(80.0, now - Duration::hours(1)),
        ])
        .await
        .unwrap();

        let cutoff = now - Duration::hours(24);
        assert_eq!(repo.delete_older_than(OfferKind::Flight, cutoff).await.unwrap(), 2);
        assert_eq!(repo.delete_older_than(OfferKind::Flight, cutoff).await.unwrap(), 0);
        assert_eq!(repo.count(OfferKind::Flight).await.unwrap(), 1);
    }
}
