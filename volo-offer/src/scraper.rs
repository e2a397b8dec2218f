use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use futures_util::future::join_all;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;
use volo_core::source::{OfferSource, RouteFilter, SourceDescription};
use volo_core::CoreResult;
use volo_shared::{CruiseOffer, FlightOffer};

use crate::catalog::{self, AirlineSource, CruiseLineSource};
use crate::pricing::PricingPolicy;
use crate::validation::{authenticity_or_default, AcceptAll, AuthenticityValidator, OfferDigest};

/// Tuning for the simulated per-source scrape.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Pause between consecutive source calls. Zero disables it.
    pub request_delay: Duration,
    pub flights_per_source: RangeInclusive<usize>,
    pub cruises_per_source: RangeInclusive<usize>,
    pub round_trip_probability: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(250),
            flights_per_source: 3..=8,
            cruises_per_source: 2..=5,
            round_trip_probability: 0.4,
        }
    }
}

/// Offer source that synthesizes deals per airline and cruise line.
pub struct SimulatedScraper {
    config: ScraperConfig,
    flight_pricing: PricingPolicy,
    cruise_pricing: PricingPolicy,
    validator: Arc<dyn AuthenticityValidator>,
}

impl SimulatedScraper {
    pub fn new(config: ScraperConfig, validator: Arc<dyn AuthenticityValidator>) -> Self {
        Self {
            config,
            flight_pricing: PricingPolicy::flights(),
            cruise_pricing: PricingPolicy::cruises(),
            validator,
        }
    }

    /// No pauses and no classifier; what the tests run against.
    pub fn instant() -> Self {
        Self::new(
            ScraperConfig {
                request_delay: Duration::ZERO,
                ..ScraperConfig::default()
            },
            Arc::new(AcceptAll),
        )
    }

    /// Classifies one source's batch concurrently; verdicts come back in input order.
    async fn classify(&self, digests: &[OfferDigest]) -> Vec<bool> {
        let validator = self.validator.as_ref();
        join_all(digests.iter().map(|digest| authenticity_or_default(validator, digest))).await
    }

    async fn pause(&self, index: usize) {
        if index > 0 && !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }
    }

    fn scrape_airline(&self, airline: &AirlineSource, session_id: Uuid, route: &RouteFilter) -> Vec<FlightOffer> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(self.config.flights_per_source.clone());
        let now = Utc::now();

        (0..count)
            .map(|_| {
                let departure = match (&route.departure, &route.arrival) {
                    (Some(dep), _) => dep.clone(),
                    (None, Some(arr)) => pick_excluding(&mut rng, catalog::AIRPORTS, arr),
                    (None, None) => pick(&mut rng, catalog::AIRPORTS).to_string(),
                };
                // An arrival equal to the departure is not a route; sample one instead.
                let arrival = match &route.arrival {
                    Some(arr) if !arr.eq_ignore_ascii_case(&departure) => arr.clone(),
                    _ => pick_excluding(&mut rng, catalog::AIRPORTS, &departure),
                };

                let departure_date = now + ChronoDuration::days(rng.gen_range(7..=90));
                let return_date = rng
                    .gen_bool(self.config.round_trip_probability)
                    .then(|| departure_date + ChronoDuration::days(rng.gen_range(3..=21)));
                let quote = self.flight_pricing.sample(&mut rng);

                FlightOffer {
                    id: Uuid::new_v4(),
                    source_api: format!("scraped_{}", catalog::source_slug(airline.name)),
                    search_id: session_id,
                    departure_airport: departure,
                    arrival_airport: arrival,
                    departure_date,
                    return_date,
                    airline: airline.name.to_string(),
                    flight_number: format!("{}{}", airline.carrier_code, rng.gen_range(100..=999)),
                    original_price: quote.original_price,
                    current_price: quote.current_price,
                    discount_percentage: quote.discount_percentage,
                    stops: rng.gen_range(0..=2),
                    duration_minutes: rng.gen_range(180..=960),
                    booking_link: format!("https://{}/booking/{}", airline.website, Uuid::new_v4()),
                    is_authentic: true,
                    validation_timestamp: now,
                    created_at: now,
                }
            })
            .collect()
    }

    fn scrape_cruise_line(&self, line: &CruiseLineSource, session_id: Uuid) -> Vec<CruiseOffer> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(self.config.cruises_per_source.clone());
        let now = Utc::now();

        (0..count)
            .map(|_| {
                let quote = self.cruise_pricing.sample(&mut rng);
                CruiseOffer {
                    id: Uuid::new_v4(),
                    source_api: format!("scraped_{}", catalog::source_slug(line.name)),
                    search_id: session_id,
                    cruise_line: line.name.to_string(),
                    ship_name: pick(&mut rng, line.ships).to_string(),
                    departure_port: pick(&mut rng, catalog::DEPARTURE_PORTS).to_string(),
                    departure_date: now + ChronoDuration::days(rng.gen_range(14..=180)),
                    duration_nights: catalog::CRUISE_NIGHTS[rng.gen_range(0..catalog::CRUISE_NIGHTS.len())],
                    original_price: quote.original_price,
                    current_price: quote.current_price,
                    discount_percentage: quote.discount_percentage,
                    cabin_type: pick(&mut rng, catalog::CABIN_TYPES).to_string(),
                    booking_link: format!("https://{}/booking/{}", line.website, Uuid::new_v4()),
                    is_authentic: true,
                    validation_timestamp: now,
                    created_at: now,
                }
            })
            .collect()
    }
}

#[async_trait]
impl OfferSource for SimulatedScraper {
    async fn fetch_flights(&self, session_id: Uuid, route: &RouteFilter) -> CoreResult<Vec<FlightOffer>> {
        let mut offers = Vec::new();

        for (index, airline) in catalog::AIRLINES.iter().enumerate() {
            self.pause(index).await;

            let mut batch = self.scrape_airline(airline, session_id, route);
            let digests: Vec<OfferDigest> = batch.iter().map(OfferDigest::from).collect();
            let verdicts = self.classify(&digests).await;
            let checked_at = Utc::now();
            for (offer, verdict) in batch.iter_mut().zip(verdicts) {
                offer.is_authentic = verdict;
                offer.validation_timestamp = checked_at;
            }

            debug!(source = airline.name, count = batch.len(), "Scraped flight offers");
            offers.extend(batch);
        }

        Ok(offers)
    }

    async fn fetch_cruises(&self, session_id: Uuid) -> CoreResult<Vec<CruiseOffer>> {
        let mut offers = Vec::new();

        for (index, line) in catalog::CRUISE_LINES.iter().enumerate() {
            self.pause(index).await;

            let mut batch = self.scrape_cruise_line(line, session_id);
            let digests: Vec<OfferDigest> = batch.iter().map(OfferDigest::from).collect();
            let verdicts = self.classify(&digests).await;
            let checked_at = Utc::now();
            for (offer, verdict) in batch.iter_mut().zip(verdicts) {
                offer.is_authentic = verdict;
                offer.validation_timestamp = checked_at;
            }

            debug!(source = line.name, count = batch.len(), "Scraped cruise offers");
            offers.extend(batch);
        }

        Ok(offers)
    }

    fn describe(&self) -> SourceDescription {
        SourceDescription {
            airlines: catalog::airline_names(),
            cruise_lines: catalog::cruise_line_names(),
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn pick_excluding<R: Rng + ?Sized>(rng: &mut R, items: &[&str], excluded: &str) -> String {
    let candidates: Vec<&str> = items
        .iter()
        .copied()
        .filter(|item| !item.eq_ignore_ascii_case(excluded))
        .collect();
    pick(rng, &candidates).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::round_to;
    use crate::validation::ValidationError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Flags deals under 70% and records how many checks overlap.
    #[derive(Default)]
    struct SlowThreshold {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl AuthenticityValidator for SlowThreshold {
        async fn classify(&self, digest: &OfferDigest) -> Result<bool, ValidationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(digest.discount_percentage >= 70.0)
        }
    }

    #[tokio::test]
    async fn test_flights_hold_invariants() {
        let scraper = SimulatedScraper::instant();
        let session = Uuid::new_v4();
        let flights = scraper.fetch_flights(session, &RouteFilter::default()).await.unwrap();

        assert!(flights.len() >= catalog::AIRLINES.len() * 3);
        assert!(flights.len() <= catalog::AIRLINES.len() * 8);

        let now = Utc::now();
        for f in &flights {
            assert_eq!(f.search_id, session);
            assert_ne!(f.departure_airport, f.arrival_airport);
            assert!(f.current_price > 0.0 && f.current_price <= f.original_price);
            assert!((50.0..=92.0).contains(&f.discount_percentage));
            let implied = round_to((1.0 - f.current_price / f.original_price) * 100.0, 1);
            assert!((implied - f.discount_percentage).abs() <= 0.1 + 1e-9);
            assert!((0..=2).contains(&f.stops));
            assert!((180..=960).contains(&f.duration_minutes));
            assert!(f.departure_date > now);
            if let Some(ret) = f.return_date {
                assert!(ret > f.departure_date);
            }
            assert!(f.source_api.starts_with("scraped_"));
            assert_eq!(f.flight_number.len(), 5);
            assert!(f.flight_number[2..].parse::<u32>().is_ok());
        }
    }

    #[tokio::test]
    async fn test_route_is_honoured() {
        let scraper = SimulatedScraper::instant();
        let route = RouteFilter::new(Some("JFK".to_string()), Some("LAX".to_string()));
        let flights = scraper.fetch_flights(Uuid::new_v4(), &route).await.unwrap();

        assert!(!flights.is_empty());
        assert!(flights.iter().all(|f| f.departure_airport == "JFK" && f.arrival_airport == "LAX"));
    }

    #[tokio::test]
    async fn test_arrival_only_route_picks_other_departure() {
        let scraper = SimulatedScraper::instant();
        let route = RouteFilter::new(None, Some("LHR".to_string()));
        let flights = scraper.fetch_flights(Uuid::new_v4(), &route).await.unwrap();

        assert!(flights.iter().all(|f| f.arrival_airport == "LHR" && f.departure_airport != "LHR"));
    }

    #[tokio::test]
    async fn test_equal_route_still_yields_distinct_airports() {
        let scraper = SimulatedScraper::instant();
        let route = RouteFilter {
            departure: Some("MAD".to_string()),
            arrival: Some("mad".to_string()),
        };
        let flights = scraper.fetch_flights(Uuid::new_v4(), &route).await.unwrap();

        assert!(!flights.is_empty());
        for f in &flights {
            assert_eq!(f.departure_airport, "MAD");
            assert!(!f.arrival_airport.eq_ignore_ascii_case("MAD"));
        }
    }

    #[tokio::test]
    async fn test_lowercase_route_is_uppercased() {
        let scraper = SimulatedScraper::instant();
        let route = RouteFilter::new(Some("lax".to_string()), None);
        let flights = scraper.fetch_flights(Uuid::new_v4(), &route).await.unwrap();

        assert!(flights.iter().all(|f| f.departure_airport == "LAX" && f.arrival_airport != "LAX"));
    }

    #[tokio::test]
    async fn test_cruises_hold_invariants() {
        let scraper = SimulatedScraper::instant();
        let cruises = scraper.fetch_cruises(Uuid::new_v4()).await.unwrap();

        assert!(cruises.len() >= catalog::CRUISE_LINES.len() * 2);
        for c in &cruises {
            assert!(catalog::CRUISE_NIGHTS.contains(&c.duration_nights));
            assert!(catalog::CABIN_TYPES.contains(&c.cabin_type.as_str()));
            assert!((50.0..=88.0).contains(&c.discount_percentage));
            assert!(c.current_price > 0.0 && c.current_price <= c.original_price);

            let line = catalog::CRUISE_LINES.iter().find(|l| l.name == c.cruise_line).unwrap();
            assert!(line.ships.contains(&c.ship_name.as_str()));
        }
    }

    #[tokio::test]
    async fn test_flight_numbers_match_airline() {
        let scraper = SimulatedScraper::instant();
        let flights = scraper.fetch_flights(Uuid::new_v4(), &RouteFilter::default()).await.unwrap();

        for f in &flights {
            let airline = catalog::AIRLINES.iter().find(|a| a.name == f.airline).unwrap();
            assert!(f.flight_number.starts_with(airline.carrier_code));
        }
    }

    #[test]
    fn test_describe_lists_all_sources() {
        let description = SimulatedScraper::instant().describe();
        assert_eq!(description.airlines.len(), 10);
        assert!(description.cruise_lines.contains(&"Norwegian Cruise Line".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_is_classified_concurrently_in_order() {
        let validator = Arc::new(SlowThreshold::default());
        let scraper = SimulatedScraper::new(
            ScraperConfig {
                request_delay: Duration::ZERO,
                ..ScraperConfig::default()
            },
            validator.clone(),
        );

        let cruises = scraper.fetch_cruises(Uuid::new_v4()).await.unwrap();

        assert!(validator.peak.load(Ordering::SeqCst) >= 2);
        for c in &cruises {
            assert_eq!(c.is_authentic, c.discount_percentage >= 70.0);
        }
    }
}
