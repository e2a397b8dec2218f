use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use volo_shared::{CruiseOffer, FlightOffer};

use crate::CoreResult;

/// Optional route constraints for flight generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    pub departure: Option<String>,
    pub arrival: Option<String>,
}

impl RouteFilter {
    /// Codes are trimmed and uppercased; blank ones count as absent.
    pub fn new(departure: Option<String>, arrival: Option<String>) -> Self {
        Self {
            departure: departure.as_deref().and_then(airport_code),
            arrival: arrival.as_deref().and_then(airport_code),
        }
    }
}

fn airport_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    (!code.is_empty()).then(|| code.to_ascii_uppercase())
}

/// What a source pulls its deals from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDescription {
    pub airlines: Vec<String>,
    pub cruise_lines: Vec<String>,
}

/// A provider of offers for a session.
///
/// The query service and refresh cycle only ever talk to this trait, so a
/// real provider can replace the simulated one without touching either.
#[async_trait]
pub trait OfferSource: Send + Sync {
    async fn fetch_flights(&self, session_id: Uuid, route: &RouteFilter) -> CoreResult<Vec<FlightOffer>>;

    async fn fetch_cruises(&self, session_id: Uuid) -> CoreResult<Vec<CruiseOffer>>;

    fn describe(&self) -> SourceDescription;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_codes_are_canonical() {
        let route = RouteFilter::new(Some(" lax ".to_string()), Some("jfk".to_string()));
        assert_eq!(route.departure.as_deref(), Some("LAX"));
        assert_eq!(route.arrival.as_deref(), Some("JFK"));

        let blank = RouteFilter::new(Some("   ".to_string()), None);
        assert_eq!(blank, RouteFilter::default());
    }
}
