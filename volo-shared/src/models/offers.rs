use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of deal the aggregator tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Flight,
    Cruise,
}

impl OfferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferKind::Flight => "flight",
            OfferKind::Cruise => "cruise",
        }
    }
}

impl std::fmt::Display for OfferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discounted flight deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOffer {
    pub id: Uuid,
    pub source_api: String,
    pub search_id: Uuid,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub airline: String,
    pub flight_number: String,
    pub original_price: f64,
    pub current_price: f64,
    pub discount_percentage: f64,
    pub stops: i32,
    pub duration_minutes: i32,
    pub booking_link: String,
    pub is_authentic: bool,
    pub validation_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A discounted cruise deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CruiseOffer {
    pub id: Uuid,
    pub source_api: String,
    pub search_id: Uuid,
    pub cruise_line: String,
    pub ship_name: String,
    pub departure_port: String,
    pub departure_date: DateTime<Utc>,
    pub duration_nights: i32,
    pub original_price: f64,
    pub current_price: f64,
    pub discount_percentage: f64,
    pub cabin_type: String,
    pub booking_link: String,
    pub is_authentic: bool,
    pub validation_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// An offer as it appears in combined listings, tagged with its kind.
///
/// Serializes as the offer's own fields plus `"type": "flight" | "cruise"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListedOffer {
    Flight(FlightOffer),
    Cruise(CruiseOffer),
}

impl ListedOffer {
    pub fn kind(&self) -> OfferKind {
        match self {
            ListedOffer::Flight(_) => OfferKind::Flight,
            ListedOffer::Cruise(_) => OfferKind::Cruise,
        }
    }

    pub fn discount_percentage(&self) -> f64 {
        match self {
            ListedOffer::Flight(f) => f.discount_percentage,
            ListedOffer::Cruise(c) => c.discount_percentage,
        }
    }
}

impl From<FlightOffer> for ListedOffer {
    fn from(offer: FlightOffer) -> Self {
        ListedOffer::Flight(offer)
    }
}

impl From<CruiseOffer> for ListedOffer {
    fn from(offer: CruiseOffer) -> Self {
        ListedOffer::Cruise(offer)
    }
}

/// Sort offers by discount, highest first.
pub fn sort_by_discount_desc(offers: &mut [ListedOffer]) {
    offers.sort_by(|a, b| b.discount_percentage().total_cmp(&a.discount_percentage()));
}
