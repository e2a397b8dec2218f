pub mod models;

pub use models::offers::{sort_by_discount_desc, CruiseOffer, FlightOffer, ListedOffer, OfferKind};
