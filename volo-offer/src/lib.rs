pub mod catalog;
pub mod pricing;
pub mod scraper;
pub mod validation;

pub use scraper::{ScraperConfig, SimulatedScraper};
pub use validation::{authenticity_or_default, AcceptAll, AuthenticityValidator, ChatClassifier, OfferDigest};
