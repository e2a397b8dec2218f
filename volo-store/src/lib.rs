pub mod app_config;
pub mod database;
pub mod memory_repo;
pub mod offer_repo;

pub use database::{DbClient, DbError};
pub use memory_repo::InMemoryOfferRepository;
pub use offer_repo::PostgresOfferRepository;
