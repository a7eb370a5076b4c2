pub mod database;
pub mod memory;
pub mod metrics;
pub mod repository;
pub mod store;

pub use database::MongoStore;
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics, record_artworks_listed, record_inquiry};
pub use repository::PortfolioRepository;
pub use store::{DocumentStore, Filter, Limit, StoredDocument, DEFAULT_LIMIT, MAX_LIMIT};
