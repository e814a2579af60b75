//! PostgreSQL implementations of the store traits.

pub mod access_log;
pub mod catalog;
pub mod share;

pub use access_log::AccessLogRepository;
pub use catalog::CatalogRepository;
pub use share::ShareRepository;
