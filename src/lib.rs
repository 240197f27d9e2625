//! BookBlend Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod goodreads;
pub mod hardcover;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{CatalogRecord, CatalogService, EnrichedRecord};
pub use goodreads::GoodreadsClient;
pub use hardcover::HardcoverClient;
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
