// Data module entry point
// Owns the in-memory dataset, the rotation cursor, and row enrichment

mod error;
mod loader;
mod service;

pub use error::LoadError;
pub use loader::{load_dataset, Dataset, RowRecord};
pub use service::{DataService, ServedRecord};
