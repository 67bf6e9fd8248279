// Application state module
// Bundles the immutable configuration with the data service

use super::types::Config;
use crate::data::DataService;

/// Application state shared by every connection task.
///
/// Constructed once at startup, after the dataset load has completed, and
/// handed to handlers behind an `Arc`. All request-time mutability lives
/// inside `feed`.
pub struct AppState {
    pub config: Config,
    pub feed: DataService,
}

impl AppState {
    pub fn new(config: Config, feed: DataService) -> Self {
        Self { config, feed }
    }
}
