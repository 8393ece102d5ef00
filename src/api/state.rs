//! Application state for the points engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::PointsStore;

/// Shared application state.
///
/// Holds the loaded scoring model and the record store built on it.
#[derive(Clone)]
pub struct AppState {
    /// The loaded scoring model.
    config: Arc<ConfigLoader>,
    /// The record store.
    store: Arc<PointsStore>,
}

impl AppState {
    /// Creates application state with an empty store for the given model.
    pub fn new(config: ConfigLoader) -> Self {
        let store = PointsStore::new(config.shared());
        Self::with_store(config, store)
    }

    /// Creates application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: PointsStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the record store.
    pub fn store(&self) -> &PointsStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_store_shares_loaded_model() {
        let config = ConfigLoader::load("./config/scoring").unwrap();
        let state = AppState::new(config);
        assert_eq!(
            state.store().config().model().code,
            state.config().model().code
        );
    }
}
