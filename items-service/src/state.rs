//! Application state management

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{config::Config, store::ItemStore};

/// Application state shared across handlers
///
/// Cloning is cheap: the config and the store are behind `Arc`s, so every
/// clone sees the same items. Each store call made through the lock runs to
/// completion before another request can touch the store.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<RwLock<ItemStore>>,
}

impl AppState {
    /// Create state from a configuration and an explicit store
    pub fn new(config: Config, store: ItemStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Create state from configuration, seeding the store if `store.seed` is set
    pub fn from_config(config: Config) -> Self {
        let store = if config.store.seed {
            ItemStore::seeded()
        } else {
            ItemStore::new()
        };
        tracing::debug!(items = store.len(), "Item store initialized");
        Self::new(config, store)
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the shared item store
    pub fn store(&self) -> &Arc<RwLock<ItemStore>> {
        &self.store
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

/// Builder for AppState
///
/// Anything left unset falls back to `Config::default()` and a store built
/// according to that config.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<ItemStore>,
}

impl AppStateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this store instead of one derived from the configuration
    pub fn store(mut self, store: ItemStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the AppState
    pub fn build(self) -> AppState {
        let config = self.config.unwrap_or_default();
        match self.store {
            Some(store) => AppState::new(config, store),
            None => AppState::from_config(config),
        }
    }
}
