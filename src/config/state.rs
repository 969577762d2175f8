// Application state module
// Everything a request handler needs, passed explicitly to every connection

use std::sync::Arc;

use super::types::Config;
use crate::assets::AssetStore;
use crate::container::ContainerRegistry;
use crate::routing::Route;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Ordered route table, first match wins
    pub routes: Vec<Route>,
    /// Platform binding for backend instances
    pub containers: Arc<ContainerRegistry>,
    pub assets: AssetStore,
    access_log: bool,
}

impl AppState {
    pub fn new(config: &Config, containers: Arc<ContainerRegistry>) -> Self {
        Self {
            routes: Route::default_table(&config.container.id),
            assets: AssetStore::new(&config.assets),
            access_log: config.logging.access_log,
            config: config.clone(),
            containers,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ContainerSpec, LoggingHooks};

    #[test]
    fn test_access_log_follows_config() {
        let mut cfg = Config::load_from("does-not-exist").unwrap();
        let hooks = Arc::new(LoggingHooks);

        let registry = ContainerRegistry::new(ContainerSpec::default(), hooks.clone());
        let state = AppState::new(&cfg, registry);
        assert!(state.access_log_enabled());

        cfg.logging.access_log = false;
        let registry = ContainerRegistry::new(ContainerSpec::default(), hooks);
        let state = AppState::new(&cfg, registry);
        assert!(!state.access_log_enabled());
    }
}
