//! Backend container binding
//!
//! A backend instance is the analysis process the router forwards
//! `/api/analyze` to. This module declares how such an instance is started
//! ([`ContainerSpec`]), the advisory lifecycle hooks ([`LifecycleHooks`]), and
//! a local registry that plays the container platform's part: get-or-create by
//! id, forward a raw request, stop after an idle period.

mod instance;
mod registry;

use std::collections::HashMap;
use std::time::Duration;

use crate::config::{parse_duration, ContainerConfig};
use crate::error::{Error, ForwardError};
use crate::logger;

pub use instance::ContainerInstance;
pub use registry::ContainerRegistry;

/// How a backend instance is started and supervised
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub host: String,
    /// Port the backend process listens on
    pub default_port: u16,
    /// Idle time after which the instance is stopped
    pub sleep_after: Duration,
    /// Environment injected into the backend process at start
    pub env_vars: HashMap<String, String>,
    /// Backend start command, `None` when the backend runs on its own
    pub command: Option<Vec<String>>,
}

impl ContainerSpec {
    pub fn from_config(config: &ContainerConfig) -> Result<Self, Error> {
        Ok(Self {
            host: config.host.clone(),
            default_port: config.default_port,
            sleep_after: parse_duration(&config.sleep_after)?,
            env_vars: config.env_vars.clone(),
            command: config.command.clone(),
        })
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            default_port: 3000,
            sleep_after: Duration::from_secs(120),
            env_vars: HashMap::new(),
            command: None,
        }
    }
}

/// Observer hooks for instance lifecycle transitions
///
/// The registry calls these after the fact; nothing they do feeds back into
/// start, stop or forwarding decisions.
pub trait LifecycleHooks: Send + Sync {
    fn on_start(&self, id: &str) {
        logger::log_info(&format!("Container successfully started: {id}"));
    }

    fn on_stop(&self, id: &str) {
        logger::log_info(&format!("Container successfully shut down: {id}"));
    }

    fn on_error(&self, id: &str, error: &ForwardError) {
        logger::log_error(&format!("Container error ({id}): {error}"));
    }
}

/// Hooks that only log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl LifecycleHooks for LoggingHooks {}
