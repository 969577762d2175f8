// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub assets: AssetsConfig,
    pub container: ContainerConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Log output format for the process log (not the access log)
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    #[serde(default)]
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds allowed for reading a request head
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Static asset store configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Directory the catch-all route serves from
    pub dir: String,
    /// Files tried when a path resolves to a directory
    pub index_files: Vec<String>,
}

/// Backend container configuration
///
/// Fixed at deployment time. The instance is addressed by `id`; everything
/// else describes how the platform should start and supervise it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContainerConfig {
    pub id: String,
    pub host: String,
    pub default_port: u16,
    /// Idle time before the instance is stopped, e.g. "2m"
    pub sleep_after: String,
    /// Command that starts the backend; when unset the backend is assumed
    /// to be running already at `host:default_port`
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
}
