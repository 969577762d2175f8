//! Logger module
//!
//! Process logging goes through `tracing`; this module installs the
//! subscriber and keeps the small `log_*` vocabulary the rest of the crate
//! uses. Access log lines are rendered by [`AccessLogEntry`] and emitted on
//! the `access` target so they can be filtered separately.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_span_list(false))
            .try_init(),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        %addr,
        level = %config.logging.level,
        workers = ?config.server.workers,
        "edge router listening on http://{addr}"
    );
    tracing::info!(
        container = %config.container.id,
        upstream = %format!("{}:{}", config.container.host, config.container.default_port),
        sleep_after = %config.container.sleep_after,
        "POST /api/analyze -> container"
    );
    tracing::info!(dir = %config.assets.dir, "GET * -> static assets");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("failed to serve connection: {err:?}");
}

pub fn log_info(message: &str) {
    tracing::info!("{message}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        tracing::info!(count, "request headers");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
