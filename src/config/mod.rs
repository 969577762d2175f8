// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod duration;
mod state;
mod types;

use std::net::SocketAddr;

use crate::error::Error;

pub use duration::parse_duration;
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, ContainerConfig, HttpConfig, LogFormat, LoggingConfig,
    PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// then `EDGE_*` environment variables (`EDGE_CONTAINER__DEFAULT_PORT=4000`).
    pub fn load_from(config_path: &str) -> Result<Self, Error> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.format", "text")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "rustowl-edge")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("assets.dir", "static/dist")?
            .set_default("assets.index_files", vec!["index.html"])?
            .set_default("container.id", "rustowl")?
            .set_default("container.host", "127.0.0.1")?
            .set_default("container.default_port", 3000)?
            .set_default("container.sleep_after", "2m")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("EDGE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        // Reject a malformed idle timeout at startup rather than on first use
        parse_duration(&cfg.container.sleep_after)?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| Error::Address { addr, source })
    }
}
