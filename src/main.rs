use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;

use rustowl_edge::config::{AppState, Config};
use rustowl_edge::container::{ContainerRegistry, ContainerSpec, LoggingHooks};
use rustowl_edge::{logger, server};

#[derive(Debug, Parser)]
#[command(name = "rustowl-edge", version, about = "Edge router for the RustOwl playground")]
struct Args {
    /// Configuration file, without extension
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut cfg = Config::load_from(&args.config)?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    logger::init(&cfg.logging)?;

    // Runtime thread count follows `server.workers`, CPU count otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let spec = ContainerSpec::from_config(&cfg.container)?;
    let containers = ContainerRegistry::new(spec, Arc::new(LoggingHooks));
    let state = Arc::new(AppState::new(&cfg, Arc::clone(&containers)));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    logger::log_server_start(&addr, &cfg);
    server::run(listener, state, shutdown).await;

    containers.stop_all().await;
    Ok(())
}
