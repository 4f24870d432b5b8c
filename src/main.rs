//! Prompt-rewriting proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   client ──▶ http::server ──▶ intercept ──┬─▶ emulation (local SSE reply)
//!                                           ├─▶ cache hit (stored token count)
//!                                           └─▶ pipeline rewrite ──▶ http::upstream ──▶ model API
//!                                                                        │
//!   client ◀──────────────────────── streamed response ◀─── observer ◀───┘
//!
//!   assets (hot reloaded)   config (TOML + flags)   lifecycle (signals)
//! ```

use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

use prompt_proxy::assets::{AssetStore, AssetWatcher};
use prompt_proxy::cli::Cli;
use prompt_proxy::config::{read_config, validated, ProxyConfig};
use prompt_proxy::lifecycle::{spawn_signal_listener, Shutdown};
use prompt_proxy::observability::{logging, metrics};
use prompt_proxy::{HttpServer, ProxyError};

#[tokio::main]
async fn main() -> Result<(), ProxyError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    logging::init_logging(&config.observability);
    let config = validated(config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        target = %config.upstream.target,
        target_model = %config.interception.target_model,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let assets = Arc::new(AssetStore::load(config.assets.clone()));
    let _watcher = if config.assets.watch {
        Some(AssetWatcher::new(assets.clone()).run()?)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, assets)?;
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
