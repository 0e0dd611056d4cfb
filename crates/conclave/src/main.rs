mod cli;
mod server;

use std::sync::Arc;

use bitcoin::Network;
use clap::Parser;
use eyre::WrapErr;

use conclave_core::dispatch::{ResponseQueue, WorkerPool};
use conclave_core::rpc::memory::MemoryChain;
use conclave_core::rpc::ChainContext;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let network = if args.testnet {
        Network::Testnet
    } else {
        Network::Bitcoin
    };
    let chain: Arc<dyn ChainContext> = Arc::new(MemoryChain::new(args.testnet));
    tracing::info!(%network, "using in-memory chain backend");

    // Workers outlive the HTTP server so every queued reply gets written.
    let queue = Arc::new(ResponseQueue::new());
    let connections = Arc::new(server::PendingConnections::new());
    let pool = WorkerPool::spawn(args.workers, Arc::clone(&queue), connections.clone())
        .context("spawn dispatch workers")?;
    tracing::info!(workers = pool.size(), "dispatcher started");

    let state = server::AppState {
        chain,
        queue,
        connections,
    };
    let router = server::build_router(state, args.max_body_bytes);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 and is reachable from the network");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("bind TCP listener")?;

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("run HTTP server")?;

    let summaries = tokio::task::spawn_blocking(move || pool.shutdown())
        .await
        .context("join dispatch workers")?;
    for summary in summaries {
        tracing::info!(
            worker.id = summary.id,
            delivered = summary.delivered,
            failed = summary.failed,
            "dispatch worker stopped"
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
