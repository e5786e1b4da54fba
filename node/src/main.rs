// Copyright (c) 2026 The Vernal Authors. MIT License.
// See LICENSE for details.

//! # Vernal Server
//!
//! Entry point for the `vernal` binary. Parses CLI arguments, initializes
//! logging and metrics, wires the board store, and serves the Spring '83
//! HTTP API.
//!
//! The binary supports three subcommands:
//!
//! - `serve`   — start the board server on `$PORT`
//! - `keygen`  — brute-force a conforming Spring '83 keypair
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use object_store::gcp::GoogleCloudStorageBuilder;
use tokio::signal;
use tokio::sync::watch;

use vernal_protocol::config::SPRING_VERSION;
use vernal_protocol::denylist::MemoryDenyList;
use vernal_protocol::miner;
use vernal_protocol::service::BoardService;
use vernal_protocol::store::{BoardStore, BucketStore, MemoryStore};

use cli::{Commands, ServeArgs, VernalCli};
use logging::LogFormat;
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VernalCli::parse();

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Keygen => run_keygen().await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full board server: API listener, metrics listener, and the
/// store's background reaper.
async fn run_serve(args: ServeArgs) -> Result<()> {
    logging::init(LogFormat::from_str_lossy(&args.log_format));

    tracing::info!(
        port = args.port,
        metrics_port = args.metrics_port,
        "starting vernal"
    );

    // --- Store & service ---
    let store = build_store(&args)?;
    let service = Arc::new(BoardService::new(
        Arc::clone(&store),
        Arc::new(MemoryDenyList::new()),
    ));
    let node_metrics = Arc::new(NodeMetrics::new());

    // --- Shutdown plumbing ---
    // One watch channel fans the signal out to both listeners and the
    // reaper; each waits for the value to flip true.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });

    // --- Reaper ---
    let reaper = tokio::spawn({
        let store = Arc::clone(&store);
        let shutdown = shutdown_rx.clone();
        async move { store.reap_loop(shutdown).await }
    });

    // --- Board API server ---
    let router = api::create_router(api::AppState {
        service,
        metrics: Arc::clone(&node_metrics),
    });
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind board listener on {addr}"))?;
    tracing::info!("board server listening on {addr}");

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
    tracing::info!("metrics server listening on {metrics_addr}");

    // --- Serve until shutdown, then drain ---
    let mut board_shutdown = shutdown_rx.clone();
    let board_server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = board_shutdown.wait_for(|stop| *stop).await;
    });
    let mut metrics_shutdown = shutdown_rx.clone();
    let metrics_server =
        axum::serve(metrics_listener, metrics_router).with_graceful_shutdown(async move {
            let _ = metrics_shutdown.wait_for(|stop| *stop).await;
        });

    let (board_result, metrics_result) =
        tokio::join!(async { board_server.await }, async { metrics_server.await });
    board_result.context("board server error")?;
    metrics_result.context("metrics server error")?;

    // Connections are drained; wait for the reaper to notice the same
    // signal before declaring the process done.
    reaper.await.context("reaper task panicked")?;

    tracing::info!("vernal stopped");
    Ok(())
}

/// Picks the board store from configuration: bucket-backed when a bucket is
/// named, in-memory otherwise.
fn build_store(args: &ServeArgs) -> Result<Arc<dyn BoardStore>> {
    match &args.storage_bucket {
        Some(bucket_name) => {
            let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket_name);
            if let Some(credentials) = &args.gcp_credentials_json {
                builder = builder.with_service_account_key(credentials);
            }
            let bucket = builder
                .build()
                .with_context(|| format!("failed to configure storage bucket {bucket_name:?}"))?;

            tracing::info!(bucket = %bucket_name, "activating store: BucketStore");
            Ok(Arc::new(BucketStore::new(Arc::new(bucket))))
        }
        None => {
            tracing::info!("activating store: MemoryStore");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Runs the key miner and prints the result. Stdout on purpose — the
/// output is the product, not a log line.
async fn run_keygen() -> Result<()> {
    println!("Brute forcing a Spring '83 key (this could take a while)");
    let started = std::time::Instant::now();

    // The miner is pure CPU; keep it off the async runtime's worker threads.
    let mined =
        tokio::task::spawn_blocking(|| miner::generate_conforming_key(chrono::Utc::now()))
            .await
            .context("keygen task panicked")??;

    println!(
        "Succeeded in {:?} with {} iterations",
        started.elapsed(),
        mined.iterations
    );
    println!("Private key: {}", mined.keypair.seed_hex());
    println!("Public  key: {}", mined.keypair.public_hex());

    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("vernal   {}", env!("CARGO_PKG_VERSION"));
    println!("protocol Spring '{SPRING_VERSION}");
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first. SIGTERM is
/// what platform schedulers send before a deploy or instance restart, so
/// honoring it is what makes restarts invisible to clients.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
