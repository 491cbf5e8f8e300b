//! GiftLink binary: thin CLI shell over the [`giftlink_server`] library crate.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use giftlink_core::config::resolve_config_path;
use giftlink_core::load_giftlink_config;
use giftlink_server::{app, build_store, config_dir, import, load_seed_file, seed_if_empty};

// ---------------------------------------------------------------------------
// CLI definition (clap derive)
// ---------------------------------------------------------------------------

/// GiftLink listing service: browse, look up, create, and search gifts over HTTP.
#[derive(Parser)]
#[command(name = "giftlink", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ./giftlink.toml, then ~/.giftlink/giftlink.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use an in-memory store instead of MongoDB
    #[arg(long, global = true)]
    memory: bool,

    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Bind to 0.0.0.0 instead of 127.0.0.1 (localhost)
    #[arg(long)]
    bind_all: bool,

    /// JSON array of gifts to insert at startup when the store is empty
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert every gift from a JSON array file and exit
    Import {
        /// JSON file holding an array of gift objects
        file: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Could not register SIGTERM handler");
                    let _ = ctrl_c.await;
                    info!("Received SIGINT, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = ctrl_c.await {
            warn!(error = %e, "Could not listen for Ctrl+C");
        }
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("giftlink=info".parse().expect("static directive")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "giftlink", &mut std::io::stdout());
        return;
    }

    let config_path = resolve_config_path(cli.config.as_deref(), config_dir().as_deref());
    let mut config = load_giftlink_config(&config_path);
    config.apply_env();
    if let Some(port) = cli.port {
        config.port = port;
    }

    let store = build_store(&config, cli.memory);

    if let Some(Commands::Import { file }) = &cli.command {
        let result = match load_seed_file(file) {
            Ok(documents) => import(store.as_ref(), documents).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(n) => {
                info!(inserted = n, file = %file.display(), "Imported gifts");
                return;
            }
            Err(e) => {
                error!(error = %e, "Import failed");
                std::process::exit(1);
            }
        }
    }

    if let Some(seed) = &cli.seed {
        let result = match load_seed_file(seed) {
            Ok(documents) => seed_if_empty(store.as_ref(), documents).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(0) => {}
            Ok(n) => info!(inserted = n, file = %seed.display(), "Seeded store"),
            Err(e) => {
                error!(error = %e, "Seeding failed");
                std::process::exit(1);
            }
        }
    }

    match store.count().await {
        Ok(n) => info!(store = store.name(), gifts = n, "Store ready"),
        Err(e) => warn!(store = store.name(), error = %e, "Store not reachable yet"),
    }

    let bind_addr = if cli.bind_all { "0.0.0.0" } else { "127.0.0.1" };
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}"))
        .await
        .unwrap_or_else(|e| {
            error!(port = port, error = %e, "Could not bind to port");
            eprintln!("  Try: PORT=<port> giftlink");
            std::process::exit(1);
        });

    let app = app(store, &config.allowed_origins);

    info!(port = port, "http://localhost:{port}");

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
