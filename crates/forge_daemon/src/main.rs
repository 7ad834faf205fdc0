//! Remote save store for the progression game.
//!
//! Keeps one integrity-tagged save per identity. The HMAC secret must be
//! present at startup — a missing secret is a fatal configuration error,
//! never a silent per-request failure.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod integrity;
mod routes;
mod state;
mod store;

use routes::make_router_with_cors;
use state::AppState;
use store::FsStore;

#[derive(Parser)]
#[command(name = "forge_daemon", about = "Starforge remote save store")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    addr: SocketAddr,

    /// Directory holding one save file per identity.
    #[arg(long, default_value = "./saves")]
    data_dir: PathBuf,

    /// Origin allowed by CORS (the game client).
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,

    /// HMAC secret for save integrity tags. Required; read from the
    /// environment so it never appears in process listings.
    #[arg(long, env = "STARFORGE_SAVE_SECRET", hide_env_values = true)]
    save_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    ensure!(
        !args.save_secret.trim().is_empty(),
        "STARFORGE_SAVE_SECRET must not be empty"
    );

    let store = FsStore::new(&args.data_dir)?;
    let app_state = AppState::new(Arc::new(store), &args.save_secret);
    let app = make_router_with_cors(app_state, &args.cors_origin);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    tracing::info!(addr = %args.addr, data_dir = %args.data_dir.display(), "save store listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
