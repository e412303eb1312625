//! Scriptable stand-in for the cluster orchestration server.
//!
//! Serves the `/api/*` surface the dashboard polls, plus a `/ctl/*` surface
//! that integration tests (and manual demos) use to script cluster state:
//! replace the host/invocation snapshots, force error envelopes per
//! resource, serve garbage bodies, register log artifacts.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clusterdash::model::{HostRecord, InvocationDetail, InvocationId};

#[path = "clusterdash_sim/routes.rs"]
mod routes;
#[path = "clusterdash_sim/sim_state.rs"]
mod sim_state;

use self::sim_state::SimState;

#[derive(Parser, Debug)]
#[command(name = "clusterdash-sim")]
struct Args {
    /// Listen address; port 0 picks a free port
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: SocketAddr,

    /// Write the bound address to this file once listening
    #[arg(long)]
    addr_file: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    sim: Arc<RwLock<SimState>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();
    let state = AppState {
        sim: Arc::new(RwLock::new(SimState::default())),
    };

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .context("bind listener")?;
    let local = listener.local_addr().context("local addr")?;
    info!(%local, "clusterdash-sim listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local.to_string()).context("write addr file")?;
    }

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serve")?;
    Ok(())
}
