//! studybrief-web - Webhook server for studybrief using Axum

pub mod auth;
pub mod response;
pub mod router;
pub mod webhook;

pub use router::{create_router, AppState};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use studybrief_core::TableSource;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server
pub async fn run<S: TableSource + 'static>(state: Arc<AppState<S>>, addr: SocketAddr) -> Result<()> {
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Webhook listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
