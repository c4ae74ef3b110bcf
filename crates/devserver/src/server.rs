//! Static file server with single-page-application fallback.

use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use carcompare_core::config::DevServerConfig;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Entry document served for every path that is not a file.
pub const INDEX_FILE: &str = "index.html";

/// Serve `static_dir`, answering unknown paths with its `index.html` so
/// client-side routes survive a refresh.
pub fn router(static_dir: &Path) -> Router {
    let index = ServeFile::new(static_dir.join(INDEX_FILE));
    let files = ServeDir::new(static_dir).fallback(index);
    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Bind exactly `host:port`; an occupied port is an error, not a reason to pick another.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let addr = format!("{host}:{port}");
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}; is another dev server already running?"))
}

/// Run the dev server until it fails.
pub async fn serve(config: &DevServerConfig) -> Result<()> {
    let index = config.static_dir.join(INDEX_FILE);
    if !index.is_file() {
        warn!(path = %index.display(), "index file missing; client routes will 404");
    }

    let listener = bind(&config.host, config.port).await?;
    info!(
        addr = %listener.local_addr()?,
        dir = %config.static_dir.display(),
        "dev server listening"
    );
    axum::serve(listener, router(&config.static_dir))
        .await
        .context("dev server stopped unexpectedly")
}
