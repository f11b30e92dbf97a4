use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::LoaderConfig;

/// Shell at `/`, view markup under `/modules`, `index.html` for anything else.
pub fn app(root: &Path, markup_root: &Path) -> Router {
    let shell = ServeDir::new(root).fallback(ServeFile::new(root.join("index.html")));

    Router::new()
        .nest_service("/modules", ServeDir::new(markup_root))
        .fallback_service(shell)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: &LoaderConfig) -> anyhow::Result<()> {
    let root = &config.server.root;
    let markup_root = config.resolved_markup_root();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", addr);
    tracing::info!("serving root: {}", root.display());
    tracing::info!("serving views: {}", markup_root.display());

    axum::serve(listener, app(root, &markup_root)).await?;
    Ok(())
}
