//! REST API for waitlist registration and the blog.
//!
//! Serves the registration endpoint the terminal form submits to, the public
//! blog listing, and token-guarded blog administration.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Waitlist
        .route("/api/v1/waitlist", post(routes::waitlist::register))
        // Blog
        .route("/api/v1/posts", get(routes::posts::list))
        .route("/api/v1/posts/:slug", get(routes::posts::get_by_slug))
        // Blog admin
        .route(
            "/api/v1/admin/posts",
            get(routes::admin::list_all).post(routes::admin::create),
        )
        .route(
            "/api/v1/admin/posts/:id",
            put(routes::admin::update).delete(routes::admin::delete),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on all interfaces
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    serve_listener(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C
pub async fn serve_listener(listener: TcpListener, state: ApiState) -> Result<()> {
    let app = build_router(state);
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

/// Resolve when `signal` fires.
///
/// If the signal handler cannot be installed the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("REST API shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
