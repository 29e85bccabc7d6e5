use axum::{routing::get, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::context::Context;

pub mod health;
pub mod quota;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

pub fn http_router(context: Arc<Context>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/check-quota", get(quota::check_quota))
        .layer(Extension(context))
}

pub async fn serve(context: Context, bind_address: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_address.parse()?;

    let router = http_router(Arc::new(context))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    tracing::info!("quota service listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
