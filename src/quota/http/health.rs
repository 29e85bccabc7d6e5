use axum::http::StatusCode;

/// Liveness only; never touches Azure or the config file.
#[tracing::instrument(name = "quota::http::health")]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
