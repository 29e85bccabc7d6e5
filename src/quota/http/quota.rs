use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use azdeploy_core::RegionQuota;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::context::{Context, QuotaRunError};

#[derive(Debug, Deserialize, Serialize)]
pub struct QuotaResponse {
    pub regions: Vec<RegionQuota>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<QuotaRunError> for ApiError {
    fn from(err: QuotaRunError) -> Self {
        let status = match err {
            QuotaRunError::MissingSubscription => StatusCode::BAD_REQUEST,
            QuotaRunError::Token(_) => StatusCode::UNAUTHORIZED,
            QuotaRunError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

#[tracing::instrument(name = "http::check_quota", skip_all)]
pub async fn check_quota(
    Extension(context): Extension<Arc<Context>>,
) -> Result<Json<QuotaResponse>, ApiError> {
    let regions = context.check_quota().await.map_err(|err| {
        tracing::error!("quota check failed: {err:?}");
        ApiError::from(err)
    })?;

    Ok(Json(QuotaResponse { regions }))
}

#[cfg(test)]
mod tests {
    use azdeploy_core::api::mock::MockTokenProvider;

    use super::*;
    use crate::context::tests::make_context;

    #[tokio::test]
    async fn test_check_quota_returns_regions() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let context = make_context(&dir, Some("sub-1"), MockTokenProvider::with_token("t"));

        let Json(response) = check_quota(Extension(Arc::new(context))).await.unwrap();

        let regions: Vec<&str> = response.regions.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["eastus2", "westus2"]);

        let body = serde_json::to_value(&response)?;
        assert_eq!(body["regions"][0]["quotas"]["BurstableVCores"]["available"], 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_subscription_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let context = make_context(&dir, None, MockTokenProvider::with_token("t"));

        let err = check_quota(Extension(Arc::new(context))).await.unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "AZURE_SUBSCRIPTION_ID environment variable not set");
    }

    #[tokio::test]
    async fn test_token_failure_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let context = make_context(&dir, Some("sub-1"), MockTokenProvider::default());

        let err = check_quota(Extension(Arc::new(context))).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.detail, "Could not get Azure token");
    }

    #[tokio::test]
    async fn test_missing_config_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = make_context(&dir, Some("sub-1"), MockTokenProvider::with_token("t"));
        context.config_path = dir.path().join("missing.json");

        let err = check_quota(Extension(Arc::new(context))).await.unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.ends_with("missing.json not found"));
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::from(QuotaRunError::MissingSubscription).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
