use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::api::{Usage, UsageApi, UsageError, UsageList, UsageProvider, UsageScope, ARM_ENDPOINT};

/// Reads per-location usages from Azure Resource Manager.
///
/// Holds a single `reqwest::Client` so every lookup shares one connection pool.
#[derive(Clone, Debug)]
pub struct ArmUsageClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ArmUsageClient {
    pub fn new(http: reqwest::Client) -> anyhow::Result<Self> {
        Self::with_base_url(http, ARM_ENDPOINT)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn usages_url(
        &self,
        scope: &UsageScope,
        provider: UsageProvider,
        region: &str,
    ) -> Result<Url, UsageError> {
        let mut url = self
            .base_url
            .join(&provider.path(&scope.subscription_id, region))
            .map_err(|err| UsageError::InvalidUrl(err.to_string()))?;

        url.query_pairs_mut()
            .append_pair("api-version", provider.api_version());

        Ok(url)
    }
}

#[async_trait]
impl UsageApi for ArmUsageClient {
    #[tracing::instrument(name = "client::usage::list_usages", skip(self, scope))]
    async fn list_usages(
        &self,
        scope: &UsageScope,
        provider: UsageProvider,
        region: &str,
    ) -> Result<Vec<Usage>, UsageError> {
        let url = self.usages_url(scope, provider, region)?;

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&scope.token)
            .send()
            .await
            .map_err(|err| UsageError::Transport(err.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(UsageError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let usage_list: UsageList = response
            .json()
            .await
            .map_err(|err| UsageError::Malformed(err.to_string()))?;

        tracing::debug!("{} usages returned", usage_list.value.len());

        provider.decode(usage_list)
    }
}
