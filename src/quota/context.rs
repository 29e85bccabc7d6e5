use std::path::PathBuf;
use std::sync::Arc;

use azdeploy_core::api::client::{ArmUsageClient, AzureCliTokenProvider};
use azdeploy_core::{
    ConfigError, DeploymentConfig, QuotaChecker, RegionQuota, TokenProvider, UsageApi, UsageScope,
};

pub const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";

#[derive(thiserror::Error, Debug)]
pub enum QuotaRunError {
    #[error("AZURE_SUBSCRIPTION_ID environment variable not set")]
    MissingSubscription,

    #[error("Could not get Azure token")]
    Token(#[source] anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug)]
pub struct Context {
    pub config_path: PathBuf,
    pub subscription_id: Option<String>,

    pub token_provider: Arc<dyn TokenProvider>,
    pub usage_api: Arc<dyn UsageApi>,
}

impl Context {
    pub fn new(config_path: PathBuf) -> anyhow::Result<Self> {
        let subscription_id = dotenvy::var(SUBSCRIPTION_ID_VAR)
            .ok()
            .filter(|subscription_id| !subscription_id.is_empty());

        Ok(Self {
            config_path,
            subscription_id,
            token_provider: Arc::new(AzureCliTokenProvider::default()),
            usage_api: Arc::new(ArmUsageClient::new(reqwest::Client::new())?),
        })
    }

    /// Runs a full quota check: subscription, then token, then config, then the
    /// per-region fan-out.
    #[tracing::instrument(name = "context::check_quota", skip(self))]
    pub async fn check_quota(&self) -> Result<Vec<RegionQuota>, QuotaRunError> {
        let subscription_id = self
            .subscription_id
            .clone()
            .ok_or(QuotaRunError::MissingSubscription)?;

        let token = self
            .token_provider
            .access_token()
            .await
            .map_err(QuotaRunError::Token)?;

        let config = DeploymentConfig::load(&self.config_path)?;

        let checker = QuotaChecker {
            usage_api: Arc::clone(&self.usage_api),
            requirements: config.quota_requirements(),
        };

        let scope = UsageScope {
            subscription_id,
            token,
        };

        Ok(checker
            .check_all_regions(&scope, &config.allowed_regions)
            .await)
    }
}
