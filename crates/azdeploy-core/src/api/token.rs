use async_trait::async_trait;
use std::fmt::Debug;

/// Source of bearer tokens for Azure Resource Manager calls.
#[async_trait]
pub trait TokenProvider: Debug + Send + Sync {
    async fn access_token(&self) -> anyhow::Result<String>;
}
