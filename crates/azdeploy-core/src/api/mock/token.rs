use async_trait::async_trait;

use crate::api::TokenProvider;

#[derive(Debug, Default)]
pub struct MockTokenProvider {
    pub token: Option<String>,
}

impl MockTokenProvider {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn access_token(&self) -> anyhow::Result<String> {
        self.token
            .clone()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))
    }
}
