use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use crate::api::TokenProvider;

const AZURE_CLI: &str = "az";

/// Delegates credential acquisition to an already logged-in Azure CLI.
#[derive(Debug)]
pub struct AzureCliTokenProvider {
    pub program: String,
}

impl Default for AzureCliTokenProvider {
    fn default() -> Self {
        Self {
            program: AZURE_CLI.to_string(),
        }
    }
}

#[async_trait]
impl TokenProvider for AzureCliTokenProvider {
    #[tracing::instrument(name = "client::token::access_token")]
    async fn access_token(&self) -> anyhow::Result<String> {
        let output = Command::new(&self.program)
            .args([
                "account",
                "get-access-token",
                "--query",
                "accessToken",
                "-o",
                "tsv",
            ])
            .output()
            .await
            .with_context(|| format!("failed to run '{} account get-access-token'", self.program))?;

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "'{} account get-access-token' failed ({}), please run 'az login' first: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if token.is_empty() {
            return Err(anyhow::anyhow!(
                "'{} account get-access-token' returned an empty token",
                self.program
            ));
        }

        Ok(token)
    }
}
