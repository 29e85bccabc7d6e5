use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{Usage, UsageApi, UsageError, UsageProvider, UsageScope};

type UsageKey = (UsageProvider, String);

/// Canned usage responses keyed by provider and region. Lookups that were not
/// registered fail with a 404.
#[derive(Debug, Default)]
pub struct MockUsageClient {
    responses: HashMap<UsageKey, Result<Vec<Usage>, UsageError>>,
    pub calls: Mutex<Vec<UsageKey>>,
}

impl MockUsageClient {
    pub fn with_usages(mut self, provider: UsageProvider, region: &str, usages: Vec<Usage>) -> Self {
        self.responses
            .insert((provider, region.to_string()), Ok(usages));
        self
    }

    pub fn with_failure(mut self, provider: UsageProvider, region: &str, error: UsageError) -> Self {
        self.responses
            .insert((provider, region.to_string()), Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UsageApi for MockUsageClient {
    async fn list_usages(
        &self,
        _scope: &UsageScope,
        provider: UsageProvider,
        region: &str,
    ) -> Result<Vec<Usage>, UsageError> {
        let key = (provider, region.to_string());

        self.calls.lock().unwrap().push(key.clone());

        match self.responses.get(&key) {
            Some(response) => response.clone(),
            None => Err(UsageError::Status {
                status: 404,
                url: format!("mock://{}/{}", provider.display_name(), region),
            }),
        }
    }
}
