use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::{self, Debug};

pub const ARM_ENDPOINT: &str = "https://management.azure.com";

const CONTAINER_APPS_QUOTA_PREFIX: &str = "ContainerApps_";

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum UsageError {
    #[error("invalid usage url: {0}")]
    InvalidUrl(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed usage response: {0}")]
    Malformed(String),
}

/// ARM resource providers whose per-location usages are checked.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UsageProvider {
    PostgresqlFlexibleServers,
    ContainerApps,
}

impl UsageProvider {
    pub fn api_version(&self) -> &'static str {
        match self {
            UsageProvider::PostgresqlFlexibleServers => "2024-11-01-preview",
            UsageProvider::ContainerApps => "2023-05-01",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UsageProvider::PostgresqlFlexibleServers => "PostgreSQL",
            UsageProvider::ContainerApps => "Container Apps",
        }
    }

    pub fn path(&self, subscription_id: &str, region: &str) -> String {
        match self {
            UsageProvider::PostgresqlFlexibleServers => format!(
                "/subscriptions/{subscription_id}/providers/Microsoft.DBforPostgreSQL/locations/{region}/resourceType/flexibleServers/usages"
            ),
            UsageProvider::ContainerApps => format!(
                "/subscriptions/{subscription_id}/providers/Microsoft.App/locations/{region}/usages"
            ),
        }
    }

    /// Key a usage is reported under once merged with the other provider's usages.
    pub fn resource_name(&self, usage_name: &str) -> String {
        match self {
            UsageProvider::PostgresqlFlexibleServers => usage_name.to_string(),
            UsageProvider::ContainerApps => format!("{CONTAINER_APPS_QUOTA_PREFIX}{usage_name}"),
        }
    }

    /// PostgreSQL entries must carry both counters; Container Apps entries default
    /// missing counters to zero.
    pub fn decode(&self, usage_list: UsageList) -> Result<Vec<Usage>, UsageError> {
        usage_list
            .value
            .into_iter()
            .map(|raw| match self {
                UsageProvider::PostgresqlFlexibleServers => {
                    let current_value = raw.current_value.ok_or_else(|| {
                        UsageError::Malformed(format!("{} has no currentValue", raw.name.value))
                    })?;
                    let limit = raw.limit.ok_or_else(|| {
                        UsageError::Malformed(format!("{} has no limit", raw.name.value))
                    })?;

                    Ok(Usage {
                        name: raw.name.value,
                        current_value,
                        limit,
                    })
                }
                UsageProvider::ContainerApps => Ok(Usage {
                    name: raw.name.value,
                    current_value: raw.current_value.unwrap_or_default(),
                    limit: raw.limit.unwrap_or_default(),
                }),
            })
            .collect()
    }
}

/// Subscription and credential a usage lookup runs under.
#[derive(Clone)]
pub struct UsageScope {
    pub subscription_id: String,
    pub token: String,
}

impl Debug for UsageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageScope")
            .field("subscription_id", &self.subscription_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Usage {
    pub name: String,
    pub current_value: f64,
    pub limit: f64,
}

// wire format of an ARM `usages` listing

#[derive(Debug, Default, Deserialize)]
pub struct UsageList {
    #[serde(default)]
    pub value: Vec<RawUsage>,
}

#[derive(Debug, Deserialize)]
pub struct RawUsage {
    pub name: UsageName,
    #[serde(rename = "currentValue")]
    pub current_value: Option<f64>,
    pub limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UsageName {
    pub value: String,
    #[serde(rename = "localizedValue")]
    pub localized_value: Option<String>,
}

#[async_trait]
pub trait UsageApi: Debug + Send + Sync {
    async fn list_usages(
        &self,
        scope: &UsageScope,
        provider: UsageProvider,
        region: &str,
    ) -> Result<Vec<Usage>, UsageError>;
}
