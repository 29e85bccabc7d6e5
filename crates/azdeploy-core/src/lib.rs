pub mod api;
pub mod bicep;
pub mod config;
pub mod quota;

pub use api::{TokenProvider, Usage, UsageApi, UsageError, UsageProvider, UsageScope};
pub use config::{ConfigError, DeploymentConfig, DEFAULT_CONFIG_PATH};
pub use quota::{QuotaCheck, QuotaChecker, QuotaRequirements, RegionQuota};
