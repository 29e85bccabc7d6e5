use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, io, path::Path};

use crate::quota::QuotaRequirements;

pub const DEFAULT_CONFIG_PATH: &str = "infra/azure-config.json";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} not found")]
    FileNotFound(String),

    #[error("failed to parse {path}: {message}")]
    ParsingError { path: String, message: String },

    #[error("failed to read {path}: {message}")]
    Unknown { path: String, message: String },
}

/// Deployment config shared by the quota checker and the bicep generator.
///
/// Read fresh on every invocation and never written back. Fields that end up in the
/// parameters file (`sku`, `storage_gb`, `cpu`, `tags`) are kept as raw JSON so they pass
/// through unchanged, whether written as integers, floats or strings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeploymentConfig {
    pub allowed_regions: Vec<String>,
    pub required_services: RequiredServices,
    pub database: DatabaseConfig,
    pub deployment: DeploymentSettings,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RequiredServices {
    pub postgresql: PostgresqlRequirements,
    pub container_apps: ContainerAppsRequirements,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PostgresqlRequirements {
    pub min_vcores: Value,
    pub sku: Value,
    pub storage_gb: Value,
    pub version: Value,
}

/// Reads a threshold written either as a JSON number or a numeric string.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn threshold(field: &str, value: &Value) -> f64 {
    numeric_value(value).unwrap_or_else(|| {
        tracing::warn!("{field} {value} is not numeric, using 0");
        0.0
    })
}

impl PostgresqlRequirements {
    // version may be written as "16" or 16
    pub fn version_label(&self) -> String {
        match &self.version {
            Value::String(version) => version.clone(),
            version => version.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ContainerAppsRequirements {
    pub resources: ContainerAppsResources,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ContainerAppsResources {
    pub cpu: Value,
    pub memory: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub admin_user: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeploymentSettings {
    pub tags: Map<String, Value>,
}

impl DeploymentConfig {
    #[tracing::instrument(name = "config::load")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(raw_contents) => Ok(raw_contents),
            Err(error) => match error.kind() {
                io::ErrorKind::NotFound => {
                    Err(ConfigError::FileNotFound(path.display().to_string()))
                }
                _ => Err(ConfigError::Unknown {
                    path: path.display().to_string(),
                    message: error.to_string(),
                }),
            },
        }?;

        serde_json::from_str(&contents).map_err(|error| ConfigError::ParsingError {
            path: path.display().to_string(),
            message: error.to_string(),
        })
    }

    pub fn is_region_allowed(&self, region: &str) -> bool {
        self.allowed_regions.iter().any(|allowed| allowed == region)
    }

    pub fn quota_requirements(&self) -> QuotaRequirements {
        let postgresql = &self.required_services.postgresql;
        let container_apps = &self.required_services.container_apps.resources;

        QuotaRequirements {
            min_postgres_vcores: threshold("min_vcores", &postgresql.min_vcores),
            min_container_apps_cpu: threshold("container_apps cpu", &container_apps.cpu),
        }
    }
}
