use anyhow::Context;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::DeploymentConfig;

pub const PARAMETERS_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentParameters.json#";

pub const ADMIN_PASSWORD_SECRET: &str = "postgresAdminPassword";

/// Builds the ARM deployment parameters document for `region`.
///
/// The admin password is never written out; it is a Key Vault reference resolved at
/// deployment time.
pub fn build_parameters(config: &DeploymentConfig, region: &str) -> Value {
    let postgresql = &config.required_services.postgresql;
    let container_apps = &config.required_services.container_apps.resources;

    json!({
        "$schema": PARAMETERS_SCHEMA,
        "contentVersion": "1.0.0.0",
        "parameters": {
            "location": {
                "value": region
            },
            "postgresAdminUser": {
                "value": config.database.admin_user
            },
            "postgresAdminPassword": {
                "reference": {
                    "keyVault": {
                        "id": "[parameters('keyVaultId')]"
                    },
                    "secretName": ADMIN_PASSWORD_SECRET
                }
            },
            "postgresDbName": {
                "value": config.database.name
            },
            "postgresSku": {
                "value": postgresql.sku
            },
            "postgresStorage": {
                "value": {
                    "storageSizeGB": postgresql.storage_gb
                }
            },
            "containerAppsCpu": {
                "value": container_apps.cpu
            },
            "containerAppsMemory": {
                "value": container_apps.memory
            },
            "tags": {
                "value": config.deployment.tags
            }
        }
    })
}

#[tracing::instrument(name = "bicep::write_parameters", skip(parameters))]
pub fn write_parameters(path: &Path, parameters: &Value) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(parameters)?;

    fs::write(path, contents)
        .with_context(|| format!("failed to write parameters to {}", path.display()))?;

    tracing::info!("wrote deployment parameters to {}", path.display());

    Ok(())
}
