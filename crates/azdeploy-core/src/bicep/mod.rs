use std::path::PathBuf;

use crate::{DeploymentConfig, DEFAULT_CONFIG_PATH};

mod parameters;
mod regions;
mod template;

pub use parameters::{build_parameters, write_parameters, ADMIN_PASSWORD_SECRET, PARAMETERS_SCHEMA};
pub use regions::{
    validate_region, validate_region_against, RegionError, ServiceRegions, UnsupportedService,
    SERVICE_REGIONS,
};
pub use template::{patch_template, render_pg_server, update_template, PatchedTemplate};

pub const DEFAULT_TEMPLATE_PATH: &str = "infra/main.bicep";
pub const DEFAULT_PARAMETERS_PATH: &str = "infra/main.parameters.json";

#[derive(Clone, Debug)]
pub struct BicepPaths {
    pub config: PathBuf,
    pub template: PathBuf,
    pub parameters: PathBuf,
}

impl Default for BicepPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            template: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            parameters: PathBuf::from(DEFAULT_PARAMETERS_PATH),
        }
    }
}

/// Validates `region`, writes the parameters file and patches the template, in that
/// order. Nothing is written when validation fails.
#[tracing::instrument(name = "bicep::generate")]
pub fn generate(paths: &BicepPaths, region: &str) -> anyhow::Result<PatchedTemplate> {
    let config = DeploymentConfig::load(&paths.config)?;

    validate_region(&config, region)?;

    let parameters = build_parameters(&config, region);
    write_parameters(&paths.parameters, &parameters)?;

    update_template(&paths.template, &config)
}
