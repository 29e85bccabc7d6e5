use lazy_static::lazy_static;
use std::collections::BTreeMap;

use crate::DeploymentConfig;

pub type ServiceRegions = BTreeMap<&'static str, Vec<&'static str>>;

lazy_static! {
    /// Regions each deployed service type is available in.
    pub static ref SERVICE_REGIONS: ServiceRegions = {
        let mut service_regions = BTreeMap::new();

        service_regions.insert(
            "Microsoft.Web/staticSites",
            vec!["westus2", "centralus", "eastus2", "westeurope", "eastasia"],
        );

        service_regions
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnsupportedService {
    pub service_type: String,
    pub supported_regions: Vec<String>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegionError {
    #[error("Region '{region}' is not in the allowed regions list:\nAllowed regions: {}", .allowed.join(", "))]
    NotAllowed { region: String, allowed: Vec<String> },

    #[error("Region '{region}' is not supported by all required services:{}", format_unsupported(.services))]
    Unsupported {
        region: String,
        services: Vec<UnsupportedService>,
    },
}

fn format_unsupported(services: &[UnsupportedService]) -> String {
    services
        .iter()
        .map(|service| {
            format!(
                "\n\n{}:\nSupported regions: {}",
                service.service_type,
                service.supported_regions.join(", ")
            )
        })
        .collect()
}

pub fn validate_region(config: &DeploymentConfig, region: &str) -> Result<(), RegionError> {
    validate_region_against(config, region, &SERVICE_REGIONS)
}

/// Checks the allow-list first, then every service in `service_regions`.
pub fn validate_region_against(
    config: &DeploymentConfig,
    region: &str,
    service_regions: &ServiceRegions,
) -> Result<(), RegionError> {
    if !config.is_region_allowed(region) {
        return Err(RegionError::NotAllowed {
            region: region.to_string(),
            allowed: config.allowed_regions.clone(),
        });
    }

    let services: Vec<UnsupportedService> = service_regions
        .iter()
        .filter(|(_, supported_regions)| {
            !supported_regions
                .iter()
                .any(|supported| *supported == region)
        })
        .map(|(service_type, supported_regions)| UnsupportedService {
            service_type: service_type.to_string(),
            supported_regions: supported_regions.iter().map(|r| r.to_string()).collect(),
        })
        .collect();

    if !services.is_empty() {
        return Err(RegionError::Unsupported {
            region: region.to_string(),
            services,
        });
    }

    Ok(())
}
