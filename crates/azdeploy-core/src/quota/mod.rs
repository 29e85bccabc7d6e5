use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

mod checker;

pub use checker::QuotaChecker;

/// PostgreSQL flexible-server quota compared against `min_vcores`.
pub const POSTGRES_VCORES_QUOTA: &str = "BurstableVCores";

/// Container Apps quota compared against the configured cpu.
pub const CONTAINER_APPS_CPU_QUOTA: &str = "ContainerApps_CpuCore";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaCheck {
    pub region: String,
    #[serde(serialize_with = "serialize_count")]
    pub current_value: f64,
    #[serde(serialize_with = "serialize_count")]
    pub limit: f64,
    #[serde(serialize_with = "serialize_count")]
    pub available: f64,
}

// ARM reports counts as integers; keep `5` from turning into `5.0` on the way out
fn serialize_count<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl QuotaCheck {
    pub fn new(region: &str, current_value: f64, limit: f64) -> Self {
        Self {
            region: region.to_string(),
            current_value,
            limit,
            available: limit - current_value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuotaRequirements {
    pub min_postgres_vcores: f64,
    pub min_container_apps_cpu: f64,
}

impl QuotaRequirements {
    // a quota missing from the response does not count against the region
    pub fn is_satisfied_by(&self, quotas: &BTreeMap<String, QuotaCheck>) -> bool {
        let postgres_ok = quotas
            .get(POSTGRES_VCORES_QUOTA)
            .map_or(true, |quota| quota.available >= self.min_postgres_vcores);

        let container_apps_ok = quotas
            .get(CONTAINER_APPS_CPU_QUOTA)
            .map_or(true, |quota| quota.available >= self.min_container_apps_cpu);

        postgres_ok && container_apps_ok
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionQuota {
    pub region: String,
    pub quotas: BTreeMap<String, QuotaCheck>,
    pub has_sufficient_quota: bool,
}

impl RegionQuota {
    /// Returns `None` when there is no quota data at all for the region.
    pub fn evaluate(
        region: &str,
        quotas: BTreeMap<String, QuotaCheck>,
        requirements: &QuotaRequirements,
    ) -> Option<Self> {
        if quotas.is_empty() {
            return None;
        }

        let has_sufficient_quota = requirements.is_satisfied_by(&quotas);

        Some(Self {
            region: region.to_string(),
            quotas,
            has_sufficient_quota,
        })
    }
}
