use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{UsageApi, UsageProvider, UsageScope};
use crate::quota::{QuotaCheck, QuotaRequirements, RegionQuota};

#[derive(Debug)]
pub struct QuotaChecker {
    pub usage_api: Arc<dyn UsageApi>,
    pub requirements: QuotaRequirements,
}

impl QuotaChecker {
    /// Checks every region concurrently. Regions without any quota data are left out
    /// of the result; the rest keep their configured order.
    #[tracing::instrument(name = "quota::check_all_regions", skip(self, scope))]
    pub async fn check_all_regions(&self, scope: &UsageScope, regions: &[String]) -> Vec<RegionQuota> {
        let checks = regions
            .iter()
            .map(|region| self.check_region(scope, region));

        join_all(checks).await.into_iter().flatten().collect()
    }

    #[tracing::instrument(name = "quota::check_region", skip(self, scope))]
    pub async fn check_region(&self, scope: &UsageScope, region: &str) -> Option<RegionQuota> {
        let (postgres_quotas, container_apps_quotas) = tokio::join!(
            self.fetch_quotas(scope, UsageProvider::PostgresqlFlexibleServers, region),
            self.fetch_quotas(scope, UsageProvider::ContainerApps, region),
        );

        let mut quotas = postgres_quotas;
        quotas.extend(container_apps_quotas);

        let region_quota = RegionQuota::evaluate(region, quotas, &self.requirements);

        if region_quota.is_none() {
            tracing::info!("no quota data for region {region}, skipping");
        }

        region_quota
    }

    async fn fetch_quotas(
        &self,
        scope: &UsageScope,
        provider: UsageProvider,
        region: &str,
    ) -> BTreeMap<String, QuotaCheck> {
        match self.usage_api.list_usages(scope, provider, region).await {
            Ok(usages) => usages
                .into_iter()
                .map(|usage| {
                    (
                        provider.resource_name(&usage.name),
                        QuotaCheck::new(region, usage.current_value, usage.limit),
                    )
                })
                .collect(),
            Err(err) => {
                tracing::warn!(
                    "error checking {} quota for {region}: {err}",
                    provider.display_name()
                );

                BTreeMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockUsageClient;
    use crate::api::UsageError;
    use crate::test::get_usage_fixture;

    fn scope() -> UsageScope {
        UsageScope {
            subscription_id: "sub-1".to_string(),
            token: "token-1".to_string(),
        }
    }

    fn checker(usage_api: MockUsageClient) -> QuotaChecker {
        QuotaChecker {
            usage_api: Arc::new(usage_api),
            requirements: QuotaRequirements {
                min_postgres_vcores: 2.0,
                min_container_apps_cpu: 1.0,
            },
        }
    }

    #[tokio::test]
    async fn test_merges_both_providers() {
        let usage_api = MockUsageClient::default()
            .with_usages(
                UsageProvider::PostgresqlFlexibleServers,
                "eastus2",
                vec![get_usage_fixture("BurstableVCores", 5.0, 10.0)],
            )
            .with_usages(
                UsageProvider::ContainerApps,
                "eastus2",
                vec![get_usage_fixture("CpuCore", 5.0, 10.0)],
            );

        let region = checker(usage_api)
            .check_region(&scope(), "eastus2")
            .await
            .unwrap();

        assert_eq!(region.quotas.len(), 2);
        assert_eq!(region.quotas["BurstableVCores"].available, 5.0);
        assert_eq!(region.quotas["ContainerApps_CpuCore"].available, 5.0);
        assert!(region.has_sufficient_quota);
    }

    #[tokio::test]
    async fn test_one_failed_provider_still_reports_region() {
        let usage_api = MockUsageClient::default()
            .with_failure(
                UsageProvider::PostgresqlFlexibleServers,
                "westus2",
                UsageError::Transport("connection reset".to_string()),
            )
            .with_usages(
                UsageProvider::ContainerApps,
                "westus2",
                vec![get_usage_fixture("CpuCore", 99.5, 100.0)],
            );

        let region = checker(usage_api)
            .check_region(&scope(), "westus2")
            .await
            .unwrap();

        assert_eq!(region.quotas.len(), 1);
        assert!(!region.has_sufficient_quota);
    }

    #[tokio::test]
    async fn test_region_with_no_data_is_dropped() {
        let usage_api = MockUsageClient::default()
            .with_usages(
                UsageProvider::PostgresqlFlexibleServers,
                "eastus2",
                vec![get_usage_fixture("BurstableVCores", 0.0, 10.0)],
            )
            .with_failure(
                UsageProvider::PostgresqlFlexibleServers,
                "centralus",
                UsageError::Status {
                    status: 500,
                    url: "https://management.azure.com".to_string(),
                },
            );

        let checker = checker(usage_api);
        let regions = vec!["eastus2".to_string(), "centralus".to_string()];

        let results = checker.check_all_regions(&scope(), &regions).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].region, "eastus2");
    }

    #[tokio::test]
    async fn test_keeps_configured_region_order() {
        let regions = vec!["westus2".to_string(), "eastus2".to_string(), "centralus".to_string()];

        let usage_api = regions.iter().fold(MockUsageClient::default(), |usage_api, region| {
            usage_api.with_usages(
                UsageProvider::ContainerApps,
                region,
                vec![get_usage_fixture("CpuCore", 0.0, 10.0)],
            )
        });

        let checker = checker(usage_api);

        let results = checker.check_all_regions(&scope(), &regions).await;

        let ordered: Vec<&str> = results.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(ordered, vec!["westus2", "eastus2", "centralus"]);
    }
}
