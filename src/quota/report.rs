use ascii_table::{Align, AsciiTable};
use azdeploy_core::RegionQuota;

use crate::context::Context;

const QUOTA_INCREASE_STEPS: [&str; 3] = [
    "1. Go to Azure Portal > Help + support > Create a support request",
    "2. Select 'Quota' and choose the service that needs more capacity",
    "3. Specify the required capacity increase",
];

pub fn status_label(region_quota: &RegionQuota) -> &'static str {
    if region_quota.has_sufficient_quota {
        "SUFFICIENT"
    } else {
        "INSUFFICIENT"
    }
}

pub fn table_rows(quotas: &[RegionQuota]) -> Vec<Vec<String>> {
    quotas
        .iter()
        .flat_map(|region_quota| {
            region_quota
                .quotas
                .iter()
                .map(move |(service_name, quota)| {
                    vec![
                        region_quota.region.clone(),
                        service_name.clone(),
                        format!("{}/{}", quota.available, quota.limit),
                        status_label(region_quota).to_string(),
                    ]
                })
        })
        .collect()
}

pub fn available_regions(quotas: &[RegionQuota]) -> Vec<&str> {
    quotas
        .iter()
        .filter(|region_quota| region_quota.has_sufficient_quota)
        .map(|region_quota| region_quota.region.as_str())
        .collect()
}

pub fn display_quota_results(quotas: &[RegionQuota]) {
    let table_data = table_rows(quotas);

    if table_data.is_empty() {
        println!("No quota data found");

        return;
    }

    let mut ascii_table = AsciiTable::default();

    for (index, header) in ["REGION", "SERVICE", "AVAILABLE/LIMIT", "STATUS"]
        .iter()
        .enumerate()
    {
        ascii_table
            .column(index)
            .set_header(*header)
            .set_align(Align::Left);
    }

    println!("Azure Service Quotas by Region");
    ascii_table.print(table_data);
}

pub async fn run(context: &Context) -> anyhow::Result<()> {
    let quotas = context.check_quota().await?;

    display_quota_results(&quotas);

    let available = available_regions(&quotas);

    if available.is_empty() {
        println!("\nNo regions have sufficient quota for deployment!");
        println!("\nTo request a quota increase:");
        for step in QUOTA_INCREASE_STEPS {
            println!("{step}");
        }

        return Err(anyhow::anyhow!("no regions have sufficient quota for deployment"));
    }

    println!("\nRegions available for deployment:");
    for region in available {
        println!("• {region}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use azdeploy_core::QuotaCheck;

    use super::*;

    fn region_quota(region: &str, has_sufficient_quota: bool) -> RegionQuota {
        let mut quotas = BTreeMap::new();
        quotas.insert(
            "BurstableVCores".to_string(),
            QuotaCheck::new(region, 5.0, 10.0),
        );
        quotas.insert(
            "ContainerApps_CpuCore".to_string(),
            QuotaCheck::new(region, 0.5, 100.0),
        );

        RegionQuota {
            region: region.to_string(),
            quotas,
            has_sufficient_quota,
        }
    }

    #[test]
    fn test_table_rows() {
        let quotas = vec![region_quota("eastus2", true), region_quota("westus2", false)];

        let rows = table_rows(&quotas);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["eastus2", "BurstableVCores", "5/10", "SUFFICIENT"]);
        assert_eq!(
            rows[1],
            vec!["eastus2", "ContainerApps_CpuCore", "99.5/100", "SUFFICIENT"]
        );
        assert_eq!(rows[3][3], "INSUFFICIENT");
    }

    #[test]
    fn test_available_regions() {
        let quotas = vec![
            region_quota("eastus2", false),
            region_quota("westus2", true),
            region_quota("centralus", true),
        ];

        assert_eq!(available_regions(&quotas), vec!["westus2", "centralus"]);
    }

    #[tokio::test]
    async fn test_run_fails_without_sufficient_region() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = crate::context::tests::make_context(
            &dir,
            Some("sub-1"),
            azdeploy_core::api::mock::MockTokenProvider::with_token("t"),
        );
        context.usage_api = std::sync::Arc::new(azdeploy_core::api::mock::MockUsageClient::default());

        assert!(run(&context).await.is_err());
    }

    #[tokio::test]
    async fn test_run_succeeds_with_a_sufficient_region() {
        let dir = tempfile::tempdir().unwrap();
        let context = crate::context::tests::make_context(
            &dir,
            Some("sub-1"),
            azdeploy_core::api::mock::MockTokenProvider::with_token("t"),
        );

        assert!(run(&context).await.is_ok());
    }
}
