use crate::error::Result;
use crate::score::GovPriority;
use chrono::Local;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One flat sales-catalog record. Header names match the established CSV
/// contract, so downstream dashboards keep working.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogRow {
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Publisher")]
    pub publisher: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Short_Description")]
    pub short_description: String,
    #[serde(rename = "Package_Type")]
    pub package_type: String,

    #[serde(rename = "Commercial_Available")]
    pub commercial_available: String,
    #[serde(rename = "US_Gov_Available")]
    pub us_gov_available: String,
    #[serde(rename = "US_DoD_Available")]
    pub us_dod_available: String,
    #[serde(rename = "UK_Gov_Available")]
    pub uk_gov_available: String,
    #[serde(rename = "Total_Regions")]
    pub total_regions: usize,
    #[serde(rename = "Available_Regions")]
    pub available_regions: String,
    #[serde(rename = "Primary_Region")]
    pub primary_region: String,

    #[serde(rename = "Gov_Authorization_Level")]
    pub gov_authorization_level: String,
    #[serde(rename = "Gov_Clearance_Details")]
    pub gov_clearance_details: String,
    #[serde(rename = "FedRAMP_Status")]
    pub fedramp_status: String,
    #[serde(rename = "DoD_Impact_Level")]
    pub dod_impact_level: String,
    #[serde(rename = "CMMC_Level")]
    pub cmmc_level: String,
    #[serde(rename = "Security_Certifications")]
    pub security_certifications: String,

    #[serde(rename = "Pricing_Model")]
    pub pricing_model: String,
    #[serde(rename = "Estimated_Price")]
    pub estimated_price: String,
    #[serde(rename = "Free_Trial_Available")]
    pub free_trial_available: String,
    #[serde(rename = "Oracle_Validated")]
    pub oracle_validated: String,

    #[serde(rename = "Sales_Priority_Score")]
    pub sales_priority_score: i32,
    #[serde(rename = "Gov_Sales_Priority")]
    pub gov_sales_priority: String,
    #[serde(skip)]
    pub gov_priority: GovPriority,
    #[serde(rename = "Target_Customer_Size")]
    pub target_customer_size: String,
    #[serde(rename = "Industry_Focus")]
    pub industry_focus: String,
    #[serde(rename = "Primary_Use_Case")]
    pub primary_use_case: String,

    #[serde(rename = "Deployment_Method")]
    pub deployment_method: String,
    #[serde(rename = "Integration_Complexity")]
    pub integration_complexity: String,
    #[serde(rename = "Supported_Platforms")]
    pub supported_platforms: String,
    #[serde(rename = "Support_Type")]
    pub support_type: String,
    #[serde(rename = "Oracle_Partner_Level")]
    pub oracle_partner_level: String,

    #[serde(rename = "Competitor_Products")]
    pub competitor_products: String,
    #[serde(rename = "Unique_Value_Prop")]
    pub unique_value_prop: String,
    #[serde(rename = "Demo_Available")]
    pub demo_available: String,
    #[serde(rename = "POC_Duration")]
    pub poc_duration: String,
    #[serde(rename = "Reference_Customers")]
    pub reference_customers: String,
    #[serde(rename = "Key_Features")]
    pub key_features: String,
    #[serde(rename = "Implementation_Timeline")]
    pub implementation_timeline: String,

    #[serde(rename = "Marketplace_URL")]
    pub marketplace_url: String,
    #[serde(rename = "Documentation_Available")]
    pub documentation_available: String,
    #[serde(rename = "Documentation_URL")]
    pub documentation_url: String,
    #[serde(rename = "Video_Demo_URL")]
    pub video_demo_url: String,

    #[serde(rename = "Listing_ID")]
    pub listing_id: String,
    #[serde(rename = "Last_Updated")]
    pub last_updated: String,
    #[serde(rename = "Gov_Sales_Notes")]
    pub gov_sales_notes: String,
    #[serde(rename = "Sales_Strategy_Notes")]
    pub sales_strategy_notes: String,
}

/// Government priority first, then numeric score, then listing id so equal
/// listings always land in the same order.
pub fn sort_rows(rows: &mut [CatalogRow]) {
    rows.sort_by(|a, b| {
        b.gov_priority
            .rank()
            .cmp(&a.gov_priority.rank())
            .then(b.sales_priority_score.cmp(&a.sales_priority_score))
            .then(a.listing_id.cmp(&b.listing_id))
    });
}

pub fn write_csv(rows: &[CatalogRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Sales catalog exported to: {}", path.display());
    Ok(())
}

/// Aggregate counts for the text summary report.
#[derive(Debug)]
pub struct Summary {
    pub total: usize,
    pub commercial_only: usize,
    pub us_gov: usize,
    pub us_dod: usize,
    pub uk_gov: usize,
    pub fedramp: usize,
    pub by_priority: Vec<(String, usize)>,
    pub by_pricing: Vec<(String, usize)>,
    pub top_categories: Vec<(String, usize)>,
    pub top_publishers: Vec<(String, usize)>,
}

fn counted(values: impl Iterator<Item = String>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(limit)
        .collect()
}

impl Summary {
    pub fn from_rows(rows: &[CatalogRow]) -> Self {
        let yes = |s: &str| s == "Yes";
        Self {
            total: rows.len(),
            commercial_only: rows
                .iter()
                .filter(|r| {
                    !yes(&r.us_gov_available) && !yes(&r.us_dod_available) && !yes(&r.uk_gov_available)
                })
                .count(),
            us_gov: rows.iter().filter(|r| yes(&r.us_gov_available)).count(),
            us_dod: rows.iter().filter(|r| yes(&r.us_dod_available)).count(),
            uk_gov: rows.iter().filter(|r| yes(&r.uk_gov_available)).count(),
            fedramp: rows
                .iter()
                .filter(|r| r.fedramp_status != "Not Specified")
                .count(),
            by_priority: counted(rows.iter().map(|r| r.gov_sales_priority.clone()), usize::MAX),
            by_pricing: counted(rows.iter().map(|r| r.pricing_model.clone()), usize::MAX),
            top_categories: counted(rows.iter().map(|r| r.category.clone()), 10),
            top_publishers: counted(rows.iter().map(|r| r.publisher.clone()), 10),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        writeln!(file, "Oracle Cloud Marketplace Sales Summary")?;
        writeln!(file, "{}", "=".repeat(50))?;
        writeln!(file)?;
        writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M"))?;
        writeln!(file)?;
        writeln!(file, "Total Products: {}", self.total)?;
        writeln!(file)?;
        writeln!(file, "By Region:")?;
        writeln!(file, "  - Commercial Only: {}", self.commercial_only)?;
        writeln!(file, "  - US Government: {}", self.us_gov)?;
        writeln!(file, "  - US DoD: {}", self.us_dod)?;
        writeln!(file, "  - UK Government: {}", self.uk_gov)?;
        writeln!(file)?;
        writeln!(file, "FedRAMP Products: {}", self.fedramp)?;
        writeln!(file)?;
        for (title, entries) in [
            ("By Gov Sales Priority:", &self.by_priority),
            ("By Pricing Model:", &self.by_pricing),
            ("Top Categories:", &self.top_categories),
            ("Top Publishers:", &self.top_publishers),
        ] {
            writeln!(file, "{}", title)?;
            for (label, count) in entries {
                writeln!(file, "  - {}: {}", label, count)?;
            }
            writeln!(file)?;
        }
        info!("Sales summary report created: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CatalogEngine;
    use crate::taxonomy::Taxonomy;
    use serde_json::json;

    fn rows() -> Vec<CatalogRow> {
        let engine = CatalogEngine::new(Taxonomy::default());
        let input = vec![
            (
                "commercial".to_string(),
                vec![
                    json!({"id": "b-plain", "name": "Plain Tool"}),
                    json!({"id": "a-gov", "name": "Gov Firewall", "categories": ["Security"]}),
                ],
            ),
            (
                "oc2_us_dod_east".to_string(),
                vec![json!({"id": "a-gov", "name": "Gov Firewall", "categories": ["Security"]})],
            ),
        ];
        engine.process(&input).unwrap()
    }

    #[test]
    fn sorting_puts_high_priority_first() {
        let mut rows = rows();
        sort_rows(&mut rows);
        assert_eq!(rows[0].listing_id, "a-gov");
        assert!(rows[0].gov_priority.rank() >= rows[1].gov_priority.rank());
    }

    #[test]
    fn summary_counts() {
        let summary = Summary::from_rows(&rows());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.us_dod, 1);
        assert_eq!(summary.commercial_only, 1);
        assert!(summary.by_priority.iter().map(|(_, c)| c).sum::<usize>() == 2);
    }

    #[test]
    fn csv_round_trips_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        let mut all = rows();
        sort_rows(&mut all);
        write_csv(&all, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Product_Name,Publisher,Category"));
        assert!(header.contains("Gov_Sales_Priority"));
        assert!(!header.contains("gov_priority"));
        assert_eq!(lines.count(), 2);
    }
}
