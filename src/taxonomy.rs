use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One marketplace realm/region in canonical processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSpec {
    pub key: String,
    pub file: String,
    pub display_name: String,
}

/// Alias lists that fold raw region keys into semantic groups. A region key
/// belongs to a group when it equals or starts with one of the group's
/// aliases (so "oc3_us_gov" covers both east and west).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionGroups {
    #[serde(default)]
    pub commercial: Vec<String>,
    #[serde(default)]
    pub gov: Vec<String>,
    #[serde(default)]
    pub dod: Vec<String>,
    #[serde(default)]
    pub legacy_dod: Vec<String>,
    #[serde(default)]
    pub uk_gov: Vec<String>,
}

impl RegionGroups {
    pub fn matches(aliases: &[String], region_key: &str) -> bool {
        aliases
            .iter()
            .any(|alias| region_key == alias || region_key.starts_with(alias.as_str()))
    }
}

/// A keyword rule: the label produced when any keyword is found in the
/// corpus. Ordinal dimensions evaluate rules top-to-bottom and stop at the
/// first match; set-valued dimensions collect every matching label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, corpus: &str) -> bool {
        self.keywords.iter().any(|k| corpus.contains(k.as_str()))
    }
}

/// Deltas for the 1-10 numeric sales priority score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesScoreWeights {
    pub base: i32,
    pub tier1_publisher: i32,
    pub tier2_publisher: i32,
    pub dod_region: i32,
    pub gov_region: i32,
    pub legacy_dod_region: i32,
    pub high_value_category: i32,
    pub compliance: i32,
    pub floor: i32,
    pub ceiling: i32,
}

impl Default for SalesScoreWeights {
    fn default() -> Self {
        Self {
            base: 5,
            tier1_publisher: 2,
            tier2_publisher: 1,
            dod_region: 3,
            gov_region: 2,
            legacy_dod_region: 1,
            high_value_category: 1,
            compliance: 1,
            floor: 1,
            ceiling: 10,
        }
    }
}

/// Deltas and bucket thresholds for the categorical government priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovPriorityWeights {
    pub dod_region: i32,
    pub legacy_dod_region: i32,
    pub gov_region: i32,
    pub security_focus: i32,
    pub fedramp: i32,
    pub cmmc: i32,
    pub critical_threshold: i32,
    pub high_threshold: i32,
    pub medium_threshold: i32,
}

impl Default for GovPriorityWeights {
    fn default() -> Self {
        Self {
            dod_region: 6,
            legacy_dod_region: 4,
            gov_region: 3,
            security_focus: 2,
            fedramp: 1,
            cmmc: 1,
            critical_threshold: 8,
            high_threshold: 5,
            medium_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default)]
    pub sales: SalesScoreWeights,
    #[serde(default)]
    pub gov: GovPriorityWeights,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sales: SalesScoreWeights::default(),
            gov: GovPriorityWeights::default(),
        }
    }
}

/// Everything deployment-specific: which region exports exist and in what
/// canonical order, how raw region keys group into realms, the keyword rule
/// tables behind every classification dimension, and the scoring weights.
/// Script variants with different realm taxonomies are different `Taxonomy`
/// documents, not different code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    pub regions: Vec<RegionSpec>,
    pub region_groups: RegionGroups,

    // Ordinal compliance ladders, most specific first.
    #[serde(default = "defaults::fedramp_rules")]
    pub fedramp_rules: Vec<KeywordRule>,
    #[serde(default = "defaults::impact_level_rules")]
    pub impact_level_rules: Vec<KeywordRule>,
    #[serde(default = "defaults::cmmc_rules")]
    pub cmmc_rules: Vec<KeywordRule>,

    // Set-valued dimensions: every matching rule contributes.
    #[serde(default = "defaults::certification_rules")]
    pub certification_rules: Vec<KeywordRule>,
    #[serde(default = "defaults::industry_rules")]
    pub industry_rules: Vec<KeywordRule>,

    // Single-valued sales dimensions.
    #[serde(default = "defaults::use_case_rules")]
    pub use_case_rules: Vec<KeywordRule>,
    #[serde(default = "defaults::competitor_rules")]
    pub competitor_rules: Vec<KeywordRule>,
    #[serde(default = "defaults::deployment_methods")]
    pub deployment_methods: HashMap<String, String>,
    #[serde(default = "defaults::pricing_models")]
    pub pricing_models: HashMap<String, String>,

    // Flat keyword lists.
    #[serde(default = "defaults::security_terms")]
    pub security_terms: Vec<String>,
    #[serde(default = "defaults::enterprise_terms")]
    pub enterprise_terms: Vec<String>,
    #[serde(default = "defaults::smb_terms")]
    pub smb_terms: Vec<String>,
    #[serde(default = "defaults::complexity_terms")]
    pub complexity_terms: Vec<String>,
    #[serde(default = "defaults::tier1_publishers")]
    pub tier1_publishers: Vec<String>,
    #[serde(default = "defaults::tier2_publishers")]
    pub tier2_publishers: Vec<String>,
    #[serde(default = "defaults::high_value_categories")]
    pub high_value_categories: Vec<String>,

    #[serde(default)]
    pub weights: ScoringWeights,
}

impl Taxonomy {
    /// Load a taxonomy document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let taxonomy: Taxonomy = serde_json::from_str(&content)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(CatalogError::Taxonomy(
                "taxonomy must configure at least one region".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.key.as_str()) {
                return Err(CatalogError::Taxonomy(format!(
                    "duplicate region key: {}",
                    region.key
                )));
            }
        }
        Ok(())
    }

    pub fn region_order(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.key.clone()).collect()
    }

    pub fn display_name(&self, region_key: &str) -> String {
        self.regions
            .iter()
            .find(|r| r.key == region_key)
            .map(|r| r.display_name.clone())
            .unwrap_or_else(|| region_key.to_string())
    }
}

impl Default for Taxonomy {
    /// The built-in deployment: OC1 commercial, OC3 US Gov, OC2 DoD and the
    /// legacy DoD realms. Commercial first so it wins field-merge precedence.
    fn default() -> Self {
        let region = |key: &str, file: &str, name: &str| RegionSpec {
            key: key.to_string(),
            file: file.to_string(),
            display_name: name.to_string(),
        };

        Self {
            regions: vec![
                region("commercial", "all_listings_commercial.json", "Commercial (OC1)"),
                region("oc3_us_gov_east", "oc3_us_gov_east_listings.json", "US Gov East (OC3)"),
                region("oc3_us_gov_west", "oc3_us_gov_west_listings.json", "US Gov West (OC3)"),
                region("oc2_us_dod_east", "oc2_us_dod_east_listings.json", "DoD East/Langley (OC2)"),
                region("oc2_us_dod_west", "oc2_us_dod_west_listings.json", "DoD West/Luke (OC2)"),
                region("legacy_us_dod_east", "legacy_us_dod_east_listings.json", "Legacy DoD East"),
                region("legacy_us_dod_central", "legacy_us_dod_central_listings.json", "Legacy DoD Central"),
                region("legacy_us_dod_west", "legacy_us_dod_west_listings.json", "Legacy DoD West"),
            ],
            region_groups: RegionGroups {
                commercial: vec!["commercial".to_string()],
                gov: vec!["oc3_us_gov".to_string()],
                dod: vec!["oc2_us_dod".to_string()],
                legacy_dod: vec!["legacy_us_dod".to_string()],
                uk_gov: vec!["uk_gov".to_string()],
            },
            fedramp_rules: defaults::fedramp_rules(),
            impact_level_rules: defaults::impact_level_rules(),
            cmmc_rules: defaults::cmmc_rules(),
            certification_rules: defaults::certification_rules(),
            industry_rules: defaults::industry_rules(),
            use_case_rules: defaults::use_case_rules(),
            competitor_rules: defaults::competitor_rules(),
            deployment_methods: defaults::deployment_methods(),
            pricing_models: defaults::pricing_models(),
            security_terms: defaults::security_terms(),
            enterprise_terms: defaults::enterprise_terms(),
            smb_terms: defaults::smb_terms(),
            complexity_terms: defaults::complexity_terms(),
            tier1_publishers: defaults::tier1_publishers(),
            tier2_publishers: defaults::tier2_publishers(),
            high_value_categories: defaults::high_value_categories(),
            weights: ScoringWeights::default(),
        }
    }
}

mod defaults {
    use super::KeywordRule;
    use std::collections::HashMap;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn fedramp_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("FedRAMP High", &["fedramp high"]),
            KeywordRule::new("FedRAMP Moderate", &["fedramp moderate"]),
            KeywordRule::new("FedRAMP Low", &["fedramp low", "fedramp authorized"]),
            KeywordRule::new("FedRAMP Ready", &["fedramp"]),
            KeywordRule::new("Federal Ready", &["fisma", "federal compliance"]),
        ]
    }

    pub fn impact_level_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("IL6 (Secret)", &["il6", "impact level 6"]),
            KeywordRule::new("IL5 (CUI High)", &["il5", "impact level 5"]),
            KeywordRule::new("IL4 (CUI)", &["il4", "impact level 4"]),
            KeywordRule::new("IL2 (Unclassified)", &["il2", "impact level 2"]),
            KeywordRule::new("DoD Compatible", &["dod", "defense", "classified"]),
        ]
    }

    pub fn cmmc_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("CMMC Level 3", &["cmmc level 3", "cmmc l3"]),
            KeywordRule::new("CMMC Level 2", &["cmmc level 2", "cmmc l2"]),
            KeywordRule::new("CMMC Level 1+", &["cmmc"]),
        ]
    }

    pub fn certification_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("SOC 2", &["soc 2", "soc2", "soc ii"]),
            KeywordRule::new("ISO 27001", &["iso 27001", "iso27001"]),
            KeywordRule::new("PCI DSS", &["pci dss", "pci-dss"]),
            KeywordRule::new("HIPAA", &["hipaa"]),
            KeywordRule::new("NIST", &["nist 800-53", "nist framework"]),
            KeywordRule::new("FIPS 140-2", &["fips 140-2", "fips 140"]),
        ]
    }

    pub fn industry_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("Healthcare", &["healthcare", "medical", "hipaa", "patient", "clinical"]),
            KeywordRule::new("Financial", &["financial", "banking", "fintech", "payment", "trading"]),
            KeywordRule::new("Government", &["government", "federal", "public sector", "civic"]),
            KeywordRule::new("Retail", &["retail", "ecommerce", "pos", "inventory"]),
            KeywordRule::new("Manufacturing", &["manufacturing", "industrial", "iot", "scada", "supply chain"]),
            KeywordRule::new("Education", &["education", "academic", "learning", "student", "university"]),
            KeywordRule::new("Energy", &["energy", "utility", "oil", "gas", "renewable"]),
        ]
    }

    pub fn use_case_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("Cybersecurity & Compliance", &["security"]),
            KeywordRule::new("Data Management", &["database"]),
            KeywordRule::new("Business Intelligence", &["analytics"]),
            KeywordRule::new("Network Infrastructure", &["networking"]),
            KeywordRule::new("Cloud Infrastructure", &["compute"]),
            KeywordRule::new("Data Storage & Backup", &["storage"]),
            KeywordRule::new("Performance Monitoring", &["monitoring"]),
            KeywordRule::new("System Integration", &["integration"]),
            KeywordRule::new("AI/ML Workloads", &["machine-learning"]),
            KeywordRule::new("Application Development", &["developer-tools"]),
        ]
    }

    pub fn competitor_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("Cisco ASA, Fortinet, Check Point", &["firewall"]),
            KeywordRule::new("F5, Citrix ADC, HAProxy", &["load balancer"]),
            KeywordRule::new("AWS RDS, Azure SQL, MongoDB Atlas", &["database"]),
            KeywordRule::new("Tableau, PowerBI, Qlik", &["analytics"]),
            KeywordRule::new("Datadog, New Relic, Splunk", &["monitoring"]),
            KeywordRule::new("Veeam, Commvault, Veritas", &["backup"]),
        ]
    }

    pub fn deployment_methods() -> HashMap<String, String> {
        map(&[
            ("IMAGE", "VM Image"),
            ("STACK", "Stack Template"),
            ("TERRAFORM", "Terraform"),
            ("CONTAINER", "Container"),
            ("HELM", "Helm Chart"),
            ("ORCHESTRATION", "Orchestration"),
        ])
    }

    pub fn pricing_models() -> HashMap<String, String> {
        map(&[
            ("FREE", "Free"),
            ("BYOL", "Bring Your Own License"),
            ("PAID", "Pay-As-You-Go"),
            ("SUBSCRIPTION", "Subscription"),
        ])
    }

    pub fn security_terms() -> Vec<String> {
        strings(&["security", "firewall", "vpn", "encryption", "auth", "siem", "vulnerability"])
    }

    pub fn enterprise_terms() -> Vec<String> {
        strings(&["enterprise", "scalable", "high availability", "multi-tenant"])
    }

    pub fn smb_terms() -> Vec<String> {
        strings(&["small business", "starter", "basic", "simple"])
    }

    pub fn complexity_terms() -> Vec<String> {
        strings(&["complex", "enterprise", "custom"])
    }

    pub fn tier1_publishers() -> Vec<String> {
        strings(&["oracle", "microsoft", "vmware", "cisco", "palo alto", "fortinet", "splunk"])
    }

    pub fn tier2_publishers() -> Vec<String> {
        strings(&["red hat", "citrix", "f5", "checkpoint", "crowdstrike"])
    }

    pub fn high_value_categories() -> Vec<String> {
        strings(&["security", "networking", "database", "analytics", "monitoring"])
    }
}
