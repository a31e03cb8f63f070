use crate::extract::{clean_text, get_flag, get_str, get_str_path, get_string_list};
use crate::regions::RegionFlags;
use crate::taxonomy::{KeywordRule, Taxonomy};
use itertools::Itertools;
use serde_json::Value;

const NOT_SPECIFIED: &str = "Not Specified";
const LISTING_OCID_PREFIX: &str = "ocid1.marketplace.listing.";

/// Derived compliance attributes for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceProfile {
    pub fedramp_status: String,
    pub impact_level: String,
    pub cmmc_level: String,
    pub certifications: String,
}

impl ComplianceProfile {
    pub fn has_fedramp(&self) -> bool {
        self.fedramp_status != NOT_SPECIFIED
    }

    pub fn has_cmmc(&self) -> bool {
        self.cmmc_level != NOT_SPECIFIED
    }
}

/// Keyword classification over a listing's text corpus. All rule tables and
/// label maps come from the taxonomy; this type only implements evaluation.
pub struct Classifier<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> Classifier<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Lower-cased concatenation of every free-text field. Missing fields
    /// contribute nothing; every keyword test runs against this corpus.
    pub fn corpus(listing: &Value) -> String {
        let mut parts: Vec<String> = vec![
            get_str(listing, "name", "").to_string(),
            get_str(listing, "short-description", "").to_string(),
            get_str(listing, "long-description", "").to_string(),
        ];
        parts.extend(get_string_list(listing, "tags"));
        parts.extend(get_string_list(listing, "keywords"));
        parts.join(" ").to_lowercase()
    }

    /// Ordinal evaluation: first rule whose keywords hit wins.
    fn first_match(rules: &[KeywordRule], corpus: &str, default: &str) -> String {
        rules
            .iter()
            .find(|rule| rule.matches(corpus))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| default.to_string())
    }

    /// Set evaluation: every matching rule contributes its label.
    fn all_matches(rules: &[KeywordRule], corpus: &str, fallback: &str) -> String {
        let labels: Vec<&str> = rules
            .iter()
            .filter(|rule| rule.matches(corpus))
            .map(|rule| rule.label.as_str())
            .collect();
        if labels.is_empty() {
            fallback.to_string()
        } else {
            labels.iter().join("; ")
        }
    }

    fn contains_any(terms: &[String], text: &str) -> bool {
        terms.iter().any(|t| text.contains(t.as_str()))
    }

    // --- compliance dimensions ---

    pub fn compliance_profile(&self, corpus: &str) -> ComplianceProfile {
        ComplianceProfile {
            fedramp_status: Self::first_match(&self.taxonomy.fedramp_rules, corpus, NOT_SPECIFIED),
            impact_level: Self::first_match(&self.taxonomy.impact_level_rules, corpus, NOT_SPECIFIED),
            cmmc_level: Self::first_match(&self.taxonomy.cmmc_rules, corpus, NOT_SPECIFIED),
            certifications: Self::all_matches(
                &self.taxonomy.certification_rules,
                corpus,
                "Standard Compliance",
            ),
        }
    }

    pub fn is_security_focused(&self, corpus: &str) -> bool {
        Self::contains_any(&self.taxonomy.security_terms, corpus)
    }

    // --- structured-field accessors shared by several dimensions ---

    pub fn publisher_name(listing: &Value) -> String {
        let by_name = get_str_path(listing, &["publisher", "name"], "");
        if !by_name.is_empty() {
            return clean_text(by_name, Some(50));
        }
        let by_display = get_str_path(listing, &["publisher", "display-name"], "");
        if !by_display.is_empty() {
            return clean_text(by_display, Some(50));
        }
        let flat = get_str(listing, "publisher", "");
        if !flat.is_empty() {
            return clean_text(flat, Some(50));
        }
        "Unknown Publisher".to_string()
    }

    pub fn category(listing: &Value) -> String {
        for key in ["categories", "category-facet"] {
            let values = get_string_list(listing, key);
            if let Some(first) = values.first() {
                return clean_text(first, Some(30));
            }
        }
        "Uncategorized".to_string()
    }

    pub fn pricing_model(&self, listing: &Value) -> String {
        let pricing_type = get_str_path(listing, &["pricing", "type"], "");
        if let Some(label) = self.taxonomy.pricing_models.get(pricing_type) {
            return label.clone();
        }
        if pricing_type.is_empty() {
            "Contact Sales".to_string()
        } else {
            pricing_type.to_string()
        }
    }

    pub fn estimated_price(&self, listing: &Value) -> String {
        match get_str_path(listing, &["pricing", "type"], "") {
            "FREE" => return "Free".to_string(),
            "BYOL" => return "License Required".to_string(),
            _ => {}
        }
        let rate = listing
            .get("pricing")
            .and_then(|p| p.get("rate"))
            .filter(|r| !r.is_null());
        if let Some(rate) = rate {
            let rate = match rate {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let unit = get_str_path(listing, &["pricing", "unit"], "hour");
            let currency = get_str_path(listing, &["pricing", "currency"], "USD");
            return format!("{} {}/{}", rate, currency, unit);
        }
        "Contact for Pricing".to_string()
    }

    // --- sales-derived dimensions ---

    pub fn target_customer_size(&self, listing: &Value, corpus: &str) -> String {
        if Self::contains_any(&self.taxonomy.enterprise_terms, corpus) {
            "Enterprise".to_string()
        } else if Self::contains_any(&self.taxonomy.smb_terms, corpus) {
            "Small Business".to_string()
        } else if self.pricing_model(listing) == "Free" {
            "All Sizes".to_string()
        } else {
            "Mid-Market".to_string()
        }
    }

    pub fn industry_focus(&self, corpus: &str) -> String {
        Self::all_matches(&self.taxonomy.industry_rules, corpus, "Cross-Industry")
    }

    /// Use case is keyed off category and name, not the full corpus.
    pub fn primary_use_case(&self, listing: &Value) -> String {
        let scope = format!(
            "{} {}",
            Self::category(listing).to_lowercase(),
            get_str(listing, "name", "").to_lowercase()
        );
        Self::first_match(&self.taxonomy.use_case_rules, &scope, "General Purpose")
    }

    pub fn deployment_method(&self, listing: &Value) -> String {
        let package_type = get_str(listing, "package-type", "").to_uppercase();
        self.taxonomy
            .deployment_methods
            .get(&package_type)
            .cloned()
            .unwrap_or_else(|| "Standard Deployment".to_string())
    }

    pub fn integration_complexity(&self, listing: &Value, corpus: &str) -> String {
        let package_type = get_str(listing, "package-type", "").to_uppercase();
        if package_type == "IMAGE" {
            "Low".to_string()
        } else if Self::contains_any(&self.taxonomy.complexity_terms, corpus) {
            "High".to_string()
        } else {
            "Medium".to_string()
        }
    }

    pub fn supported_platforms(listing: &Value) -> String {
        let os_list = get_string_list(listing, "supported-operating-systems");
        if os_list.is_empty() {
            "Oracle Linux Compatible".to_string()
        } else {
            os_list.iter().join("; ")
        }
    }

    pub fn support_type(listing: &Value) -> String {
        let publisher = Self::publisher_name(listing).to_lowercase();
        if publisher.contains("oracle") {
            "Oracle Support".to_string()
        } else if !get_str(listing, "support-url", "").is_empty() {
            "Vendor Support".to_string()
        } else {
            "Community Support".to_string()
        }
    }

    pub fn partner_level(listing: &Value) -> String {
        let publisher_type = get_str_path(listing, &["publisher", "type"], "").to_uppercase();
        let publisher = Self::publisher_name(listing).to_lowercase();
        if publisher_type.contains("ORACLE") || publisher.contains("oracle") {
            "Oracle".to_string()
        } else if get_flag(listing, "oracle-validated") {
            "Oracle Validated".to_string()
        } else {
            "ISV Partner".to_string()
        }
    }

    /// Competitors are keyed off name and category like the use case.
    pub fn competitors(&self, listing: &Value) -> String {
        let scope = format!(
            "{} {}",
            get_str(listing, "name", "").to_lowercase(),
            Self::category(listing).to_lowercase()
        );
        Self::first_match(&self.taxonomy.competitor_rules, &scope, "Various")
    }

    pub fn value_proposition(listing: &Value) -> String {
        let description = get_str(listing, "short-description", "");
        if description.is_empty() {
            return "Enterprise-grade solution".to_string();
        }
        let first_sentence = description.split('.').next().unwrap_or(description);
        clean_text(first_sentence, Some(100))
    }

    pub fn demo_availability(listing: &Value) -> String {
        if !get_str(listing, "video-url", "").is_empty() {
            "Video Demo".to_string()
        } else if get_flag(listing, "free-trial-available") {
            "Free Trial".to_string()
        } else {
            "Contact Sales".to_string()
        }
    }

    pub fn poc_duration(&self, listing: &Value, corpus: &str) -> String {
        match self.integration_complexity(listing, corpus).as_str() {
            "Low" => "1-2 weeks".to_string(),
            "Medium" => "2-4 weeks".to_string(),
            _ => "4-8 weeks".to_string(),
        }
    }

    pub fn implementation_timeline(&self, listing: &Value, corpus: &str) -> String {
        let package_type = get_str(listing, "package-type", "").to_uppercase();
        let complexity = self.integration_complexity(listing, corpus);
        if package_type == "IMAGE" && complexity == "Low" {
            "Same day".to_string()
        } else if complexity == "Low" {
            "1-3 days".to_string()
        } else if complexity == "Medium" {
            "1-2 weeks".to_string()
        } else {
            "2-4 weeks".to_string()
        }
    }

    pub fn reference_availability(&self, listing: &Value) -> String {
        let publisher = Self::publisher_name(listing).to_lowercase();
        if Self::contains_any(&self.taxonomy.tier1_publishers, &publisher) {
            "Available".to_string()
        } else {
            "Upon Request".to_string()
        }
    }

    /// Key features: sentences from the description that announce
    /// capabilities. Only the leading sentences are scanned.
    pub fn key_features(listing: &Value) -> String {
        let mut description = get_str(listing, "long-description", "");
        if description.is_empty() {
            description = get_str(listing, "short-description", "");
        }
        let indicators = ["provides", "enables", "includes", "features", "supports"];
        let features: Vec<String> = description
            .split('.')
            .take(3)
            .filter(|sentence| {
                let lower = sentence.to_lowercase();
                indicators.iter().any(|i| lower.contains(i))
            })
            .map(|sentence| clean_text(sentence, Some(50)))
            .filter(|s| !s.is_empty())
            .collect();
        if features.is_empty() {
            "See product description".to_string()
        } else {
            features.iter().join("; ")
        }
    }

    pub fn gov_sales_notes(&self, flags: &RegionFlags, compliance: &ComplianceProfile) -> String {
        let mut notes: Vec<String> = Vec::new();
        if flags.dod_available {
            notes.push("DoD Impact Level authorized".to_string());
        }
        if flags.gov_available {
            notes.push("FedRAMP government ready".to_string());
        }
        if flags.uk_gov_available {
            notes.push("UK Gov compatible".to_string());
        }
        if compliance.has_fedramp() {
            notes.push(compliance.fedramp_status.clone());
        }
        if notes.is_empty() {
            "Commercial deployment only".to_string()
        } else {
            notes.iter().join("; ")
        }
    }

    pub fn sales_strategy_notes(
        &self,
        listing: &Value,
        flags: &RegionFlags,
        region_count: usize,
    ) -> String {
        let mut notes: Vec<&str> = Vec::new();
        if region_count > 2 {
            notes.push("Multi-realm solution - high flexibility");
        }
        if flags.gov_available || flags.dod_available || flags.legacy_dod_available {
            notes.push("Government sales opportunity");
        }
        match self.pricing_model(listing).as_str() {
            "Free" => notes.push("Free tier available - easy customer adoption"),
            "Bring Your Own License" => notes.push("BYOL model - leverage existing licenses"),
            _ => {}
        }
        if notes.is_empty() {
            "Standard commercial approach".to_string()
        } else {
            notes.iter().join("; ")
        }
    }

    pub fn marketplace_url(listing_id: &str) -> String {
        format!(
            "https://cloudmarketplace.oracle.com/marketplace/en_US/listing/{}",
            short_listing_id(listing_id)
        )
    }
}

/// Strip the OCID prefix for display and URL use.
pub fn short_listing_id(listing_id: &str) -> &str {
    listing_id
        .strip_prefix(LISTING_OCID_PREFIX)
        .unwrap_or(listing_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use serde_json::json;

    fn classifier(taxonomy: &Taxonomy) -> Classifier<'_> {
        Classifier::new(taxonomy)
    }

    #[test]
    fn corpus_concatenates_text_fields_lowercased() {
        let listing = json!({
            "name": "Acme FIREWALL",
            "short-description": "Protects things",
            "tags": ["Enterprise", "VPN"],
        });
        let corpus = Classifier::corpus(&listing);
        assert!(corpus.contains("acme firewall"));
        assert!(corpus.contains("protects things"));
        assert!(corpus.contains("enterprise vpn"));
    }

    #[test]
    fn most_specific_impact_level_wins() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let profile = c.compliance_profile("supports il4 workloads and il6 enclaves");
        assert_eq!(profile.impact_level, "IL6 (Secret)");
    }

    #[test]
    fn generic_defense_terms_fall_through_to_dod_compatible() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let profile = c.compliance_profile("built for defense missions");
        assert_eq!(profile.impact_level, "DoD Compatible");
    }

    #[test]
    fn fedramp_ladder_precedence() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        assert_eq!(
            c.compliance_profile("fedramp high and fedramp moderate").fedramp_status,
            "FedRAMP High"
        );
        assert_eq!(c.compliance_profile("fedramp ready soon").fedramp_status, "FedRAMP Ready");
        assert_eq!(c.compliance_profile("fisma compliant").fedramp_status, "Federal Ready");
    }

    #[test]
    fn no_keyword_match_yields_not_specified() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let profile = c.compliance_profile("a plain business tool");
        assert_eq!(profile.fedramp_status, "Not Specified");
        assert_eq!(profile.impact_level, "Not Specified");
        assert_eq!(profile.cmmc_level, "Not Specified");
        assert_eq!(profile.certifications, "Standard Compliance");
        assert!(!profile.has_fedramp());
    }

    #[test]
    fn certifications_collect_all_matches() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let profile = c.compliance_profile("soc 2 type ii audited, hipaa ready, fips 140-2 validated");
        assert_eq!(profile.certifications, "SOC 2; HIPAA; FIPS 140-2");
    }

    #[test]
    fn industry_focus_joins_matches() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        assert_eq!(c.industry_focus("banking and healthcare analytics"), "Healthcare; Financial");
        assert_eq!(c.industry_focus("nothing industry specific"), "Cross-Industry");
    }

    #[test]
    fn publisher_name_fallbacks() {
        assert_eq!(
            Classifier::publisher_name(&json!({"publisher": {"name": "Acme Corp"}})),
            "Acme Corp"
        );
        assert_eq!(
            Classifier::publisher_name(&json!({"publisher": {"display-name": "Acme"}})),
            "Acme"
        );
        assert_eq!(Classifier::publisher_name(&json!({})), "Unknown Publisher");
    }

    #[test]
    fn pricing_model_mapping() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        assert_eq!(c.pricing_model(&json!({"pricing": {"type": "BYOL"}})), "Bring Your Own License");
        assert_eq!(c.pricing_model(&json!({"pricing": {"type": "CUSTOM"}})), "CUSTOM");
        assert_eq!(c.pricing_model(&json!({})), "Contact Sales");
    }

    #[test]
    fn estimated_price_formats_rate() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let listing = json!({"pricing": {"type": "PAID", "rate": "0.25", "unit": "hour", "currency": "USD"}});
        assert_eq!(c.estimated_price(&listing), "0.25 USD/hour");
        assert_eq!(c.estimated_price(&json!({"pricing": {"type": "FREE"}})), "Free");
        assert_eq!(c.estimated_price(&json!({})), "Contact for Pricing");
    }

    #[test]
    fn deployment_and_complexity() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let image = json!({"package-type": "IMAGE"});
        assert_eq!(c.deployment_method(&image), "VM Image");
        assert_eq!(c.integration_complexity(&image, ""), "Low");
        let stack = json!({"package-type": "STACK"});
        assert_eq!(c.integration_complexity(&stack, "simple setup"), "Medium");
        assert_eq!(c.integration_complexity(&stack, "custom enterprise rollout"), "High");
    }

    #[test]
    fn timeline_tracks_complexity() {
        let taxonomy = Taxonomy::default();
        let c = classifier(&taxonomy);
        let image = json!({"package-type": "IMAGE"});
        assert_eq!(c.implementation_timeline(&image, ""), "Same day");
        assert_eq!(c.poc_duration(&image, ""), "1-2 weeks");
        let helm = json!({"package-type": "HELM"});
        assert_eq!(c.implementation_timeline(&helm, ""), "1-2 weeks");
    }

    #[test]
    fn key_feature_sentences() {
        let listing = json!({
            "long-description": "Acme provides firewall protection. It runs anywhere. It supports IPv6."
        });
        let features = Classifier::key_features(&listing);
        assert!(features.contains("Acme provides firewall protection"));
        assert!(features.contains("It supports IPv6"));
        assert_eq!(Classifier::key_features(&json!({})), "See product description");
    }

    #[test]
    fn marketplace_url_strips_ocid_prefix() {
        assert_eq!(
            Classifier::marketplace_url("ocid1.marketplace.listing.abc123"),
            "https://cloudmarketplace.oracle.com/marketplace/en_US/listing/abc123"
        );
        assert_eq!(short_listing_id("plain-id"), "plain-id");
    }
}
