use crate::classify::{short_listing_id, Classifier};
use crate::consolidate::{consolidate, CanonicalListing};
use crate::error::{CatalogError, Result};
use crate::extract::{clean_text, format_date, get_flag, get_str};
use crate::loader::RegionRecords;
use crate::regions::RegionFlags;
use crate::report::CatalogRow;
use crate::score::Scorer;
use crate::taxonomy::Taxonomy;
use tracing::{info, warn};

/// Runs the full batch: consolidation across realms, then classification and
/// scoring per canonical listing. The canonical map is built once and read
/// only afterwards.
pub struct CatalogEngine {
    taxonomy: Taxonomy,
}

impl CatalogEngine {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Process loaded region records into catalog rows. An error while
    /// deriving one listing drops that listing and continues; an entirely
    /// empty input is the distinguished empty-batch condition.
    pub fn process(&self, region_records: &RegionRecords) -> Result<Vec<CatalogRow>> {
        let total: usize = region_records.iter().map(|(_, records)| records.len()).sum();
        if total == 0 {
            return Err(CatalogError::EmptyBatch);
        }

        let consolidation = consolidate(region_records, &self.taxonomy);
        let mut rows = Vec::with_capacity(consolidation.listings.len());
        let mut dropped = 0usize;

        for listing in consolidation.listings.values() {
            match self.build_row(listing) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!("Error processing listing {}: {}", listing.id, e);
                    dropped += 1;
                }
            }
        }

        info!(
            "Processed {} listings for sales catalog ({} skipped at intake, {} dropped)",
            rows.len(),
            consolidation.skipped,
            dropped
        );
        Ok(rows)
    }

    /// Derive every output field for one canonical listing. This is the
    /// per-listing error boundary.
    fn build_row(&self, canonical: &CanonicalListing) -> Result<CatalogRow> {
        let listing = canonical.as_value();
        let classifier = Classifier::new(&self.taxonomy);
        let scorer = Scorer::new(&self.taxonomy);

        let corpus = Classifier::corpus(&listing);
        let flags = RegionFlags::resolve(&canonical.regions, &self.taxonomy);
        let compliance = classifier.compliance_profile(&corpus);
        let security_focused = classifier.is_security_focused(&corpus);

        let sales_priority = scorer.sales_priority(&listing, &flags, &compliance);
        let gov_priority = scorer.gov_priority(&flags, security_focused, &compliance);

        let yes_no = |b: bool| (if b { "Yes" } else { "No" }).to_string();
        let documentation_url = get_str(&listing, "documentation-url", "").to_string();
        let video_url = get_str(&listing, "video-url", "").to_string();

        Ok(CatalogRow {
            product_name: clean_text(get_str(&listing, "name", ""), Some(100)),
            publisher: Classifier::publisher_name(&listing),
            category: Classifier::category(&listing),
            short_description: clean_text(get_str(&listing, "short-description", ""), Some(150)),
            package_type: get_str(&listing, "package-type", "Standard").to_string(),

            commercial_available: yes_no(flags.commercial_available),
            us_gov_available: yes_no(flags.gov_available),
            us_dod_available: yes_no(flags.dod_available || flags.legacy_dod_available),
            uk_gov_available: yes_no(flags.uk_gov_available),
            total_regions: canonical.regions.len(),
            available_regions: canonical.region_names.join(" | "),
            primary_region: self.taxonomy.display_name(&canonical.primary_region),

            gov_authorization_level: flags.authorization.label().to_string(),
            gov_clearance_details: flags.authorization.detail().to_string(),
            fedramp_status: compliance.fedramp_status.clone(),
            dod_impact_level: compliance.impact_level.clone(),
            cmmc_level: compliance.cmmc_level.clone(),
            security_certifications: compliance.certifications.clone(),

            pricing_model: classifier.pricing_model(&listing),
            estimated_price: classifier.estimated_price(&listing),
            free_trial_available: yes_no(get_flag(&listing, "free-trial-available")),
            oracle_validated: yes_no(get_flag(&listing, "oracle-validated")),

            sales_priority_score: sales_priority,
            gov_sales_priority: gov_priority.to_string(),
            gov_priority,
            target_customer_size: classifier.target_customer_size(&listing, &corpus),
            industry_focus: classifier.industry_focus(&corpus),
            primary_use_case: classifier.primary_use_case(&listing),

            deployment_method: classifier.deployment_method(&listing),
            integration_complexity: classifier.integration_complexity(&listing, &corpus),
            supported_platforms: Classifier::supported_platforms(&listing),
            support_type: Classifier::support_type(&listing),
            oracle_partner_level: Classifier::partner_level(&listing),

            competitor_products: classifier.competitors(&listing),
            unique_value_prop: Classifier::value_proposition(&listing),
            demo_available: Classifier::demo_availability(&listing),
            poc_duration: classifier.poc_duration(&listing, &corpus),
            reference_customers: classifier.reference_availability(&listing),
            key_features: Classifier::key_features(&listing),
            implementation_timeline: classifier.implementation_timeline(&listing, &corpus),

            marketplace_url: Classifier::marketplace_url(&canonical.id),
            documentation_available: yes_no(!documentation_url.is_empty()),
            documentation_url,
            video_demo_url: video_url,

            listing_id: short_listing_id(&canonical.id).to_string(),
            last_updated: format_date(get_str(&listing, "time-updated", "")),
            gov_sales_notes: classifier.gov_sales_notes(&flags, &compliance),
            sales_strategy_notes: classifier.sales_strategy_notes(
                &listing,
                &flags,
                canonical.regions.len(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(pairs: Vec<(&str, Vec<serde_json::Value>)>) -> RegionRecords {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn empty_batch_is_distinguished() {
        let engine = CatalogEngine::new(Taxonomy::default());
        let input = records(vec![("commercial", vec![])]);
        match engine.process(&input) {
            Err(CatalogError::EmptyBatch) => {}
            other => panic!("expected EmptyBatch, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn malformed_records_do_not_abort_the_batch() {
        let engine = CatalogEngine::new(Taxonomy::default());
        let input = records(vec![(
            "commercial",
            vec![json!({"name": "no id"}), json!({"id": "ok", "name": "Fine"})],
        )]);
        let rows = engine.process(&input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Fine");
    }

    #[test]
    fn cross_region_listing_end_to_end() {
        let engine = CatalogEngine::new(Taxonomy::default());
        let input = records(vec![
            ("commercial", vec![json!({"id": "L1", "name": "Acme"})]),
            (
                "oc2_us_dod_east",
                vec![json!({
                    "id": "L1",
                    "name": "Acme Security Suite",
                    "short-description": "provides firewall protection",
                })],
            ),
        ]);
        let baseline_input = records(vec![(
            "commercial",
            vec![json!({"id": "L1", "name": "Acme"})],
        )]);

        let rows = engine.process(&input).unwrap();
        let row = &rows[0];
        // Name was merged first from commercial, description filled from DoD.
        assert_eq!(row.product_name, "Acme");
        assert!(row.short_description.contains("firewall"));
        assert_eq!(row.total_regions, 2);
        assert_eq!(row.us_dod_available, "Yes");
        assert_eq!(row.gov_authorization_level, "DoD Impact Level Ready");

        let baseline = engine.process(&baseline_input).unwrap();
        let dod_delta = engine.taxonomy().weights.sales.dod_region;
        assert_eq!(
            row.sales_priority_score,
            baseline[0].sales_priority_score + dod_delta
        );
    }
}
