use crate::classify::{Classifier, ComplianceProfile};
use crate::regions::RegionFlags;
use crate::taxonomy::Taxonomy;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Four-level government sales priority, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GovPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl GovPriority {
    /// Numeric rank for sorting, CRITICAL highest.
    pub fn rank(&self) -> i32 {
        match self {
            GovPriority::Critical => 4,
            GovPriority::High => 3,
            GovPriority::Medium => 2,
            GovPriority::Low => 1,
        }
    }
}

impl fmt::Display for GovPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GovPriority::Critical => "CRITICAL",
            GovPriority::High => "HIGH",
            GovPriority::Medium => "MEDIUM",
            GovPriority::Low => "LOW",
        };
        write!(f, "{}", label)
    }
}

/// Priority scoring. Both scores are pure functions of the listing's current
/// fields and region flags; nothing is cached across merges.
pub struct Scorer<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> Scorer<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Numeric sales priority in [floor, ceiling] (1-10 by default): a base
    /// value plus deltas for publisher tier, government availability,
    /// high-value category, and recognized compliance.
    pub fn sales_priority(
        &self,
        listing: &Value,
        flags: &RegionFlags,
        compliance: &ComplianceProfile,
    ) -> i32 {
        let w = &self.taxonomy.weights.sales;
        let mut score = w.base;

        let publisher = Classifier::publisher_name(listing).to_lowercase();
        if self
            .taxonomy
            .tier1_publishers
            .iter()
            .any(|p| publisher.contains(p.as_str()))
        {
            score += w.tier1_publisher;
        } else if self
            .taxonomy
            .tier2_publishers
            .iter()
            .any(|p| publisher.contains(p.as_str()))
        {
            score += w.tier2_publisher;
        }

        // Region bonus is exclusive, best realm wins.
        if flags.dod_available {
            score += w.dod_region;
        } else if flags.gov_available {
            score += w.gov_region;
        } else if flags.legacy_dod_available {
            score += w.legacy_dod_region;
        }

        let category = Classifier::category(listing).to_lowercase();
        if self
            .taxonomy
            .high_value_categories
            .iter()
            .any(|c| category.contains(c.as_str()))
        {
            score += w.high_value_category;
        }

        if compliance.has_fedramp() {
            score += w.compliance;
        }

        score.clamp(w.floor, w.ceiling)
    }

    /// Categorical government priority: an independent additive score over
    /// realm availability, security focus, and compliance signals, bucketed
    /// by the configured thresholds.
    pub fn gov_priority(
        &self,
        flags: &RegionFlags,
        security_focused: bool,
        compliance: &ComplianceProfile,
    ) -> GovPriority {
        let w = &self.taxonomy.weights.gov;
        let mut score = 0;

        if flags.dod_available {
            score += w.dod_region;
        } else if flags.legacy_dod_available {
            score += w.legacy_dod_region;
        }
        if flags.gov_available {
            score += w.gov_region;
        }
        if security_focused {
            score += w.security_focus;
        }
        if compliance.has_fedramp() {
            score += w.fedramp;
        }
        if compliance.has_cmmc() {
            score += w.cmmc;
        }

        if score >= w.critical_threshold {
            GovPriority::Critical
        } else if score >= w.high_threshold {
            GovPriority::High
        } else if score >= w.medium_threshold {
            GovPriority::Medium
        } else {
            GovPriority::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixtures(region_keys: &[&str]) -> (Taxonomy, RegionFlags) {
        let taxonomy = Taxonomy::default();
        let keys: Vec<String> = region_keys.iter().map(|s| s.to_string()).collect();
        let flags = RegionFlags::resolve(&keys, &taxonomy);
        (taxonomy, flags)
    }

    fn profile(fedramp: &str, cmmc: &str) -> ComplianceProfile {
        ComplianceProfile {
            fedramp_status: fedramp.to_string(),
            impact_level: "Not Specified".to_string(),
            cmmc_level: cmmc.to_string(),
            certifications: "Standard Compliance".to_string(),
        }
    }

    #[test]
    fn base_score_for_plain_commercial_listing() {
        let (taxonomy, flags) = fixtures(&["commercial"]);
        let scorer = Scorer::new(&taxonomy);
        let listing = json!({"name": "Widget", "publisher": {"name": "Tiny ISV"}});
        let score = scorer.sales_priority(&listing, &flags, &profile("Not Specified", "Not Specified"));
        assert_eq!(score, 5);
    }

    #[test]
    fn deltas_accumulate_and_clamp_at_ceiling() {
        // tier1 (+2) + DoD (+3) + category (+1) + compliance (+1) on base 5
        // sums to 12 and must clamp to 10.
        let (taxonomy, flags) = fixtures(&["commercial", "oc2_us_dod_east"]);
        let scorer = Scorer::new(&taxonomy);
        let listing = json!({
            "name": "Next-Gen Firewall",
            "publisher": {"name": "Palo Alto Networks"},
            "categories": ["Security"],
        });
        let score = scorer.sales_priority(&listing, &flags, &profile("FedRAMP High", "Not Specified"));
        assert_eq!(score, 10);
    }

    #[test]
    fn tier1_beats_tier2_exclusively() {
        let (taxonomy, flags) = fixtures(&["commercial"]);
        let scorer = Scorer::new(&taxonomy);
        let p = profile("Not Specified", "Not Specified");
        let tier1 = json!({"publisher": {"name": "Microsoft Azure Team"}});
        let tier2 = json!({"publisher": {"name": "Red Hat Inc"}});
        assert_eq!(scorer.sales_priority(&tier1, &flags, &p), 7);
        assert_eq!(scorer.sales_priority(&tier2, &flags, &p), 6);
    }

    #[test]
    fn dod_region_bonus_beats_gov_and_legacy() {
        let taxonomy = Taxonomy::default();
        let scorer = Scorer::new(&taxonomy);
        let p = profile("Not Specified", "Not Specified");
        let listing = json!({"publisher": {"name": "Tiny ISV"}});

        let (_, dod) = fixtures(&["oc2_us_dod_east", "oc3_us_gov_east"]);
        assert_eq!(scorer.sales_priority(&listing, &dod, &p), 8);
        let (_, gov) = fixtures(&["oc3_us_gov_west"]);
        assert_eq!(scorer.sales_priority(&listing, &gov, &p), 7);
        let (_, legacy) = fixtures(&["legacy_us_dod_central"]);
        assert_eq!(scorer.sales_priority(&listing, &legacy, &p), 6);
    }

    #[test]
    fn gov_priority_buckets() {
        let taxonomy = Taxonomy::default();
        let scorer = Scorer::new(&taxonomy);

        // DoD (6) + gov (3) = 9 -> CRITICAL
        let (_, flags) = fixtures(&["oc2_us_dod_east", "oc3_us_gov_east"]);
        let p = profile("Not Specified", "Not Specified");
        assert_eq!(scorer.gov_priority(&flags, false, &p), GovPriority::Critical);

        // DoD alone (6) -> HIGH
        let (_, flags) = fixtures(&["oc2_us_dod_west"]);
        assert_eq!(scorer.gov_priority(&flags, false, &p), GovPriority::High);

        // gov (3) -> MEDIUM
        let (_, flags) = fixtures(&["oc3_us_gov_east"]);
        assert_eq!(scorer.gov_priority(&flags, false, &p), GovPriority::Medium);

        // security focus alone (2) -> LOW
        let (_, flags) = fixtures(&["commercial"]);
        assert_eq!(scorer.gov_priority(&flags, true, &p), GovPriority::Low);
    }

    #[test]
    fn compliance_signals_lift_gov_priority() {
        let taxonomy = Taxonomy::default();
        let scorer = Scorer::new(&taxonomy);
        // gov (3) + security (2) + fedramp (1) + cmmc (1) = 7 -> HIGH
        let (_, flags) = fixtures(&["oc3_us_gov_east"]);
        let p = profile("FedRAMP Moderate", "CMMC Level 2");
        assert_eq!(scorer.gov_priority(&flags, true, &p), GovPriority::High);
    }

    #[test]
    fn priority_display_labels() {
        assert_eq!(GovPriority::Critical.to_string(), "CRITICAL");
        assert_eq!(GovPriority::Low.to_string(), "LOW");
        assert!(GovPriority::Critical.rank() > GovPriority::High.rank());
    }
}
