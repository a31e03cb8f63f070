use crate::taxonomy::{RegionGroups, Taxonomy};
use serde::Serialize;

/// Ordinal government authorization level, highest clearance first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthorizationLevel {
    DodImpactLevelReady,
    DodLegacyAuthorized,
    FedRampAuthority,
    CommercialOnly,
}

impl AuthorizationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AuthorizationLevel::DodImpactLevelReady => "DoD Impact Level Ready",
            AuthorizationLevel::DodLegacyAuthorized => "DoD Legacy Authorized",
            AuthorizationLevel::FedRampAuthority => "FedRAMP Authority",
            AuthorizationLevel::CommercialOnly => "Commercial Only",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            AuthorizationLevel::DodImpactLevelReady => "Authorized for DoD classified environments",
            AuthorizationLevel::DodLegacyAuthorized => "Available in legacy DoD regions",
            AuthorizationLevel::FedRampAuthority => "Authorized for US Government use",
            AuthorizationLevel::CommercialOnly => "Not yet government authorized",
        }
    }
}

/// Semantic availability flags for a listing's region set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFlags {
    pub commercial_available: bool,
    pub gov_available: bool,
    pub dod_available: bool,
    pub legacy_dod_available: bool,
    pub uk_gov_available: bool,
    pub authorization: AuthorizationLevel,
}

impl RegionFlags {
    /// Fold raw region keys into group flags via the taxonomy's alias lists,
    /// then pick the authorization level by ordinal precedence: current DoD
    /// realms outrank legacy DoD, which outranks civilian government.
    pub fn resolve(region_keys: &[String], taxonomy: &Taxonomy) -> Self {
        let groups = &taxonomy.region_groups;
        let any = |aliases: &[String]| {
            region_keys
                .iter()
                .any(|key| RegionGroups::matches(aliases, key))
        };

        let commercial_available = any(&groups.commercial);
        let gov_available = any(&groups.gov);
        let dod_available = any(&groups.dod);
        let legacy_dod_available = any(&groups.legacy_dod);
        let uk_gov_available = any(&groups.uk_gov);

        let authorization = if dod_available {
            AuthorizationLevel::DodImpactLevelReady
        } else if legacy_dod_available {
            AuthorizationLevel::DodLegacyAuthorized
        } else if gov_available {
            AuthorizationLevel::FedRampAuthority
        } else {
            AuthorizationLevel::CommercialOnly
        };

        Self {
            commercial_available,
            gov_available,
            dod_available,
            legacy_dod_available,
            uk_gov_available,
            authorization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn gov_aliases_or_together() {
        let taxonomy = Taxonomy::default();
        let flags = RegionFlags::resolve(&keys(&["oc3_us_gov_west"]), &taxonomy);
        assert!(flags.gov_available);
        assert!(!flags.dod_available);
        assert_eq!(flags.authorization, AuthorizationLevel::FedRampAuthority);
    }

    #[test]
    fn dod_outranks_gov_and_legacy() {
        let taxonomy = Taxonomy::default();
        let flags = RegionFlags::resolve(
            &keys(&["oc3_us_gov_east", "legacy_us_dod_west", "oc2_us_dod_east"]),
            &taxonomy,
        );
        assert!(flags.dod_available && flags.gov_available && flags.legacy_dod_available);
        assert_eq!(flags.authorization, AuthorizationLevel::DodImpactLevelReady);
    }

    #[test]
    fn legacy_dod_outranks_gov() {
        let taxonomy = Taxonomy::default();
        let flags = RegionFlags::resolve(&keys(&["oc3_us_gov_east", "legacy_us_dod_central"]), &taxonomy);
        assert_eq!(flags.authorization, AuthorizationLevel::DodLegacyAuthorized);
    }

    #[test]
    fn commercial_only_fallback() {
        let taxonomy = Taxonomy::default();
        let flags = RegionFlags::resolve(&keys(&["commercial"]), &taxonomy);
        assert!(flags.commercial_available);
        assert_eq!(flags.authorization, AuthorizationLevel::CommercialOnly);
        assert_eq!(flags.authorization.label(), "Commercial Only");
    }
}
