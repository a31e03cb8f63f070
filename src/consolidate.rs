use crate::extract::is_empty_value;
use crate::loader::{record_id, RegionRecords};
use crate::taxonomy::Taxonomy;
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One product de-duplicated across realms: the union of fields seen in any
/// region plus the set of regions that carry it.
#[derive(Debug, Clone)]
pub struct CanonicalListing {
    pub id: String,
    pub fields: Map<String, Value>,
    /// Region keys in first-seen order. Processing follows the taxonomy's
    /// region order, so this is deterministic.
    pub regions: Vec<String>,
    /// First region (in canonical order) that carried the listing.
    pub primary_region: String,
    /// Human-readable names for the regions, de-duplicated.
    pub region_names: Vec<String>,
}

impl CanonicalListing {
    pub fn in_region(&self, region_key: &str) -> bool {
        self.regions.iter().any(|r| r == region_key)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

#[derive(Debug)]
pub struct ConsolidationResult {
    pub listings: BTreeMap<String, CanonicalListing>,
    /// Raw records excluded for having no usable identifier.
    pub skipped: usize,
}

/// Merge per-region raw records into canonical listings.
///
/// Regions are processed in the order given (the taxonomy's configured
/// order), and field precedence is first-non-empty-wins: a later region can
/// only fill fields the canonical record lacks or holds null/"" for. Running
/// the merge again over the same inputs changes nothing.
pub fn consolidate(region_records: &RegionRecords, taxonomy: &Taxonomy) -> ConsolidationResult {
    let mut listings: BTreeMap<String, CanonicalListing> = BTreeMap::new();
    let mut skipped = 0usize;

    for (region_key, records) in region_records {
        for record in records {
            let Some(id) = record_id(record) else {
                debug!("Skipping record without id in region {}", region_key);
                skipped += 1;
                continue;
            };
            // record_id established this is an object.
            let Some(incoming) = record.as_object().cloned() else {
                continue;
            };

            match listings.entry(id.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(CanonicalListing {
                        id: id.to_string(),
                        fields: incoming,
                        regions: vec![region_key.clone()],
                        primary_region: region_key.clone(),
                        region_names: vec![taxonomy.display_name(region_key)],
                    });
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if !existing.in_region(region_key) {
                        existing.regions.push(region_key.clone());
                        let name = taxonomy.display_name(region_key);
                        if !existing.region_names.contains(&name) {
                            existing.region_names.push(name);
                        }
                    }
                    for (key, value) in incoming {
                        let take = match existing.fields.get(&key) {
                            None => true,
                            Some(current) => is_empty_value(current),
                        };
                        if take && !is_empty_value(&value) {
                            existing.fields.insert(key, value);
                        } else if take {
                            // Still record the field so the union is complete,
                            // but an empty value never displaces anything.
                            existing.fields.entry(key).or_insert(value);
                        }
                    }
                }
            }
        }
    }

    info!(
        "Identified {} unique marketplace listings ({} records skipped)",
        listings.len(),
        skipped
    );

    ConsolidationResult { listings, skipped }
}
