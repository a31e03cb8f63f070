use crate::error::Result;
use crate::extract::is_empty_value;
use crate::taxonomy::RegionSpec;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Listings loaded for one region, in export order.
pub type RegionRecords = Vec<(String, Vec<Value>)>;

/// Read a marketplace export, tolerating missing, empty, or corrupt files.
/// Returns `None` in those cases; the region simply contributes no listings.
fn safe_load_json(path: &Path) -> Option<Value> {
    if !path.exists() {
        warn!("File not found: {}", path.display());
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            return None;
        }
    };
    if content.trim().is_empty() {
        warn!("File is empty: {}", path.display());
        return None;
    }
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("JSON decode error in {}: {}", path.display(), e);
            None
        }
    }
}

/// Pull the listing array out of an export, which wraps it in a `data`
/// envelope.
fn listing_array(export: Value) -> Vec<Value> {
    match export {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Fill fields from a `*_detailed.json` companion export into the base
/// listings, keyed by id. Only absent or null fields are filled; the base
/// export wins everywhere else.
fn merge_detailed(listings: &mut [Value], detailed: Vec<Value>) {
    let by_id: HashMap<String, Value> = detailed
        .into_iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?.to_string();
            if id.is_empty() {
                None
            } else {
                Some((id, item))
            }
        })
        .collect();

    for listing in listings.iter_mut() {
        let Some(id) = listing.get("id").and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(Value::Object(detail_fields)) = by_id.get(id).cloned() else {
            continue;
        };
        let Some(fields) = listing.as_object_mut() else {
            continue;
        };
        for (key, value) in detail_fields {
            let fill = match fields.get(&key) {
                None => true,
                Some(existing) => existing.is_null(),
            };
            if fill {
                fields.insert(key, value);
            }
        }
    }
}

/// Load every configured region's export from `data_dir`, in taxonomy order.
/// Unavailable regions load as empty. Returns the per-region record lists
/// and the total count; a zero total is the caller's empty-batch signal.
pub fn load_regions(data_dir: &Path, regions: &[RegionSpec]) -> Result<(RegionRecords, usize)> {
    let mut loaded = Vec::with_capacity(regions.len());
    let mut total = 0usize;

    for region in regions {
        let path = data_dir.join(&region.file);
        let mut listings = safe_load_json(&path).map(listing_array).unwrap_or_default();

        if listings.is_empty() {
            info!("{}: no data available", region.display_name);
        } else {
            let detailed_path = data_dir.join(region.file.replace("_listings.json", "_detailed.json"));
            if detailed_path != path {
                if let Some(detailed) = safe_load_json(&detailed_path).map(listing_array) {
                    merge_detailed(&mut listings, detailed);
                }
            }
            info!("{}: {} listings", region.display_name, listings.len());
        }

        total += listings.len();
        loaded.push((region.key.clone(), listings));
    }

    info!("Total regional listings loaded: {}", total);
    Ok((loaded, total))
}

/// Convenience check used by tests and the loader: a record is usable when
/// it is an object with a non-empty id.
pub fn record_id(record: &Value) -> Option<&str> {
    let id = record.as_object()?.get("id")?;
    if is_empty_value(id) {
        return None;
    }
    id.as_str()
}
