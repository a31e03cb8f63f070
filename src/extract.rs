use chrono::DateTime;
use serde_json::Value;

/// Safe accessors over raw listing JSON. Every heuristic in the engine reads
/// listing data through these helpers, which resolve missing structure to a
/// default instead of failing.

/// Walk a key path through nested objects. Returns `None` when any
/// intermediate key is absent, an intermediate value is not an object, or
/// the resolved value is null.
pub fn get_path<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = record;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// String field lookup with a default for missing/null/non-string values.
pub fn get_str<'a>(record: &'a Value, key: &str, default: &'a str) -> &'a str {
    get_str_path(record, &[key], default)
}

pub fn get_str_path<'a>(record: &'a Value, path: &[&str], default: &'a str) -> &'a str {
    match get_path(record, path) {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => default,
    }
}

/// List-of-strings lookup; non-string elements are skipped.
pub fn get_string_list(record: &Value, key: &str) -> Vec<String> {
    match get_path(record, &[key]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Truthiness for flag fields that may arrive as bool or string.
pub fn get_flag(record: &Value, key: &str) -> bool {
    match get_path(record, &[key]) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty() && s != "false",
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    }
}

/// Merge treats null and the empty string as "no value".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Collapse whitespace runs and optionally truncate with an ellipsis.
pub fn clean_text(text: &str, max_length: Option<usize>) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match max_length {
        Some(max) if collapsed.len() > max && max > 3 => {
            let mut cut = max - 3;
            while cut > 0 && !collapsed.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &collapsed[..cut])
        }
        _ => collapsed,
    }
}

/// Normalize an ISO-8601 timestamp to `YYYY-MM-DD`. Anything unparseable is
/// truncated to its first ten characters rather than rejected.
pub fn format_date(date_string: &str) -> String {
    if date_string.is_empty() {
        return String::new();
    }
    if date_string.contains('T') {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&date_string.replace('Z', "+00:00")) {
            return parsed.format("%Y-%m-%d").to_string();
        }
    }
    date_string.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_path_lookup() {
        let record = json!({"pricing": {"type": "BYOL", "rate": 12}});
        assert_eq!(get_str_path(&record, &["pricing", "type"], ""), "BYOL");
        assert_eq!(get_str_path(&record, &["pricing", "missing"], "x"), "x");
        assert_eq!(get_str_path(&record, &["absent", "type"], "x"), "x");
    }

    #[test]
    fn non_object_intermediate_yields_default() {
        let record = json!({"pricing": "flat"});
        assert_eq!(get_str_path(&record, &["pricing", "type"], "d"), "d");
        assert!(get_path(&record, &["pricing", "type"]).is_none());
    }

    #[test]
    fn null_resolves_to_default() {
        let record = json!({"name": null});
        assert_eq!(get_str(&record, "name", "fallback"), "fallback");
        assert!(get_path(&record, &["name"]).is_none());
    }

    #[test]
    fn string_lists() {
        let record = json!({"categories": ["Security", "Networking"], "tags": "single"});
        assert_eq!(get_string_list(&record, "categories"), vec!["Security", "Networking"]);
        assert_eq!(get_string_list(&record, "tags"), vec!["single"]);
        assert!(get_string_list(&record, "missing").is_empty());
    }

    #[test]
    fn empty_value_detection() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(!is_empty_value(&json!("x")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!([])));
    }

    #[test]
    fn clean_text_collapses_and_truncates() {
        assert_eq!(clean_text("  a\n\n b\tc  ", None), "a b c");
        assert_eq!(clean_text("abcdefghij", Some(8)), "abcde...");
        assert_eq!(clean_text("short", Some(100)), "short");
    }

    #[test]
    fn date_formatting() {
        assert_eq!(format_date("2024-03-15T10:30:00Z"), "2024-03-15");
        assert_eq!(format_date("2024-03-15 10:30:00"), "2024-03-15");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("not a date"), "not a date");
    }
}
