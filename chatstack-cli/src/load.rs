//! Chat dump loading
//!
//! Reads the JSON array written by the chat capture tools and pulls out the
//! timestamp, sender and body of each entry.

use anyhow::{bail, Context, Result};
use chatstack_core::RawRecord;
use serde_json::{Map, Value};
use std::path::Path;

const TIMESTAMP_KEYS: [&str; 3] = ["messageTime", "createTime", "updateTime"];

/// Loads raw chat records from a JSON file
pub fn load_chat(path: &Path) -> Result<Vec<RawRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chat file {}", path.display()))?;
    parse_chat(&data)
}

/// Parses a chat dump. The top-level value must be an array; entries that
/// are not objects are skipped.
pub fn parse_chat(data: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(data.trim_start_matches('\u{feff}'))
        .context("Chat file is not valid JSON")?;

    let Value::Array(items) = value else {
        bail!("Chat JSON must be a list of messages");
    };

    let total = items.len();
    let records: Vec<RawRecord> = items
        .iter()
        .filter_map(Value::as_object)
        .map(pick_fields)
        .collect();

    if records.len() < total {
        tracing::debug!(skipped = total - records.len(), "ignored non-object chat entries");
    }
    Ok(records)
}

fn pick_fields(item: &Map<String, Value>) -> RawRecord {
    // The first timestamp key present wins, even if it turns out to be unusable.
    let timestamp_ms = TIMESTAMP_KEYS
        .iter()
        .find_map(|key| item.get(*key).filter(|v| !v.is_null()))
        .and_then(parse_timestamp);

    let profile_name = item
        .get("profile")
        .and_then(|p| p.get("profileName"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    let name = if profile_name.is_empty() {
        str_field(item, "name")
    } else {
        profile_name
    };

    let body = match str_field(item, "content") {
        "" => str_field(item, "message"),
        content => content,
    };

    RawRecord::new(timestamp_ms, name, body)
}

fn str_field<'a>(item: &'a Map<String, Value>, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or_default().trim()
}

/// Accepts integer, float or numeric-string millisecond timestamps.
/// Negative values are treated as missing.
fn parse_timestamp(value: &Value) -> Option<i64> {
    let ms = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (ms >= 0).then_some(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weverse_shape() {
        let records = parse_chat(
            r#"[
                {"messageTime": 1700000000123, "profile": {"profileName": " fan "}, "content": " hello "},
                {"createTime": "1700000001000", "name": "other", "message": "hi"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            records,
            vec![
                RawRecord::new(Some(1_700_000_000_123), "fan", "hello"),
                RawRecord::new(Some(1_700_000_001_000), "other", "hi"),
            ]
        );
    }

    #[test]
    fn test_malformed_timestamp_counts_as_missing() {
        let records = parse_chat(
            r#"[
                {"messageTime": "soon", "name": "a", "content": "x"},
                {"messageTime": -5, "name": "b", "content": "y"},
                {"messageTime": null, "createTime": 42, "name": "c", "content": "z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].timestamp_ms, None);
        assert_eq!(records[1].timestamp_ms, None);
        assert_eq!(records[2].timestamp_ms, Some(42));
    }

    #[test]
    fn test_profile_name_falls_back_to_name() {
        let records =
            parse_chat(r#"[{"profile": {"profileName": ""}, "name": "plain", "content": "x"}]"#).unwrap();
        assert_eq!(records[0].name, "plain");
    }

    #[test]
    fn test_skips_non_objects() {
        let records = parse_chat(r#"[1, "two", null, {"content": "kept"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "kept");
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(parse_chat(r#"{"content": "x"}"#).is_err());
        assert!(parse_chat("not json").is_err());
    }
}
