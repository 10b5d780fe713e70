//! Reading and writing the persisted shape of a version list.
//!
//! Histories are stored as a JSON array inside a larger guest/episode record.
//! What comes back from the store is not trusted: the array may be a JSON string,
//! `null`, or missing, field names may be camelCase or snake_case, and individual
//! entries may be incomplete. Ingest never fails; it drops what it cannot use.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

use super::{
    ensure_active_version, ensure_version_numbers, is_densely_numbered, renumber_versions,
    ContentVersion, VersionNumber, VersionSource,
};
use crate::json_utils::decode_json_field;
use crate::{Result, VersionError};

const ID_KEYS: &[&str] = &["id", "versionId", "version_id"];
const CONTENT_KEYS: &[&str] = &["content", "text", "body"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "createdAt", "created_at"];
const NUMBER_KEYS: &[&str] = &["versionNumber", "version_number", "number"];
const ACTIVE_KEYS: &[&str] = &["active", "isActive", "is_active"];
const SOURCE_KEYS: &[&str] = &["source", "origin"];

/// Parses a persisted version list from raw JSON text.
///
/// Malformed entries are dropped; a document that is not JSON, or not an array
/// (after unwrapping string encoding), is an error.
pub fn try_parse_versions(raw: &str) -> Result<Vec<ContentVersion>> {
    let value: Value = serde_json::from_str(raw)?;
    versions_from_value(&value)
}

/// Extracts well-formed versions from a persisted JSON value.
///
/// Accepts an array, a JSON-encoded string holding an array, or `null`.
pub fn versions_from_value(value: &Value) -> Result<Vec<ContentVersion>> {
    match decode_json_field(value)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => {
            let total = entries.len();
            let versions: Vec<ContentVersion> = entries.iter().filter_map(version_from_entry).collect();
            let dropped = total.saturating_sub(versions.len());
            if dropped > 0 {
                tracing::warn!(dropped, total, "dropped malformed version entries");
            }
            Ok(versions)
        },
        other => Err(VersionError::MalformedList(format!("expected an array, got {}", json_kind(&other)))),
    }
}

/// Ingests a persisted version list for use by the editor.
///
/// Absent values give an empty list, as do values that fail to parse (logged).
/// The result is normalized with [`normalize_versions`].
#[must_use]
pub fn ingest_versions(value: Option<&Value>) -> Vec<ContentVersion> {
    let Some(value) = value else {
        return Vec::new();
    };
    match versions_from_value(value) {
        Ok(versions) => normalize_versions(versions),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse persisted version list, starting empty");
            Vec::new()
        },
    }
}

/// Brings a list into its canonical state.
///
/// Entries with a blank id are dropped, as are later entries reusing an id
/// already seen (the first occurrence wins). Missing numbers are filled from creation order; if that still leaves
/// duplicates or gaps the whole list is renumbered 1..N. When several entries
/// claim to be active only the newest keeps the flag, and a list with no active
/// entry gets its newest one activated.
#[must_use]
pub fn normalize_versions(versions: Vec<ContentVersion>) -> Vec<ContentVersion> {
    let versions = drop_unusable(versions);
    let mut numbered = ensure_version_numbers(&versions);
    if !is_densely_numbered(&numbered) {
        tracing::warn!(count = numbered.len(), "version numbers not dense, renumbering by creation order");
        numbered = renumber_versions(&numbered);
    }
    ensure_active_version(&keep_newest_active(numbered))
}

/// Serializes a list in the persisted camelCase shape.
#[must_use]
pub fn to_persisted_value(versions: &[ContentVersion]) -> Value {
    Value::Array(versions.iter().map(version_to_value).collect())
}

fn version_to_value(version: &ContentVersion) -> Value {
    let mut obj = Map::new();
    obj.insert("id".to_owned(), Value::String(version.id.clone()));
    obj.insert("content".to_owned(), Value::String(version.content.clone()));
    obj.insert(
        "timestamp".to_owned(),
        Value::String(version.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
    obj.insert("source".to_owned(), Value::String(version.source.as_str().to_owned()));
    if let Some(number) = version.version_number {
        obj.insert("versionNumber".to_owned(), Value::from(number.0));
    }
    obj.insert("active".to_owned(), Value::Bool(version.active));
    Value::Object(obj)
}

/// Builds a version from one persisted entry; `None` when `id` or `content` is unusable.
fn version_from_entry(entry: &Value) -> Option<ContentVersion> {
    let obj = entry.as_object()?;

    let id = match first_present(obj, ID_KEYS)? {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        // ids are strings from here on and are written back as strings
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let content = first_present(obj, CONTENT_KEYS)?.as_str()?.to_owned();

    let timestamp = first_present(obj, TIMESTAMP_KEYS).and_then(parse_timestamp).unwrap_or_else(|| {
        tracing::debug!(version_id = %id, "version without readable timestamp, using epoch");
        DateTime::<Utc>::default()
    });
    let source = first_present(obj, SOURCE_KEYS)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<VersionSource>().ok())
        .unwrap_or_default();
    let version_number = first_present(obj, NUMBER_KEYS).and_then(parse_version_number);
    let active = first_present(obj, ACTIVE_KEYS).is_some_and(parse_flag);

    Some(
        ContentVersion::builder(id, content)
            .timestamp(timestamp)
            .source(source)
            .maybe_version_number(version_number)
            .active(active)
            .build(),
    )
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok().map(|d| d.with_timezone(&Utc)),
        // epoch milliseconds, as written by `Date.now()`-style clients
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_version_number(value: &Value) -> Option<VersionNumber> {
    let raw = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(raw).ok().filter(|n| *n > 0).map(VersionNumber)
}

fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

fn drop_unusable(versions: Vec<ContentVersion>) -> Vec<ContentVersion> {
    let total = versions.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<ContentVersion> = versions
        .into_iter()
        .filter(|v| !v.id.trim().is_empty() && seen.insert(v.id.clone()))
        .collect();
    let dropped = total.saturating_sub(kept.len());
    if dropped > 0 {
        tracing::warn!(dropped, total, "dropped versions with blank or duplicate ids");
    }
    kept
}

fn keep_newest_active(versions: Vec<ContentVersion>) -> Vec<ContentVersion> {
    let active_count = versions.iter().filter(|v| v.active).count();
    if active_count <= 1 {
        return versions;
    }
    let keep = versions
        .iter()
        .enumerate()
        .filter(|(_, v)| v.active)
        .max_by_key(|(idx, v)| (v.timestamp, *idx))
        .map(|(idx, _)| idx);
    tracing::warn!(active_count, "multiple active versions, keeping the newest");
    versions
        .into_iter()
        .enumerate()
        .map(|(idx, v)| ContentVersion { active: Some(idx) == keep, ..v })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_active_version;
    use serde_json::json;

    #[test]
    fn absent_and_null_are_empty() {
        assert!(ingest_versions(None).is_empty());
        assert!(ingest_versions(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn unparsable_string_is_empty() {
        assert!(ingest_versions(Some(&json!("{broken"))).is_empty());
    }

    #[test]
    fn non_array_is_error_but_ingest_recovers() {
        assert!(versions_from_value(&json!({"id": "a"})).is_err());
        assert!(ingest_versions(Some(&json!({"id": "a"}))).is_empty());
    }

    #[test]
    fn drops_entries_without_id_or_content() {
        let raw = json!([
            {"id": "keep", "content": "ok", "timestamp": "2024-01-01T00:00:00Z"},
            {"content": "no id"},
            {"id": "", "content": "blank id"},
            {"id": "no-content"},
            {"id": "null-content", "content": null},
            "not an object"
        ]);
        let versions = versions_from_value(&raw).expect("array");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].id, "keep");
    }

    #[test]
    fn reads_snake_case_aliases() {
        let raw = json!([{
            "id": 42,
            "content": "<p>bio</p>",
            "created_at": "2024-03-01T10:00:00+02:00",
            "version_number": "3",
            "is_active": "true",
            "source": "AI"
        }]);
        let versions = versions_from_value(&raw).expect("array");
        let v = &versions[0];
        assert_eq!(v.id, "42");
        assert_eq!(v.version_number, Some(VersionNumber(3)));
        assert!(v.active);
        assert_eq!(v.source, VersionSource::Ai);
        assert_eq!(v.timestamp.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn numeric_timestamp_is_millis() {
        let raw = json!([{"id": "a", "content": "x", "timestamp": 1_700_000_000_000_i64}]);
        let versions = versions_from_value(&raw).expect("array");
        assert_eq!(versions[0].timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn unknown_source_falls_back_to_manual() {
        let raw = json!([{"id": "a", "content": "x", "source": "telepathy"}]);
        assert_eq!(versions_from_value(&raw).expect("array")[0].source, VersionSource::Manual);
    }

    #[test]
    fn normalize_repairs_duplicate_numbers() {
        let raw = json!([
            {"id": "a", "content": "1", "timestamp": "2024-01-01T00:00:00Z", "versionNumber": 1},
            {"id": "b", "content": "2", "timestamp": "2024-01-02T00:00:00Z", "versionNumber": 1},
            {"id": "c", "content": "3", "timestamp": "2024-01-03T00:00:00Z"}
        ]);
        let versions = ingest_versions(Some(&raw));
        let numbers: Vec<_> = versions.iter().map(|v| v.version_number.map(u32::from)).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(get_active_version(&versions).map(|v| v.id.as_str()), Some("c"));
    }

    #[test]
    fn normalize_keeps_only_newest_active() {
        let raw = json!([
            {"id": "a", "content": "1", "timestamp": "2024-01-01T00:00:00Z", "active": true},
            {"id": "b", "content": "2", "timestamp": "2024-01-02T00:00:00Z", "active": true}
        ]);
        let versions = ingest_versions(Some(&raw));
        assert!(!versions[0].active);
        assert!(versions[1].active);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let raw = json!([
            {"id": "dup", "content": "first", "timestamp": "2024-01-01T00:00:00Z"},
            {"id": "dup", "content": "second", "timestamp": "2024-01-02T00:00:00Z"},
            {"id": "c", "content": "third", "timestamp": "2024-01-03T00:00:00Z", "active": true}
        ]);
        let versions = ingest_versions(Some(&raw));
        let contents: Vec<_> = versions.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "third"]);

        let selected = crate::set_active_version(&versions, "dup");
        let active: Vec<_> = selected.iter().filter(|v| v.active).map(|v| v.content.as_str()).collect();
        assert_eq!(active, vec!["first"]);
    }

    #[test]
    fn normalize_drops_blank_ids() {
        let versions = normalize_versions(vec![
            ContentVersion::builder("", "x").active(true).build(),
            ContentVersion::builder("  ", "y").build(),
            ContentVersion::builder("a", "z").build(),
        ]);
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].id, "a");
        assert!(versions[0].active);
    }

    #[test]
    fn numeric_id_is_written_back_as_string() {
        let versions = ingest_versions(Some(&json!([{"id": 42, "content": "x"}])));
        assert_eq!(to_persisted_value(&versions)[0]["id"], json!("42"));
    }

    #[test]
    fn persisted_round_trip_preserves_fields() {
        let raw = r#"[
            {"id":"a","content":"<p>first</p>","timestamp":"2024-05-01T12:00:00.250Z","source":"import","versionNumber":1,"active":false},
            {"id":"b","content":"second","timestamp":"2024-05-02T12:00:00Z","source":"ai","versionNumber":2,"active":true}
        ]"#;
        let parsed = try_parse_versions(raw).expect("parse");
        let encoded = serde_json::to_string(&to_persisted_value(&parsed)).expect("encode");
        let reparsed = try_parse_versions(&encoded).expect("reparse");

        assert_eq!(reparsed.len(), 2);
        for (before, after) in parsed.iter().zip(&reparsed) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.content, after.content);
            assert_eq!(before.timestamp, after.timestamp);
            assert_eq!(before.source, after.source);
            assert_eq!(before.version_number, after.version_number);
            assert_eq!(before.active, after.active);
        }
    }

    #[test]
    fn accepts_string_encoded_list() {
        let encoded = json!("[{\"id\":\"a\",\"content\":\"x\"}]");
        let versions = ingest_versions(Some(&encoded));
        assert_eq!(versions.len(), 1);
        assert!(versions[0].active);
        assert_eq!(versions[0].version_number, Some(VersionNumber::FIRST));
    }
}
