//! Persisted memo record decode and repair.
//!
//! # Responsibility
//! - Reject values that are not keyed structures at all.
//! - Repair every field of a keyed structure into a valid `Memo`.
//!
//! # Invariants
//! - `migrate_memo` never fails; unrecoverable fields degrade to defaults.
//! - "now" is captured once per migration call.
//! - Migrating an already-valid memo yields an equal memo.

use crate::model::memo::{generate_memo_id, normalize_title, Memo, MemoCategory};
use crate::style::postit::PALETTE_SIZE;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a persisted element was discarded before migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRejection {
    /// Element is not a JSON object; carries the JSON kind that was found.
    NotAnObject(&'static str),
}

impl Display for RecordRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject(kind) => write!(f, "memo record must be an object, found {kind}"),
        }
    }
}

impl Error for RecordRejection {}

/// Decodes one persisted element into a memo.
///
/// Objects are always accepted and repaired field-by-field; any other JSON
/// kind is rejected so the caller can drop it.
pub fn decode_memo_record(value: &Value, now_ms: i64) -> Result<Memo, RecordRejection> {
    match value {
        Value::Object(fields) => Ok(migrate_memo(fields, now_ms)),
        other => Err(RecordRejection::NotAnObject(json_kind(other))),
    }
}

/// Repairs a keyed structure into a fully valid memo.
pub fn migrate_memo(fields: &Map<String, Value>, now_ms: i64) -> Memo {
    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => generate_memo_id(),
    };

    let title = match fields.get("title") {
        Some(Value::String(title)) => normalize_title(title),
        _ => normalize_title(""),
    };

    let content = match fields.get("content") {
        Some(Value::String(content)) => content.clone(),
        _ => String::new(),
    };

    let created_at = timestamp_field(fields, "createdAt").unwrap_or(now_ms);
    // Repaired records still honor `updatedAt >= createdAt`.
    let updated_at = timestamp_field(fields, "updatedAt")
        .unwrap_or(now_ms)
        .max(created_at);

    let color_index = fields
        .get("colorIndex")
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .map(f64::floor)
        .filter(|value| *value >= 0.0 && *value < PALETTE_SIZE as f64)
        .map(|value| value as usize);

    let category = match fields.get("category") {
        Some(Value::String(label)) if !label.is_empty() => {
            MemoCategory::from_label_or_default(label)
        }
        _ => MemoCategory::default(),
    };

    let pinned = matches!(fields.get("pinned"), Some(Value::Bool(true)));

    Memo {
        id,
        title,
        content,
        created_at,
        updated_at,
        color_index,
        category,
        pinned,
    }
}

fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .map(|value| value.floor() as i64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
