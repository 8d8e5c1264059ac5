//! Records, record ids and source collections.
//!
//! A record is an ordered, dynamically keyed JSON object. Fields the builder
//! does not know about are carried through every operation untouched.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// One input row: field name to value, insertion order preserved.
pub type Record = Map<String, Value>;

/// Source collection keyed by the record key as given, in input order.
///
/// Keys are compared to parent references through [`RecordId`].
pub type Records = IndexMap<String, Record>;

/// Canonical identifier of a record.
///
/// Ids and parent references arrive as numbers or strings. Both sides of a
/// comparison are normalized first so that `0`, `0.0`, `"0"` and `" 0 "`
/// all name the same record:
///
/// - integral numbers and numeric strings become decimal integer text
/// - other finite numbers become their shortest float text
/// - anything else keeps its literal text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(canonicalize(raw.as_ref()))
    }

    /// Default root sentinel.
    pub fn root() -> Self {
        Self("0".to_string())
    }

    /// Id named by a stored field value.
    ///
    /// `null`, arrays and objects cannot name a record.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::new(s)),
            Value::Number(n) => Some(Self::new(n.to_string())),
            Value::Bool(b) => Some(Self(if *b { "1" } else { "0" }.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<usize> for RecordId {
    fn from(n: usize) -> Self {
        Self(n.to_string())
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n.to_string();
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return n.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => float_text(f),
        _ => raw.to_string(),
    }
}

fn float_text(f: f64) -> String {
    // integral floats inside the exact range collapse to integer text
    if f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Text used when a field value is spliced into a label or used as a key.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Records read from a JSON source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRecords {
    pub records: Records,
    /// Keys that occurred more than once; the later entry won.
    pub duplicates: Vec<String>,
}

impl LoadedRecords {
    fn insert(&mut self, key: String, record: Record) {
        if self.records.insert(key.clone(), record).is_some() {
            warn!(%key, "duplicate record key, later entry replaces earlier one");
            self.duplicates.push(key);
        }
    }
}

/// Build a record collection from an arbitrary JSON value.
///
/// Objects are keyed by member name. Arrays are keyed by the text of each
/// element's `id_field` value, falling back to the element position.
/// Entries that are not objects are dropped; a value that is not a
/// collection yields nothing.
///
/// Keys are stored as given: `"1"` and `"01"` stay two records. They only
/// compare equal when matched against parent references.
#[instrument(level = "debug", skip(value))]
pub fn load_records(value: &Value, id_field: &str) -> LoadedRecords {
    let mut loaded = LoadedRecords::default();
    match value {
        Value::Object(members) => {
            for (key, entry) in members {
                if let Some(record) = as_record(key, entry) {
                    loaded.insert(key.clone(), record);
                }
            }
        }
        Value::Array(items) => {
            for (pos, entry) in items.iter().enumerate() {
                let Some(record) = as_record(&pos.to_string(), entry) else {
                    continue;
                };
                let key = record
                    .get(id_field)
                    .and_then(key_text)
                    .unwrap_or_else(|| pos.to_string());
                loaded.insert(key, record);
            }
        }
        other => {
            debug!(kind = kind_of(other), "source is not a collection, treating as empty");
        }
    }
    loaded
}

/// [`load_records`] without the duplicate report.
pub fn records_from_value(value: &Value, id_field: &str) -> Records {
    load_records(value, id_field).records
}

/// Storage key for an id field value.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) => Some(value_text(value)),
        Value::Bool(_) => RecordId::from_value(value).map(String::from),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn as_record(key: &str, entry: &Value) -> Option<Record> {
    match entry {
        Value::Object(fields) => Some(fields.clone()),
        other => {
            debug!(key, kind = kind_of(other), "dropping source entry that is not an object");
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
