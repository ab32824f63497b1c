use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::StoreError;
use crate::entry::ExtractedEntry;

/// Current on-disk bundle schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Versioned on-disk bundle shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleFile {
    pub schema_version: u32,
    pub entries: Vec<ExtractedEntry>,
}

impl BundleFile {
    pub fn new(entries: Vec<ExtractedEntry>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries,
        }
    }
}

/// Parse a persisted bundle, migrating the legacy shape if needed.
///
/// Bundles were originally persisted as a bare JSON entry array. That shape
/// is recognized here, once, at load time; everything downstream only ever
/// sees the current versioned form, and the next write re-persists it as
/// such. A version this code does not know is an explicit error rather than
/// a guess.
pub fn parse_bundle(raw: &str) -> Result<Vec<ExtractedEntry>, StoreError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(_) => {
            let entries: Vec<ExtractedEntry> = serde_json::from_value(value)?;
            info!(records = entries.len(), "migrated legacy bundle array");
            Ok(entries)
        }
        Value::Object(ref map) => {
            let version = map.get("schema_version").and_then(Value::as_u64).unwrap_or(0);
            if version != u64::from(SCHEMA_VERSION) {
                return Err(StoreError::UnsupportedSchema(version));
            }
            let file: BundleFile = serde_json::from_value(value)?;
            Ok(file.entries)
        }
        _ => Err(StoreError::Malformed(
            "bundle root must be a JSON array or object".to_string(),
        )),
    }
}
