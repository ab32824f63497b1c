use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Where an extracted section came from. Every field is required; an empty
/// field is a caller contract violation, surfaced immediately and never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub country: String,
    pub source_doc: String,
    pub doc_url: String,
}

impl Provenance {
    pub fn new(
        country: impl Into<String>,
        source_doc: impl Into<String>,
        doc_url: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let provenance = Self {
            country: country.into(),
            source_doc: source_doc.into(),
            doc_url: doc_url.into(),
        };
        for (field, value) in [
            ("country", &provenance.country),
            ("source_doc", &provenance.source_doc),
            ("doc_url", &provenance.doc_url),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::MissingProvenance(field));
            }
        }
        Ok(provenance)
    }
}

/// The identity tuple distinguishing one logical entry within a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub country: String,
    pub section: String,
    pub source_doc: String,
    pub doc_url: String,
}

/// One extracted section of one source document, as persisted in a bundle.
///
/// Entries are never deleted; a superseded or no-longer-reproduced entry is
/// soft-deleted by flipping `stale`, keeping the full audit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntry {
    pub country: String,
    pub section: String,
    pub source_doc: String,
    pub doc_url: String,
    pub extracted_text: String,
    /// Second-resolution ISO-8601 UTC, e.g. `2026-08-29T12:00:00Z`.
    pub created_utc: String,
    #[serde(default)]
    pub stale: bool,
}

impl ExtractedEntry {
    /// Package one resolved section with its provenance. Pure: no side
    /// effects, `stale` always starts false.
    pub fn build(
        provenance: &Provenance,
        section: &str,
        extracted_text: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            country: provenance.country.clone(),
            section: section.to_string(),
            source_doc: provenance.source_doc.clone(),
            doc_url: provenance.doc_url.clone(),
            extracted_text,
            created_utc: format_timestamp(timestamp),
            stale: false,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            country: self.country.clone(),
            section: self.section.clone(),
            source_doc: self.source_doc.clone(),
            doc_url: self.doc_url.clone(),
        }
    }
}

/// Render a timestamp the way bundles store it: whole seconds, UTC, `Z`
/// suffix. Lexicographic order of the rendered form is chronological order.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
