use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::StoreError;
use crate::bundle::synchronize;
use crate::entry::ExtractedEntry;
use crate::migrate::{self, BundleFile};

/// File-backed bundle persistence: one JSON bundle per section under `root`,
/// plus per-document inspection files under `root/<directory>/`.
#[derive(Debug, Clone)]
pub struct BundleStore {
    root: PathBuf,
}

impl BundleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bundle_path(&self, bundle_name: &str) -> PathBuf {
        self.root.join(bundle_name)
    }

    /// Load a section's bundle. A missing file is an empty bundle; a legacy
    /// bare-array file is migrated transparently.
    pub fn load_bundle(&self, bundle_name: &str) -> Result<Vec<ExtractedEntry>, StoreError> {
        let path = self.bundle_path(bundle_name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        migrate::parse_bundle(&raw)
    }

    /// Merge a freshly extracted batch into the persisted bundle and write
    /// it back, returning the merged entries.
    ///
    /// This is a full read-modify-write of the bundle file with no locking.
    /// It is not safe for concurrent writers against the same section;
    /// callers must serialize writes per bundle (extraction itself can run
    /// in parallel freely, only this merge step needs ordering).
    pub fn sync_bundle(
        &self,
        bundle_name: &str,
        incoming: Vec<ExtractedEntry>,
    ) -> Result<Vec<ExtractedEntry>, StoreError> {
        let existing = self.load_bundle(bundle_name)?;
        let merged = synchronize(existing, incoming);
        self.write_bundle(bundle_name, &merged)?;
        Ok(merged)
    }

    pub fn write_bundle(
        &self,
        bundle_name: &str,
        entries: &[ExtractedEntry],
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.bundle_path(bundle_name);
        let file = BundleFile::new(entries.to_vec());
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), records = entries.len(), "wrote bundle");
        Ok(())
    }

    /// Write per-`(country, source_doc)` inspection files for one batch of
    /// freshly extracted entries.
    pub fn write_document_files(
        &self,
        directory: &str,
        entries: &[ExtractedEntry],
    ) -> Result<(), StoreError> {
        let dir = self.root.join(directory);
        fs::create_dir_all(&dir)?;

        let mut groups: BTreeMap<(&str, &str), Vec<&ExtractedEntry>> = BTreeMap::new();
        for entry in entries {
            groups
                .entry((entry.country.as_str(), entry.source_doc.as_str()))
                .or_default()
                .push(entry);
        }

        for ((country, source_doc), group) in groups {
            let name = format!("{}_{}.json", slugify(country), slugify(source_doc));
            let path = dir.join(name);
            let json = serde_json::to_string_pretty(&group)?;
            fs::write(&path, json)?;
            debug!(path = %path.display(), "wrote document file");
        }
        Ok(())
    }
}

/// Lowercase a string and replace non-alphanumeric runs with `_`, for safe
/// file names.
///
/// A private copy lives in `sectioneer-parsing` (the crates do not depend on
/// each other); keep the two in sync.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}
