use thiserror::Error;

pub mod bundle;
pub mod entry;
pub mod migrate;
pub mod store;

pub use bundle::synchronize;
pub use entry::{EntryKey, ExtractedEntry, Provenance, format_timestamp};
pub use migrate::{BundleFile, SCHEMA_VERSION, parse_bundle};
pub use store::{BundleStore, slugify};

#[derive(Error, Debug)]
pub enum StoreError {
    /// A required provenance field was empty. Caller contract violation,
    /// surfaced immediately.
    #[error("missing required provenance field: {0}")]
    MissingProvenance(&'static str),
    #[error("unsupported bundle schema version {0}")]
    UnsupportedSchema(u64),
    #[error("malformed bundle: {0}")]
    Malformed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
