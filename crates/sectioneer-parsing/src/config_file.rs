use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{RawSectionConfig, SectionCatalog, SectionConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk TOML catalog overrides.
/// All fields are optional so partial configs work (merge with the builtin
/// catalog). Example:
///
/// ```toml
/// keyword_gap = 3
///
/// [[section]]
/// name = "NDC Tracking Module"
/// headings = ['^\s*NDC\sTracking\sModule[^\n]*']
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub keyword_gap: Option<usize>,
    pub keyword_context: Option<usize>,
    #[serde(default, rename = "section")]
    pub sections: Vec<RawSectionConfig>,
}

impl CatalogFile {
    /// Load a catalog file from a specific path.
    pub fn load(path: &Path) -> Result<CatalogFile, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl SectionCatalog {
    /// Overlay a catalog file onto this catalog. A `[[section]]` whose name
    /// matches an existing section overrides only the fields it sets; an
    /// unknown name appends a new section at the end.
    pub fn apply(&mut self, file: &CatalogFile) {
        if let Some(gap) = file.keyword_gap {
            self.keyword_params.gap = gap;
        }
        if let Some(context) = file.keyword_context {
            self.keyword_params.context = context;
        }
        for raw in &file.sections {
            let compiled = SectionConfig::compile(raw);
            match self.sections.iter_mut().find(|s| s.name == raw.name) {
                Some(existing) => {
                    if !compiled.heading_patterns.is_empty() {
                        existing.heading_patterns = compiled.heading_patterns;
                    }
                    if !compiled.fallback_patterns.is_empty() {
                        existing.fallback_patterns = compiled.fallback_patterns;
                    }
                    if !compiled.keywords.is_empty() {
                        existing.keywords = compiled.keywords;
                    }
                    if raw.bundle.is_some() {
                        existing.bundle = compiled.bundle;
                    }
                    if raw.directory.is_some() {
                        existing.directory = compiled.directory;
                    }
                }
                None => self.sections.push(compiled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordParams;

    #[test]
    fn catalog_file_round_trip_toml() {
        let file = CatalogFile {
            keyword_gap: Some(3),
            sections: vec![RawSectionConfig {
                name: "Adaptation actions".into(),
                headings: vec![r"^\s*Adaptation\sactions[^\n]*".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&file).unwrap();
        let parsed: CatalogFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.keyword_gap, Some(3));
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].name, "Adaptation actions");
    }

    #[test]
    fn empty_file_deserializes_to_defaults() {
        let parsed: CatalogFile = toml::from_str("").unwrap();
        assert!(parsed.keyword_gap.is_none());
        assert!(parsed.sections.is_empty());
    }

    #[test]
    fn apply_overrides_keyword_params() {
        let mut catalog = SectionCatalog::builtin();
        catalog.apply(&CatalogFile {
            keyword_gap: Some(4),
            keyword_context: Some(8),
            ..Default::default()
        });
        assert_eq!(catalog.keyword_params, KeywordParams { gap: 4, context: 8 });
    }

    #[test]
    fn apply_overrides_only_set_fields() {
        let mut catalog = SectionCatalog::builtin();
        let before = catalog.get("NDC Tracking Module").unwrap().keywords.clone();
        catalog.apply(&CatalogFile {
            sections: vec![RawSectionConfig {
                name: "NDC Tracking Module".into(),
                headings: vec![r"^\s*Custom heading".into()],
                ..Default::default()
            }],
            ..Default::default()
        });
        let after = catalog.get("NDC Tracking Module").unwrap();
        assert_eq!(after.heading_patterns.len(), 1);
        assert_eq!(after.heading_patterns[0].as_str(), r"^\s*Custom heading");
        // Keywords were not set in the file, so the builtin list survives.
        assert_eq!(after.keywords, before);
    }

    #[test]
    fn apply_appends_unknown_section() {
        let mut catalog = SectionCatalog::builtin();
        let count = catalog.sections.len();
        catalog.apply(&CatalogFile {
            sections: vec![RawSectionConfig {
                name: "Adaptation actions".into(),
                keywords: vec!["adaptation".into()],
                ..Default::default()
            }],
            ..Default::default()
        });
        assert_eq!(catalog.sections.len(), count + 1);
        let added = catalog.get("Adaptation actions").unwrap();
        assert_eq!(added.bundle, "adaptation_actions_bundle.json");
    }
}
