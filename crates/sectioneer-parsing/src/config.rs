use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tuning for the keyword-window fallback pass.
///
/// `gap` is the maximum number of lines between two keyword hits that still
/// land in the same cluster; `context` is how many lines of surrounding text
/// each cluster is expanded by. The defaults were tuned against GEF8 PIF
/// documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordParams {
    pub gap: usize,
    pub context: usize,
}

impl Default for KeywordParams {
    fn default() -> Self {
        Self { gap: 2, context: 5 }
    }
}

/// Uncompiled section definition, as written in a catalog file.
///
/// All pattern lists are optional so partial definitions work; `bundle` and
/// `directory` default to slugs of the section name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSectionConfig {
    pub name: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub bundle: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
}

/// Compiled, immutable configuration for one target section.
#[derive(Debug, Clone)]
pub struct SectionConfig {
    pub name: String,
    /// Heading patterns, case-insensitive and line-anchored. First match wins.
    pub heading_patterns: Vec<Regex>,
    /// Full-span fallback patterns, case-insensitive, `.` matches newlines.
    pub fallback_patterns: Vec<Regex>,
    /// Keywords for the window fallback, matched as lowercase substrings.
    pub keywords: Vec<String>,
    /// File name of the persisted bundle for this section.
    pub bundle: String,
    /// Directory name for per-document inspection output.
    pub directory: String,
}

impl SectionConfig {
    /// Compile a raw definition. A pattern that fails to compile is logged
    /// and skipped; the remaining patterns are still used (a bad pattern is
    /// never fatal to the run).
    pub fn compile(raw: &RawSectionConfig) -> SectionConfig {
        let heading_patterns = raw
            .headings
            .iter()
            .filter_map(|p| build_pattern(p, PatternKind::Heading))
            .collect();
        let fallback_patterns = raw
            .patterns
            .iter()
            .filter_map(|p| build_pattern(p, PatternKind::FullSpan))
            .collect();
        SectionConfig {
            name: raw.name.clone(),
            heading_patterns,
            fallback_patterns,
            keywords: raw.keywords.clone(),
            bundle: raw
                .bundle
                .clone()
                .unwrap_or_else(|| format!("{}_bundle.json", slugify(&raw.name))),
            directory: raw
                .directory
                .clone()
                .unwrap_or_else(|| slugify(&raw.name)),
        }
    }
}

#[derive(Clone, Copy)]
enum PatternKind {
    Heading,
    FullSpan,
}

fn build_pattern(pattern: &str, kind: PatternKind) -> Option<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    builder.case_insensitive(true);
    match kind {
        PatternKind::Heading => builder.multi_line(true),
        PatternKind::FullSpan => builder.dot_matches_new_line(true),
    };
    match builder.build() {
        Ok(re) => Some(re),
        Err(error) => {
            warn!(pattern, %error, "skipping unparsable section pattern");
            None
        }
    }
}

/// Lowercase a string and replace non-alphanumeric runs with `_`.
pub(crate) fn slugify(value: &str) -> String {
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

/// The ordered set of sections one extraction run looks for.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    pub sections: Vec<SectionConfig>,
    pub keyword_params: KeywordParams,
}

impl SectionCatalog {
    pub fn new(sections: Vec<SectionConfig>, keyword_params: KeywordParams) -> Self {
        Self {
            sections,
            keyword_params,
        }
    }

    pub fn get(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The section definitions the system ships with, covering the module
    /// headings of GEF8 PIF documents and the keyword vocabularies of BUR,
    /// BTR and National Communication reports.
    pub fn builtin() -> Self {
        let raw = builtin_definitions();
        let sections = raw.iter().map(SectionConfig::compile).collect();
        Self::new(sections, KeywordParams::default())
    }
}

fn builtin_definitions() -> Vec<RawSectionConfig> {
    vec![
        RawSectionConfig {
            name: "GHG Inventory Module".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*(?:National\s)?(?:GHG|Greenhouse\sGas)\sInventory[^\n]*".into(),
                r"^\s*(?:National\s)?(?:GHG|Greenhouse\sGas)\sInventory\sModule[^\n]*".into(),
                r"^\s*(?:National\s)?Greenhouse\sGas\sInventor(?:y|ies)[^\n]*".into(),
            ],
            patterns: vec![
                r"(?:National\s)?greenhouse\sgas\sinventor(?:y|ies)\s(?:module|arrangements|of)[^\n]*".into(),
                r"GHG\sinventory\s(?:module|arrangements|improvement)[^\n]*".into(),
            ],
            keywords: vec![
                "ghg inventory".into(),
                "greenhouse gas inventory".into(),
                "national inventory report".into(),
                "emissions by sector".into(),
                "emission factors".into(),
                "ipcc guidelines".into(),
                "inventory compilation".into(),
            ],
            ..Default::default()
        },
        RawSectionConfig {
            name: "NDC Tracking Module".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*NDC\sTracking[^\n]*".into(),
                r"^\s*NDC\sTracking\sModule[^\n]*".into(),
                r"^\s*Tracking\sProgress\s(?:of|towards?)\s(?:the\s)?NDC[^\n]*".into(),
            ],
            patterns: vec![
                r"NDC\stracking\s(?:module|system|framework)[^\n]*".into(),
                r"tracking\sprogress\s(?:towards?|in\simplementing)\s(?:the\s|its\s)?NDC[^\n]*".into(),
            ],
            keywords: vec![
                "ndc tracking".into(),
                "tracking progress".into(),
                "mitigation policies and measures".into(),
                "mitigation actions and their effects".into(),
                "tracking systems for nationally determined contributions".into(),
                "progress toward achieving its".into(),
                "description of the ndc".into(),
                "ndcs".into(),
            ],
            ..Default::default()
        },
        RawSectionConfig {
            name: "Support Needed and Received Module".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*Support\sNeeded\sand\sReceived[^\n]*".into(),
                r"^\s*Support\sNeeded\sand\sReceived\sModule[^\n]*".into(),
            ],
            patterns: vec![
                r"support\sneeded\sand\sreceived[^\n]*".into(),
                r"information\son\sfinancial\ssupport\s(?:needed|received)[^\n]*".into(),
            ],
            keywords: vec![
                "support needed and received".into(),
                "information on financial support needed".into(),
                "information on financial support received".into(),
                "climate finance".into(),
                "means of implementation".into(),
                "technology development and transfer support needed".into(),
                "capacity-building support needed".into(),
                "capacity-building support received".into(),
            ],
            ..Default::default()
        },
        RawSectionConfig {
            name: "Other baseline initiatives".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*Other\sbaseline\sinitiatives[^\n]*".into(),
                r"^\s*Other\sbaseline\sinitiatives[^\n]*".into(),
            ],
            patterns: vec![
                r"other\sbaseline\sinitiatives[^\n]*".into(),
                r"ongoing\stransparency\sprojects\sand\sinitiatives[^\n]*".into(),
            ],
            keywords: vec![
                "other baseline initiatives".into(),
                "baseline analysis".into(),
                "ongoing transparency projects and initiatives".into(),
                "transparency initiatives".into(),
                "baseline of components".into(),
                "this cbit project is aligned with and complements other initiatives".into(),
            ],
            ..Default::default()
        },
        RawSectionConfig {
            name: "Institutional framework for climate action".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*Institutional\sframework[^\n]*".into(),
                r"^\s*Institutional\sframework[^\n]*".into(),
                r"^\s*Institutional\sarrangements[^\n]*".into(),
            ],
            patterns: vec![
                r"Institutional\sframework(?:\sfor\s(?:climate|mitigation|adaptation|the\simplementation))?[^\n]*".into(),
                r"Institutional\sarrangements\s(?:for|on)\s(?:climate|implementation)[^\n]*".into(),
                r"Institutional\ssetup[^\n]*".into(),
            ],
            keywords: vec![
                "institutional framework".into(),
                "institutional arrangements".into(),
                "coordination mechanism".into(),
                "ministry of environment".into(),
                "national climate change committee".into(),
            ],
            ..Default::default()
        },
        RawSectionConfig {
            name: "National policy framework".into(),
            headings: vec![
                r"^\s*[ivxlcdm]+\.\s*National\s(?:policy|strategic)\sframework[^\n]*".into(),
                r"^\s*National\s(?:policy|strategic)\sframework[^\n]*".into(),
                r"^\s*Policy\sand\sregulatory\sframework[^\n]*".into(),
            ],
            patterns: vec![
                r"National\s(?:policy|strategic)\sframework[^\n]*".into(),
                r"National\s(?:strategy|policies)\s(?:for|on)\sclimate[^\n]*".into(),
                r"Policy\sand\sregulatory\sframework[^\n]*".into(),
            ],
            keywords: vec![
                "national policy framework".into(),
                "climate change policy".into(),
                "national climate change strategy".into(),
                "regulatory framework".into(),
                "national development plan".into(),
            ],
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_skips_bad_pattern_keeps_rest() {
        let raw = RawSectionConfig {
            name: "Test".into(),
            headings: vec![r"[unclosed".into(), r"^\s*Valid heading".into()],
            patterns: vec![r"(?=lookahead unsupported)".into()],
            ..Default::default()
        };
        let config = SectionConfig::compile(&raw);
        assert_eq!(config.heading_patterns.len(), 1);
        assert!(config.fallback_patterns.is_empty());
    }

    #[test]
    fn compile_defaults_output_names_from_slug() {
        let raw = RawSectionConfig {
            name: "NDC Tracking Module".into(),
            ..Default::default()
        };
        let config = SectionConfig::compile(&raw);
        assert_eq!(config.bundle, "ndc_tracking_module_bundle.json");
        assert_eq!(config.directory, "ndc_tracking_module");
    }

    #[test]
    fn compile_keeps_explicit_output_names() {
        let raw = RawSectionConfig {
            name: "Institutional framework for climate action".into(),
            bundle: Some("Institutional_framework_bundle.json".into()),
            directory: Some("Institutional_framework_for_climate_action".into()),
            ..Default::default()
        };
        let config = SectionConfig::compile(&raw);
        assert_eq!(config.bundle, "Institutional_framework_bundle.json");
    }

    #[test]
    fn heading_patterns_are_case_insensitive_and_line_anchored() {
        let raw = RawSectionConfig {
            name: "Test".into(),
            headings: vec![r"^\s*Institutional\sframework[^\n]*".into()],
            ..Default::default()
        };
        let config = SectionConfig::compile(&raw);
        let re = &config.heading_patterns[0];
        assert!(re.is_match("intro\nINSTITUTIONAL FRAMEWORK\nbody"));
        assert!(!re.is_match("the institutional framework is"));
    }

    #[test]
    fn slugify_collapses_non_alphanumeric_runs() {
        assert_eq!(slugify("NDC Tracking Module"), "ndc_tracking_module");
        assert_eq!(slugify("  BUR 1 / final  "), "bur_1_final");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn builtin_catalog_compiles_every_pattern() {
        let catalog = SectionCatalog::builtin();
        assert_eq!(catalog.sections.len(), 6);
        for (raw, compiled) in builtin_definitions().iter().zip(&catalog.sections) {
            assert_eq!(compiled.heading_patterns.len(), raw.headings.len());
            assert_eq!(compiled.fallback_patterns.len(), raw.patterns.len());
        }
        assert!(catalog.get("NDC Tracking Module").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
