pub mod config;
pub mod config_file;
pub mod normalize;
pub mod section;
pub mod span;

pub use config::{KeywordParams, RawSectionConfig, SectionCatalog, SectionConfig};
pub use config_file::{CatalogFile, ConfigError};
pub use normalize::{normalize_pages, normalize_text};
pub use section::{LocateStrategy, SectionSeed, keyword_windows, locate_section, locate_sections};
pub use span::{DocumentSpan, resolve_spans};

/// One section as extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSection {
    pub section: String,
    pub text: String,
    pub strategy: LocateStrategy,
}

/// Extract the configured sections from one document's text.
///
/// Pipeline:
/// 1. Normalize the raw text (idempotent, so pre-normalized input is fine)
/// 2. Locate each catalog section via its heading patterns, falling back to
///    its full-span patterns
/// 3. Resolve the located seeds into non-overlapping spans in document order
/// 4. If no section produced a structural match anywhere (documents with no
///    usable headings at all), synthesize per-section keyword windows instead
///
/// Sections that are not found are simply absent from the result.
pub fn extract(document_text: &str, catalog: &SectionCatalog) -> Vec<ResolvedSection> {
    let text = normalize::normalize_text(document_text);
    let seeds = section::locate_sections(&text, catalog);

    if seeds.is_empty() {
        return catalog
            .sections
            .iter()
            .filter_map(|cfg| {
                section::keyword_windows(&text, cfg, &catalog.keyword_params).map(|window| {
                    ResolvedSection {
                        section: cfg.name.clone(),
                        text: window,
                        strategy: LocateStrategy::Keyword,
                    }
                })
            })
            .collect();
    }

    span::resolve_spans(&text, seeds)
        .into_iter()
        .map(|span| {
            let body = text[span.start..span.end].trim().to_string();
            ResolvedSection {
                section: span.section,
                text: body,
                strategy: span.strategy,
            }
        })
        .collect()
}

/// Extract sections from an ordered sequence of per-page strings, the shape
/// produced by an upstream PDF-to-text step.
pub fn extract_pages(pages: &[String], catalog: &SectionCatalog) -> Vec<ResolvedSection> {
    extract(&normalize::normalize_pages(pages), catalog)
}
