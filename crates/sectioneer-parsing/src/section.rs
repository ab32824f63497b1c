use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::{KeywordParams, SectionCatalog, SectionConfig};

/// Which pass located a section, for scoring and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocateStrategy {
    /// A heading pattern matched the section's title line.
    Heading,
    /// A full-span fallback pattern matched title plus surrounding prose.
    Fallback,
    /// Window text synthesized around keyword clusters.
    Keyword,
}

/// Raw start/end offsets of a located section before span resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSeed {
    pub start: usize,
    pub end: usize,
    pub strategy: LocateStrategy,
}

/// A bare roman-numeral label, e.g. `"iv."`, either as a whole line or as
/// the prefix of a heading line.
static ROMAN_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*[ivxlcdm]+\.\s*$").unwrap());

/// Locate one section in the document text.
///
/// Heading patterns are tried first, in order; the first match wins. If none
/// match, the full-span fallback patterns are tried the same way. Absence of
/// any match is not an error: the section is simply absent from this
/// document.
pub fn locate_section(text: &str, config: &SectionConfig) -> Option<SectionSeed> {
    for re in &config.heading_patterns {
        if let Some(m) = re.find(text) {
            debug!(section = %config.name, pattern = re.as_str(), "heading pattern matched");
            let start = include_preceding_label(text, m.start());
            return Some(SectionSeed {
                start,
                end: m.end(),
                strategy: LocateStrategy::Heading,
            });
        }
    }
    for re in &config.fallback_patterns {
        if let Some(m) = re.find(text) {
            debug!(section = %config.name, pattern = re.as_str(), "fallback pattern matched");
            return Some(SectionSeed {
                start: m.start(),
                end: m.end(),
                strategy: LocateStrategy::Fallback,
            });
        }
    }
    None
}

/// Locate every catalog section, preserving catalog order. Sections that are
/// not found are logged and omitted.
pub fn locate_sections(text: &str, catalog: &SectionCatalog) -> Vec<(String, SectionSeed)> {
    let mut seeds = Vec::new();
    for config in &catalog.sections {
        match locate_section(text, config) {
            Some(seed) => seeds.push((config.name.clone(), seed)),
            None => warn!(section = %config.name, "section not located in document"),
        }
    }
    seeds
}

/// Pull a heading seed back over a bare roman-numeral label so a section's
/// numbering is not orphaned from its body. Covers both a label on the line
/// preceding the heading and a label prefix on the heading line itself.
fn include_preceding_label(text: &str, start: usize) -> usize {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &text[line_start..start];
    if !prefix.is_empty() {
        return if ROMAN_LABEL.is_match(prefix) {
            line_start
        } else {
            start
        };
    }
    if line_start == 0 {
        return start;
    }
    let prev_start = text[..line_start - 1].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prev_line = &text[prev_start..line_start - 1];
    if ROMAN_LABEL.is_match(prev_line) {
        prev_start
    } else {
        start
    }
}

/// Keyword-window synthesis for documents without structural cues.
///
/// Scans line by line for any configured keyword (case-insensitive substring
/// match), clusters hit lines that are at most `params.gap` lines apart,
/// expands each cluster by `params.context` lines of surrounding text, merges
/// overlapping windows, and concatenates the surviving windows in document
/// order with a blank line between them.
pub fn keyword_windows(
    text: &str,
    config: &SectionConfig,
    params: &KeywordParams,
) -> Option<String> {
    if config.keywords.is_empty() {
        return None;
    }
    let keywords: Vec<String> = config.keywords.iter().map(|k| k.to_lowercase()).collect();
    let lines: Vec<&str> = text.split('\n').collect();

    let mut hits: Vec<usize> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if keywords.iter().any(|k| lower.contains(k)) {
            hits.push(idx);
        }
    }
    if hits.is_empty() {
        debug!(section = %config.name, "no keyword hits");
        return None;
    }

    // Cluster nearby hits.
    let mut clusters: Vec<(usize, usize)> = Vec::new();
    let mut start = hits[0];
    let mut prev = hits[0];
    for &idx in &hits[1..] {
        if idx - prev > params.gap {
            clusters.push((start, prev));
            start = idx;
        }
        prev = idx;
    }
    clusters.push((start, prev));

    // Expand each cluster by the context window, merging overlaps.
    let last_line = lines.len() - 1;
    let mut windows: Vec<(usize, usize)> = Vec::new();
    for (cluster_start, cluster_end) in clusters {
        let win_start = cluster_start.saturating_sub(params.context);
        let win_end = (cluster_end + params.context).min(last_line);
        match windows.last_mut() {
            Some((_, prev_end)) if win_start <= *prev_end + 1 => {
                *prev_end = (*prev_end).max(win_end);
            }
            _ => windows.push((win_start, win_end)),
        }
    }

    let mut pieces: Vec<&str> = Vec::new();
    for (win_start, win_end) in windows {
        pieces.extend(&lines[win_start..=win_end]);
        pieces.push("");
    }
    let joined = pieces.join("\n").trim().to_string();
    if joined.is_empty() { None } else { Some(joined) }
}
