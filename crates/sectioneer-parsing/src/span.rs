use tracing::warn;

use crate::section::{LocateStrategy, SectionSeed};

/// Final, non-overlapping text range of one section within a document.
/// Transient: computed per extraction run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpan {
    pub section: String,
    pub start: usize,
    pub end: usize,
    pub strategy: LocateStrategy,
}

/// Resolve located seeds into non-overlapping spans covering the document.
///
/// Seeds are ordered by start offset; each section runs up to the next
/// section's start, the last one to end-of-document. Because the seeds'
/// starts are already adjusted (roman-numeral pullback happens at locate
/// time), the resolved spans never overlap regardless of how the individual
/// pattern matches were shaped. A section whose resolved text trims to empty
/// is dropped rather than reported as an empty span.
pub fn resolve_spans(text: &str, seeds: Vec<(String, SectionSeed)>) -> Vec<DocumentSpan> {
    let mut ordered = seeds;
    ordered.sort_by_key(|(_, seed)| seed.start);

    let mut spans = Vec::with_capacity(ordered.len());
    for (idx, (section, seed)) in ordered.iter().enumerate() {
        let end = ordered
            .get(idx + 1)
            .map(|(_, next)| next.start)
            .unwrap_or(text.len());
        if text[seed.start..end].trim().is_empty() {
            warn!(section = %section, "resolved span is empty, dropping");
            continue;
        }
        spans.push(DocumentSpan {
            section: section.clone(),
            start: seed.start,
            end,
            strategy: seed.strategy,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(start: usize, end: usize) -> SectionSeed {
        SectionSeed {
            start,
            end,
            strategy: LocateStrategy::Heading,
        }
    }

    #[test]
    fn spans_partition_the_document() {
        let text = "0123456789abcdefghij";
        let seeds = vec![
            ("b".to_string(), seed(10, 14)),
            ("a".to_string(), seed(0, 4)),
        ];
        let spans = resolve_spans(text, seeds);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 10));
        assert_eq!((spans[1].start, spans[1].end), (10, text.len()));
    }

    #[test]
    fn overlapping_seed_ends_do_not_overlap_spans() {
        // Seed ends from greedy fallback matches may cross the next seed's
        // start; resolution ignores seed ends entirely.
        let text = "aaaa bbbb cccc dddd";
        let seeds = vec![
            ("a".to_string(), seed(0, 18)),
            ("b".to_string(), seed(5, 19)),
            ("c".to_string(), seed(10, 19)),
        ];
        let spans = resolve_spans(text, seeds);
        let mut covered = 0;
        for span in &spans {
            assert_eq!(span.start, covered, "no gap, no overlap");
            covered = span.end;
        }
        assert_eq!(covered, text.len());
    }

    #[test]
    fn order_is_document_order_not_seed_order() {
        let text = "first second third";
        let seeds = vec![
            ("late".to_string(), seed(13, 18)),
            ("early".to_string(), seed(0, 5)),
            ("mid".to_string(), seed(6, 12)),
        ];
        let sections: Vec<String> = resolve_spans(text, seeds)
            .into_iter()
            .map(|s| s.section)
            .collect();
        assert_eq!(sections, ["early", "mid", "late"]);
    }

    #[test]
    fn empty_spans_are_dropped() {
        let text = "Heading A\n   \nHeading B\nbody";
        let seeds = vec![
            ("a".to_string(), seed(0, 9)),
            // Whitespace-only run between offsets 10 and 14.
            ("blank".to_string(), seed(10, 13)),
            ("b".to_string(), seed(14, 23)),
        ];
        let spans = resolve_spans(text, seeds);
        let sections: Vec<&str> = spans.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(sections, ["a", "b"]);
    }

    #[test]
    fn single_seed_runs_to_document_end() {
        let text = "Heading\nbody text";
        let spans = resolve_spans(text, vec![("only".to_string(), seed(0, 7))]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, text.len());
    }
}
