use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing horizontal whitespace before a line break.
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());

/// A word hyphenated across a line break: `"institu-\ntional"` → `"institutional"`.
static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\n(\w)").unwrap());

/// Three or more consecutive newlines, i.e. runs of blank lines.
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Runs of horizontal whitespace inside a line.
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Join per-page extracted strings into one cleaned document string.
pub fn normalize_pages(pages: &[String]) -> String {
    normalize_text(&pages.join("\n"))
}

/// Clean raw PDF-extracted text into its canonical form.
///
/// - unifies `\r\n` / `\r` line terminators to `\n`
/// - strips trailing whitespace from every line
/// - repairs hyphenation artifacts from line breaks
/// - collapses runs of blank lines to a single blank line
/// - collapses runs of spaces/tabs to a single space
/// - trims leading/trailing whitespace
///
/// Idempotent: the trailing-whitespace strip runs before the hyphenation
/// repair, and the repair runs to a fixed point, so normalizing
/// already-normalized text returns the identical string.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut text = TRAILING_WS.replace_all(&text, "\n").into_owned();
    // Joining one break can expose the next ("x-\n-\ny"), so repeat until
    // nothing matches.
    loop {
        match HYPHEN_BREAK.replace_all(&text, "$1") {
            Cow::Owned(joined) => text = joined,
            Cow::Borrowed(_) => break,
        }
    }
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_pages_with_newlines() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(normalize_pages(&pages), "page one\npage two");
    }

    #[test]
    fn unifies_line_terminators() {
        assert_eq!(normalize_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn repairs_hyphenated_line_breaks() {
        assert_eq!(
            normalize_text("institu-\ntional framework"),
            "institutional framework"
        );
    }

    #[test]
    fn hyphen_before_blank_line_is_kept() {
        // Only a hyphen directly followed by a word character on the next
        // line is a line-break artifact.
        assert_eq!(normalize_text("dash-\n\nnext"), "dash-\n\nnext");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn collapses_horizontal_whitespace() {
        assert_eq!(normalize_text("a   b\t\tc"), "a b c");
    }

    #[test]
    fn trims_document_edges() {
        assert_eq!(normalize_text("\n\n  body  \n\n"), "body");
    }

    #[test]
    fn idempotent_on_normalized_text() {
        let raw = "Head-  \ning one\r\n\r\n\r\n\r\nBody   text here.  \nMore- \nbody.\n";
        let once = normalize_text(raw);
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn consecutive_hyphen_breaks_resolve_in_one_pass() {
        // The first break only becomes joinable after the second is joined.
        let once = normalize_text("x-\n-\ny");
        assert_eq!(once, "xy");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn idempotent_on_trailing_space_hyphen() {
        // "- \nword": the trailing space is stripped before the hyphen join
        // runs, so one pass already yields the fixed point.
        let once = normalize_text("wor- \nd");
        assert_eq!(once, "word");
        assert_eq!(normalize_text(&once), once);
    }
}
