//! Markdown to plain-text normalization.
//!
//! ## Pass Order
//!
//! The passes are not commutative. Headings are stripped before emphasis so a
//! `# **Title**` line loses both markers; bold runs before italic so `**x**`
//! is not read as two italic spans; emphasis and code are unwrapped before
//! links so a formatted label comes out clean; bullets are rewritten after
//! italic so a `* item` marker is never mistaken for emphasis; blank-line
//! collapsing and trimming run last because every earlier pass can leave
//! empty lines behind.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal bullet emitted in place of `-`, `*`, and `+` list markers.
pub const BULLET: &str = "• ";

/// Normalize markdown-flavored text into plain inline text.
///
/// Passes, in order:
/// 1. Remove leading heading markers (`#` through `######`)
/// 2. Unwrap bold (`**x**`, `__x__`)
/// 3. Unwrap italic (`*x*`, `_x_`)
/// 4. Unwrap inline code (`` `x` ``)
/// 5. Replace links `[label](target)` with `label`
/// 6. Rewrite bullet markers as `• `
/// 7. Drop ordered-list markers (`1. `)
/// 8. Collapse three or more newlines to a paragraph break
/// 9. Trim the whole text
///
/// Line endings are normalized to `\n` before the first pass. The pipeline
/// is then repeated until the text stops changing, so markers exposed by a
/// later pass (a bullet behind an ordered marker, nested emphasis) are
/// removed as well. Every pass only deletes markup or swaps an ASCII list
/// marker for `•`, so the loop terminates.
///
/// # Examples
///
/// ```
/// use folio::markdown::normalize;
///
/// assert_eq!(
///     normalize("**bold** and *italic* and `code`"),
///     "bold and italic and code"
/// );
/// assert_eq!(normalize("1. - item"), "• item");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = normalize_line_endings(text);
    loop {
        let next = run_passes(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One application of passes 1 through 9, in order.
fn run_passes(s: &str) -> String {
    let s = strip_headings(s);
    let s = unwrap_bold(&s);
    let s = unwrap_italic(&s);
    let s = unwrap_inline_code(&s);
    let s = flatten_links(&s);
    let s = rewrite_bullets(&s);
    let s = strip_ordered_markers(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

/// Normalize `text` and split it into non-empty paragraphs in reading order.
///
/// Lines inside a paragraph (list items, for example) keep their single
/// newline separators.
pub fn paragraphs(text: &str) -> Vec<String> {
    split_paragraphs(&normalize(text))
}

/// Split already-normalized text on the paragraph separator.
pub fn split_paragraphs(normalized: &str) -> Vec<String> {
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Pass 1: headings ────────────────────────────────────────────────────────

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]+)+").expect("valid regex"));

fn strip_headings(input: &str) -> String {
    RE_HEADING.replace_all(input, "").into_owned()
}

// ── Pass 2: bold ────────────────────────────────────────────────────────────

static RE_BOLD_STAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^*\s](?:[^\n]*?[^*\s])?)\*\*").expect("valid regex")
});
static RE_BOLD_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b__([^_\s](?:[^\n]*?[^_\s])?)__\b").expect("valid regex"));

fn unwrap_bold(input: &str) -> String {
    let s = RE_BOLD_STAR.replace_all(input, "$1");
    RE_BOLD_UNDERSCORE.replace_all(&s, "$1").into_owned()
}

// ── Pass 3: italic ──────────────────────────────────────────────────────────

static RE_ITALIC_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*?[^*\s])?)\*").expect("valid regex"));
static RE_ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\s](?:[^_\n]*?[^_\s])?)_\b").expect("valid regex"));

fn unwrap_italic(input: &str) -> String {
    let s = RE_ITALIC_STAR.replace_all(input, "$1");
    RE_ITALIC_UNDERSCORE.replace_all(&s, "$1").into_owned()
}

// ── Pass 4: inline code ─────────────────────────────────────────────────────

static RE_INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

fn unwrap_inline_code(input: &str) -> String {
    RE_INLINE_CODE.replace_all(input, "$1").into_owned()
}

// ── Pass 5: links ───────────────────────────────────────────────────────────

static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\([^)\n]*\)").expect("valid regex"));

fn flatten_links(input: &str) -> String {
    RE_LINK.replace_all(input, "$1").into_owned()
}

// ── Pass 6: bullet lists ────────────────────────────────────────────────────

static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").expect("valid regex"));

fn rewrite_bullets(input: &str) -> String {
    RE_BULLET.replace_all(input, BULLET).into_owned()
}

// ── Pass 7: ordered lists ───────────────────────────────────────────────────

static RE_ORDERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:\d+\.[ \t]+)+").expect("valid regex"));

fn strip_ordered_markers(input: &str) -> String {
    RE_ORDERED.replace_all(input, "").into_owned()
}

// ── Pass 8: paragraph separators ────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_emphasis_and_code() {
        assert_eq!(
            normalize("**bold** and *italic* and `code`"),
            "bold and italic and code"
        );
        assert_eq!(normalize("__strong__ and _soft_"), "strong and soft");
    }

    #[test]
    fn test_snake_case_is_untouched() {
        assert_eq!(normalize("call my_func_name now"), "call my_func_name now");
    }

    #[test]
    fn test_headings_removed() {
        assert_eq!(normalize("# Title\n\n### Sub\ntext"), "Title\n\nSub\ntext");
        assert_eq!(normalize("####### seven"), "####### seven");
        assert_eq!(normalize("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_heading_with_bold() {
        assert_eq!(normalize("## **Findings**"), "Findings");
    }

    #[test]
    fn test_links_keep_label() {
        assert_eq!(
            normalize("See [the docs](https://example.com) and [*this*](x)."),
            "See the docs and this."
        );
    }

    #[test]
    fn test_bullets_become_bullet_char() {
        assert_eq!(normalize("- one\n* two\n+ three"), "• one\n• two\n• three");
    }

    #[test]
    fn test_bullet_with_inline_emphasis() {
        assert_eq!(normalize("* item *with* star"), "• item with star");
    }

    #[test]
    fn test_ordered_markers_dropped() {
        assert_eq!(normalize("1. first\n2. second\n10. tenth"), "first\nsecond\ntenth");
    }

    #[test]
    fn test_blank_lines_collapse_and_trim() {
        assert_eq!(normalize("\n\n  a\n\n\n\n\nb  \n\n"), "a\n\nb");
        assert_eq!(normalize("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_triple_star() {
        assert_eq!(normalize("***both***"), "both");
    }

    #[test]
    fn test_markers_behind_ordered_marker() {
        assert_eq!(normalize("1. - item"), "• item");
        assert_eq!(normalize("1. # Heading"), "Heading");
        assert_eq!(normalize("2. **Bold** step"), "Bold step");
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(normalize("****a****"), "a");
        assert_eq!(normalize("say ***__deep__*** now"), "say deep now");
    }

    #[test]
    fn test_second_normalize_is_noop_on_layered_markers() {
        for input in ["1. - item", "1. # Heading", "****a****", "# 1. * x"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_paragraphs_split() {
        let paras = paragraphs("# Intro\n\nFirst para\nstill first.\n\n\n\n- a\n- b\n\n  \n\n");
        assert_eq!(paras, vec!["Intro", "First para\nstill first.", "• a\n• b"]);
    }

    #[test]
    fn test_paragraphs_empty_input() {
        assert!(paragraphs("").is_empty());
        assert!(paragraphs("  \n\n \n").is_empty());
    }

    fn word() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]{1,8}"
    }

    fn inline() -> impl Strategy<Value = String> {
        prop_oneof![
            word(),
            word().prop_map(|w| format!("**{w}**")),
            word().prop_map(|w| format!("*{w}*")),
            word().prop_map(|w| format!("`{w}`")),
            word().prop_map(|w| format!("****{w}****")),
            word().prop_map(|w| format!("***{w}***")),
            word().prop_map(|w| format!("**_{w}_**")),
            word().prop_map(|w| format!("*`{w}`*")),
            (word(), word()).prop_map(|(l, t)| format!("[{l}](https://{t}.example)")),
        ]
    }

    fn line() -> impl Strategy<Value = String> {
        let body = prop::collection::vec(inline(), 1..6).prop_map(|ws| ws.join(" "));
        (
            prop_oneof![
                Just(""),
                Just("# "),
                Just("## "),
                Just("- "),
                Just("* "),
                Just("+ "),
                Just("1. "),
                Just("12. "),
                Just("1. - "),
                Just("1. # "),
                Just("3. * "),
                Just("# 1. "),
                Just("- 1. "),
                Just("  + "),
            ],
            body,
        )
            .prop_map(|(prefix, body)| format!("{prefix}{body}"))
    }

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(
            (line(), prop_oneof![Just("\n"), Just("\n\n"), Just("\n\n\n\n")]),
            0..12,
        )
        .prop_map(|parts| {
            parts
                .into_iter()
                .map(|(l, sep)| l + sep)
                .collect::<String>()
        })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(doc in document()) {
            let once = normalize(&doc);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalized_has_no_triple_newlines(doc in document()) {
            let out = normalize(&doc);
            prop_assert!(!out.contains("\n\n\n"));
            prop_assert_eq!(out.trim(), out.as_str());
        }

        #[test]
        fn prop_paragraphs_are_non_empty(doc in document()) {
            for p in paragraphs(&doc) {
                prop_assert!(!p.trim().is_empty());
                prop_assert!(!p.contains("\n\n"));
            }
        }
    }
}
