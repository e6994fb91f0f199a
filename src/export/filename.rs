//! Filesystem-safe base names derived from project titles.

/// Base name used when a title has no usable characters at all.
const FALLBACK: &str = "_";

/// Map a title to a lower-case base name containing only `[a-z0-9_]`.
///
/// Every character that is not an ASCII letter, digit, or whitespace becomes
/// `_`; whitespace runs become a single `_`; `_` runs collapse; one leading
/// and one trailing `_` are stripped. Total and deterministic: a title with no
/// alphanumerics maps to `"_"`.
///
/// # Examples
///
/// ```
/// use folio::export::sanitize_filename;
///
/// assert_eq!(sanitize_filename("A/B Test: Report #1!"), "a_b_test_report_1");
/// assert_eq!(sanitize_filename("!!!"), "_");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        let mapped = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '_'
        };
        // Whitespace and punctuation both map to `_`, so collapsing `_` runs
        // also collapses whitespace runs.
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.strip_prefix('_').unwrap_or(&out);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);

    if trimmed.is_empty() {
        FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
