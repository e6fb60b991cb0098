//! Text sanitization applied to every field that enters or leaves the
//! system.
//!
//! The rule keeps word characters (alphanumerics plus underscore),
//! whitespace, and the punctuation that legitimately appears in titles
//! and producer names (`.`, `,`, `'`, `-`). Everything else is stripped.

use std::sync::LazyLock;

use regex::Regex;

/// Characters stripped by [`sanitize`]: anything outside `\w`, `\s`,
/// `.`, `,`, `'`, `-`.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,'-]").expect("sanitize regex is valid"));

/// Strip unsafe characters from a string.
///
/// Sanitizing an already-sanitized string returns it unchanged
/// (idempotence), so the same function is safe to apply on both the
/// ingest and the output path.
pub fn sanitize(input: &str) -> String {
    UNSAFE_CHARS.replace_all(input, "").into_owned()
}

/// Sanitize and trim, returning `None` when nothing survives.
///
/// Used for required fields: a field whose sanitized form is empty is
/// treated as missing.
pub fn sanitize_required(input: &str) -> Option<String> {
    let cleaned = sanitize(input);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
