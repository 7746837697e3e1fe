//! Text and file-name sanitizing applied before anything is persisted.

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid file name regex"));

/// Escape HTML-significant characters.
///
/// Covers `& < > " ' /` and the backtick. Output is stored as-is and rendered
/// verbatim by clients.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    out
}

/// Trim, then escape
pub fn clean_text(input: &str) -> String {
    escape_html(input.trim())
}

/// Reduce an uploaded file name to a safe single path component.
///
/// Directory parts are dropped and runs of unsafe characters become `_`.
/// Returns `None` when nothing usable is left.
pub fn sanitize_file_name(original: &str) -> Option<String> {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let cleaned = UNSAFE_FILE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}
