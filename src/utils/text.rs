//! Text helpers

/// Truncate to at most `max` characters, ellipsizing when cut.
///
/// Char-based, not byte-based: the provider caps that motivate this count
/// characters, and Khmer text is multi-byte throughout. The result never
/// exceeds `max` chars; the `...` counts against `max`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
