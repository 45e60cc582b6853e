// src/util.rs — Text helpers for prompts and log fields

/// Cut `s` to at most `max_len` bytes on a UTF-8 boundary.
pub fn clip(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview for log fields: whitespace collapsed, clipped, and
/// marked with `…` when shortened.
pub fn snippet(s: &str, max_len: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let clipped = clip(&flat, max_len);
    if clipped.len() < flat.len() {
        format!("{clipped}…")
    } else {
        flat
    }
}
