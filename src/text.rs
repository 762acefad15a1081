// src/text.rs
//! Shared text folding used by the keyword and table lookups.
//!
//! Scraped titles and descriptions arrive with HTML entities, odd spacing
//! and arbitrary case. `fold` reduces them to one canonical shape so that
//! plain `contains` / exact-key lookups behave predictably.

use std::borrow::Cow;

/// Decode HTML entities (`&amp;`, `&eacute;`, `&nbsp;` ...) without touching anything else.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if input.contains('&') {
        html_escape::decode_html_entities(input)
    } else {
        Cow::Borrowed(input)
    }
}

/// Lowercase + condensed spaces + trimmed, after entity decoding.
pub fn fold(input: &str) -> String {
    let decoded = decode_entities(input);
    let mut out = String::with_capacity(decoded.len());
    let mut last_space = true;
    for ch in decoded.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// `Some(folded)` for non-blank input, `None` otherwise.
pub fn fold_opt(input: Option<&str>) -> Option<String> {
    let folded = fold(input?);
    if folded.is_empty() {
        None
    } else {
        Some(folded)
    }
}
