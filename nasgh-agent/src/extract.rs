//! JSON extraction from free-text model replies.
//!
//! Backends are instructed to answer with bare JSON, but in practice they
//! wrap it in code fences or add a line of commentary. This module pulls
//! the first balanced `{...}` span out of the raw text so the caller can
//! hand it to a real JSON parser; it does not validate the span beyond
//! brace balance.

/// Locate the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals are ignored, including escaped
/// quotes. Returns `None` when the text has no opening brace or the span
/// never closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
