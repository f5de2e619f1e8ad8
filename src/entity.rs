//! Character references and backslash escapes.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::scanners::{EntityKind, scan_entity};

/// Characters a backslash can escape: ASCII punctuation, plus the bullet
/// so that `\•` never starts a list item.
pub fn is_escapable(c: char) -> bool {
    c.is_ascii_punctuation() || c == '•'
}

/// Decode the entity that starts at `s[pos]` (an `&`). Returns the decoded
/// text and the number of bytes consumed, or `None` when the text there is
/// not a known entity. Numeric references that name no valid character
/// decode to U+FFFD.
pub fn decode_entity(s: &str, pos: usize) -> Option<(String, usize)> {
    let (len, kind) = scan_entity(s.as_bytes(), pos)?;
    let text = &s[pos..pos + len];
    let decoded = match kind {
        EntityKind::Named => decode_named(text)?,
        EntityKind::Decimal => decode_numeric(&text[2..len - 1], 10),
        EntityKind::Hexadecimal => decode_numeric(&text[3..len - 1], 16),
    };
    Some((decoded, len))
}

/// Named references keyed by their full `&name;` spelling. Legacy forms
/// without the semicolon are left out.
static NAMED: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    entities::ENTITIES
        .iter()
        .filter(|e| e.entity.ends_with(';'))
        .map(|e| (e.entity, e.characters))
        .collect()
});

fn decode_named(entity: &str) -> Option<String> {
    NAMED.get(entity).map(|&decoded| decoded.to_string())
}

fn decode_numeric(digits: &str, radix: u32) -> String {
    u32::from_str_radix(digits, radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

/// Remove backslashes before escapable characters and decode entities.
pub fn unescape(s: &str) -> String {
    decode(s, true)
}

/// Decode entities, leaving backslashes alone.
pub fn decode_entities(s: &str) -> String {
    decode(s, false)
}

fn decode(s: &str, backslashes: bool) -> String {
    if !s.contains(['\\', '&']) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if backslashes => match chars.peek() {
                Some(&(_, next)) if is_escapable(next) => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push('\\'),
            },
            '&' => match decode_entity(s, i) {
                Some((decoded, len)) => {
                    out.push_str(&decoded);
                    while chars.peek().is_some_and(|&(j, _)| j < i + len) {
                        chars.next();
                    }
                }
                None => out.push('&'),
            },
            _ => out.push(c),
        }
    }
    out
}
