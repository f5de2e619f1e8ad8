//! Byte-level recognizers shared by the block and inline passes.
//!
//! Every scanner looks at `s[pos..]` and returns how many bytes matched,
//! `0` meaning no match. Lines handed over by the block engine always end
//! in `\n`; the end of the buffer is treated the same way.

#[inline]
fn peek(s: &[u8], i: usize) -> Option<u8> {
    s.get(i).copied()
}

#[inline]
fn at_line_end(s: &[u8], i: usize) -> bool {
    matches!(peek(s, i), None | Some(b'\n'))
}

fn count_run(s: &[u8], pos: usize, c: u8) -> usize {
    s[pos.min(s.len())..].iter().take_while(|&&b| b == c).count()
}

fn count_spaces(s: &[u8], pos: usize) -> usize {
    count_run(s, pos, b' ')
}

/// Thematic break: three or more `*`, `-` or `_`, optionally separated by
/// spaces, and nothing else on the line.
pub fn scan_hrule(s: &[u8], pos: usize) -> usize {
    let Some(c @ (b'*' | b'-' | b'_')) = peek(s, pos) else {
        return 0;
    };
    let mut i = pos;
    let mut count = 0;
    while let Some(b) = peek(s, i) {
        match b {
            b if b == c => count += 1,
            b' ' | b'\t' => {}
            b'\n' => {
                i += 1;
                break;
            }
            _ => return 0,
        }
        i += 1;
    }
    if count >= 3 { i - pos } else { 0 }
}

/// One to six `#` followed by spaces or the end of the line. The length
/// covers the spaces, or the newline when the hashes end the line.
pub fn scan_atx_header_start(s: &[u8], pos: usize) -> usize {
    let hashes = count_run(s, pos, b'#');
    if hashes == 0 || hashes > 6 {
        return 0;
    }
    let after = pos + hashes;
    match peek(s, after) {
        Some(b' ') => hashes + count_spaces(s, after),
        Some(b'\n') => hashes + 1,
        None => hashes,
        _ => 0,
    }
}

/// Opening fence: three or more backticks or tildes. Returns the fence
/// length. A backtick fence's info string may not contain backticks.
pub fn scan_open_code_fence(s: &[u8], pos: usize) -> usize {
    let Some(c @ (b'`' | b'~')) = peek(s, pos) else {
        return 0;
    };
    let fence = count_run(s, pos, c);
    if fence < 3 {
        return 0;
    }
    if c == b'`' {
        let rest = &s[pos + fence..];
        let line = rest.split(|&b| b == b'\n').next().unwrap_or_default();
        if line.contains(&b'`') {
            return 0;
        }
    }
    fence
}

/// Closing fence at least `min_length` long, followed only by spaces.
pub fn scan_close_code_fence(s: &[u8], pos: usize, min_length: usize) -> usize {
    let Some(c @ (b'`' | b'~')) = peek(s, pos) else {
        return 0;
    };
    let fence = count_run(s, pos, c);
    if fence < 3 || fence < min_length {
        return 0;
    }
    let mut i = pos + fence;
    while matches!(peek(s, i), Some(b' ' | b'\t')) {
        i += 1;
    }
    if at_line_end(s, i) { fence } else { 0 }
}

/// Setext underline. Returns the header level: 1 for `=`, 2 for `-`.
pub fn scan_setext_header_line(s: &[u8], pos: usize) -> u8 {
    let level = match peek(s, pos) {
        Some(b'=') => 1,
        Some(b'-') => 2,
        _ => return 0,
    };
    let c = s[pos];
    let i = pos + count_run(s, pos, c);
    let i = i + count_spaces(s, i);
    if at_line_end(s, i) { level } else { 0 }
}

const RAW_TEXT_TAGS: [&str; 4] = ["script", "pre", "style", "textarea"];

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "base",
    "basefont",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "iframe",
    "legend",
    "li",
    "link",
    "main",
    "menu",
    "menuitem",
    "nav",
    "noframes",
    "ol",
    "optgroup",
    "option",
    "p",
    "param",
    "search",
    "section",
    "source",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
];

fn starts_with_ignore_case(s: &[u8], pos: usize, word: &str) -> bool {
    s.get(pos..pos + word.len())
        .is_some_and(|slice| slice.eq_ignore_ascii_case(word.as_bytes()))
}

/// Start of an HTML block: a comment, processing instruction, declaration,
/// CDATA section, or an opening/closing tag of a known block-level element.
pub fn scan_html_block_tag(s: &[u8], pos: usize) -> usize {
    if peek(s, pos) != Some(b'<') {
        return 0;
    }
    let i = pos + 1;
    if s[i.min(s.len())..].starts_with(b"!--") {
        return 4;
    }
    if s[i.min(s.len())..].starts_with(b"![CDATA[") {
        return 9;
    }
    match peek(s, i) {
        Some(b'?') => return 2,
        Some(b'!') if peek(s, i + 1).is_some_and(|b| b.is_ascii_alphabetic()) => return 3,
        _ => {}
    }

    let closing = peek(s, i) == Some(b'/');
    let name_start = if closing { i + 1 } else { i };
    let tag_ends = |end: usize, allow_self_close: bool| match peek(s, end) {
        None | Some(b' ' | b'\t' | b'\n' | b'>') => true,
        Some(b'/') => allow_self_close && peek(s, end + 1) == Some(b'>'),
        _ => false,
    };

    if !closing {
        for tag in RAW_TEXT_TAGS {
            let end = name_start + tag.len();
            if starts_with_ignore_case(s, name_start, tag) && tag_ends(end, false) {
                return end - pos;
            }
        }
    }
    for tag in BLOCK_TAGS {
        let end = name_start + tag.len();
        if starts_with_ignore_case(s, name_start, tag) && tag_ends(end, true) {
            return end - pos;
        }
    }
    0
}

/// URI autolink body, scanned from just after the `<`. The length
/// includes the closing `>`.
pub fn scan_autolink_uri(s: &[u8], pos: usize) -> usize {
    let scheme_len = s[pos.min(s.len())..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
        .count();
    if !(2..=32).contains(&scheme_len) || !s[pos].is_ascii_alphabetic() {
        return 0;
    }
    let mut i = pos + scheme_len;
    if peek(s, i) != Some(b':') {
        return 0;
    }
    i += 1;
    while let Some(b) = peek(s, i) {
        match b {
            b'>' => return i + 1 - pos,
            b'<' => return 0,
            b if b <= b' ' => return 0,
            _ => i += 1,
        }
    }
    0
}

/// Email autolink body, scanned from just after the `<`. The length
/// includes the closing `>`.
pub fn scan_autolink_email(s: &[u8], pos: usize) -> usize {
    let local = s[pos.min(s.len())..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b))
        .count();
    if local == 0 || peek(s, pos + local) != Some(b'@') {
        return 0;
    }
    let mut i = pos + local + 1;
    loop {
        let label = s[i.min(s.len())..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count();
        if label == 0 || label > 63 || s[i] == b'-' || s[i + label - 1] == b'-' {
            return 0;
        }
        i += label;
        match peek(s, i) {
            Some(b'.') => i += 1,
            Some(b'>') => return i + 1 - pos,
            _ => return 0,
        }
    }
}

fn skip_html_space(s: &[u8], mut i: usize) -> usize {
    while matches!(peek(s, i), Some(b' ' | b'\t' | b'\n')) {
        i += 1;
    }
    i
}

fn find_from(s: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    s.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn scan_tag_name(s: &[u8], pos: usize) -> usize {
    if !peek(s, pos).is_some_and(|b| b.is_ascii_alphabetic()) {
        return 0;
    }
    1 + s[pos + 1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count()
}

/// Attribute starting at `pos` (whitespace already skipped). Returns the
/// position after it.
fn scan_attribute(s: &[u8], pos: usize) -> Option<usize> {
    if !peek(s, pos).is_some_and(|b| b.is_ascii_alphabetic() || b == b'_' || b == b':') {
        return None;
    }
    let mut i = pos + 1;
    while peek(s, i).is_some_and(|b| b.is_ascii_alphanumeric() || b"_.:-".contains(&b)) {
        i += 1;
    }
    let after_name = i;
    let j = skip_html_space(s, i);
    if peek(s, j) != Some(b'=') {
        return Some(after_name);
    }
    i = skip_html_space(s, j + 1);
    match peek(s, i)? {
        q @ (b'"' | b'\'') => {
            let close = s[i + 1..].iter().position(|&b| b == q)?;
            Some(i + close + 2)
        }
        _ => {
            let len = s[i..]
                .iter()
                .take_while(|&&b| !b" \t\n\"'=<>`".contains(&b))
                .count();
            (len > 0).then_some(i + len)
        }
    }
}

/// Inline HTML, scanned from just after the `<`. The length includes the
/// closing `>`.
pub fn scan_html_tag(s: &[u8], pos: usize) -> usize {
    let rest = &s[pos.min(s.len())..];

    if rest.starts_with(b"!--") {
        let body = pos + 3;
        if rest[3..].starts_with(b">") || rest[3..].starts_with(b"->") {
            return 0;
        }
        return match find_from(s, body, b"--") {
            Some(dashes) if peek(s, dashes + 2) == Some(b'>') => dashes + 3 - pos,
            _ => 0,
        };
    }
    if rest.starts_with(b"![CDATA[") {
        return find_from(s, pos + 8, b"]]>").map_or(0, |end| end + 3 - pos);
    }
    if rest.starts_with(b"?") {
        return find_from(s, pos + 1, b"?>").map_or(0, |end| end + 2 - pos);
    }
    if rest.starts_with(b"!") {
        let name = s[pos + 1..]
            .iter()
            .take_while(|b| b.is_ascii_uppercase())
            .count();
        if name == 0 || !matches!(peek(s, pos + 1 + name), Some(b' ' | b'\t' | b'\n')) {
            return 0;
        }
        return s[pos + 1 + name..]
            .iter()
            .position(|&b| b == b'>')
            .map_or(0, |end| pos + 1 + name + end + 1 - pos);
    }
    if rest.starts_with(b"/") {
        let name = scan_tag_name(s, pos + 1);
        if name == 0 {
            return 0;
        }
        let i = skip_html_space(s, pos + 1 + name);
        return if peek(s, i) == Some(b'>') { i + 1 - pos } else { 0 };
    }

    let name = scan_tag_name(s, pos);
    if name == 0 {
        return 0;
    }
    let mut i = pos + name;
    loop {
        let j = skip_html_space(s, i);
        match peek(s, j) {
            Some(b'>') => return j + 1 - pos,
            Some(b'/') if peek(s, j + 1) == Some(b'>') => return j + 2 - pos,
            _ if j == i => return 0,
            _ => match scan_attribute(s, j) {
                Some(next) => i = next,
                None => return 0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Named,
    Decimal,
    Hexadecimal,
}

/// Entity or numeric character reference starting at `&`. Returns the
/// length including the `;` and what kind of reference it is.
pub fn scan_entity(s: &[u8], pos: usize) -> Option<(usize, EntityKind)> {
    if peek(s, pos) != Some(b'&') {
        return None;
    }
    let i = pos + 1;
    let (kind, body_start, max) = match (peek(s, i), peek(s, i + 1)) {
        (Some(b'#'), Some(b'x' | b'X')) => (EntityKind::Hexadecimal, i + 2, 6),
        (Some(b'#'), _) => (EntityKind::Decimal, i + 1, 7),
        _ => (EntityKind::Named, i, 32),
    };
    let body = s[body_start.min(s.len())..]
        .iter()
        .take_while(|b| match kind {
            EntityKind::Hexadecimal => b.is_ascii_hexdigit(),
            EntityKind::Decimal => b.is_ascii_digit(),
            EntityKind::Named => b.is_ascii_alphanumeric(),
        })
        .count();
    let valid = match kind {
        EntityKind::Named => {
            body >= 2 && body <= max && s[body_start].is_ascii_alphabetic()
        }
        _ => (1..=max).contains(&body),
    };
    if !valid || peek(s, body_start + body) != Some(b';') {
        return None;
    }
    Some((body_start + body + 1 - pos, kind))
}

/// Run of spaces, tabs and newlines.
pub fn scan_spacechars(s: &[u8], pos: usize) -> usize {
    s[pos.min(s.len())..]
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\n'))
        .count()
}

/// Link destination, including any leading spaces and newlines. Either
/// `<...>` without line breaks, or a run of non-space characters whose
/// parentheses balance. An empty destination matches with length 0.
pub fn scan_link_url(s: &[u8], pos: usize) -> usize {
    let start = pos + scan_spacechars(s, pos);

    if peek(s, start) == Some(b'<') {
        let mut i = start + 1;
        while let Some(b) = peek(s, i) {
            match b {
                b'>' => return i + 1 - pos,
                b'\\' if peek(s, i + 1).is_some_and(|n| n != b'\n') => i += 2,
                b'<' | b'\n' => break,
                _ => i += 1,
            }
        }
    }

    let mut i = start;
    let mut depth = 0usize;
    while let Some(b) = peek(s, i) {
        match b {
            b'\\' if peek(s, i + 1).is_some_and(|n| n.is_ascii_punctuation()) => i += 2,
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' if depth > 0 => {
                depth -= 1;
                i += 1;
            }
            b')' => break,
            b if b <= b' ' => break,
            _ => i += 1,
        }
    }
    if depth > 0 || i == start {
        return 0;
    }
    i - pos
}

/// Link title in `"..."`, `'...'` or `(...)`, with backslash escapes.
pub fn scan_link_title(s: &[u8], pos: usize) -> usize {
    let close = match peek(s, pos) {
        Some(b'"') => b'"',
        Some(b'\'') => b'\'',
        Some(b'(') => b')',
        _ => return 0,
    };
    let mut i = pos + 1;
    while let Some(b) = peek(s, i) {
        match b {
            b'\\' if peek(s, i + 1).is_some() => i += 2,
            b if b == close => return i + 1 - pos,
            b'(' if close == b')' => return 0,
            _ => i += 1,
        }
    }
    0
}
