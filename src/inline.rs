//! Inline parsing.
//!
//! One left-to-right pass over a block's raw text. Nodes are built in a
//! flat arena and chained through `next` links; emphasis and link openers
//! are ordinary text nodes that get promoted in place to containers once
//! their closer shows up. Unresolved delimiters wait on the
//! [`DelimiterStack`] until a closer or the end of input settles them.

use unicode_categories::UnicodeCategories;

use crate::ast::Inline;
use crate::delimiter::{Activity, DelimiterStack, Entry, EntryId, Priority};
use crate::entity::{self, is_escapable, unescape};
use crate::reference::{LinkTarget, MAX_LABEL_LENGTH, ReferenceMap, normalize_label};
use crate::scanners::{
    scan_autolink_email, scan_autolink_uri, scan_html_tag, scan_link_title, scan_link_url,
    scan_spacechars,
};
use crate::settings::ParserSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InlineId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Newline,
    Backticks,
    Backslash,
    Entity,
    PointyBrace,
    Delimiter,
    OpenBracket,
    CloseBracket,
    Bang,
}

/// Maps the bytes that may start an inline construct to their handler.
/// Everything else is plain text.
#[derive(Debug, Clone)]
pub(crate) struct DispatchTable {
    handlers: [Option<Handler>; 128],
}

impl DispatchTable {
    pub fn new(settings: &ParserSettings) -> Self {
        let mut handlers = [None; 128];
        handlers[b'\n' as usize] = Some(Handler::Newline);
        handlers[b'`' as usize] = Some(Handler::Backticks);
        handlers[b'\\' as usize] = Some(Handler::Backslash);
        handlers[b'&' as usize] = Some(Handler::Entity);
        handlers[b'<' as usize] = Some(Handler::PointyBrace);
        handlers[b'*' as usize] = Some(Handler::Delimiter);
        handlers[b'_' as usize] = Some(Handler::Delimiter);
        handlers[b'[' as usize] = Some(Handler::OpenBracket);
        handlers[b']' as usize] = Some(Handler::CloseBracket);
        handlers[b'!' as usize] = Some(Handler::Bang);
        if settings.strikethrough_tilde {
            handlers[b'~' as usize] = Some(Handler::Delimiter);
        }
        DispatchTable { handlers }
    }

    fn get(&self, b: u8) -> Option<Handler> {
        self.handlers.get(b as usize).copied().flatten()
    }
}

#[derive(Debug)]
enum Kind {
    Text(String),
    LineBreak,
    SoftBreak,
    Code(String),
    RawHtml(String),
    Emphasis(Option<InlineId>),
    Strong(Option<InlineId>),
    Strikethrough(Option<InlineId>),
    Link {
        url: String,
        title: String,
        children: Option<InlineId>,
    },
    Image {
        url: String,
        title: String,
        children: Option<InlineId>,
    },
}

#[derive(Debug)]
struct Node {
    kind: Kind,
    next: Option<InlineId>,
}

/// Parse the inline content of one paragraph or header.
pub(crate) fn parse_inlines(
    text: &str,
    references: &ReferenceMap,
    dispatch: &DispatchTable,
) -> Vec<Inline> {
    let text = text.trim_end();
    if text.is_empty() {
        return Vec::new();
    }

    let mut subject = Subject::new(text, references, dispatch);
    while subject.pos < subject.bytes.len() {
        if let Some(node) = subject.parse_inline() {
            subject.append(node);
        }
    }
    subject.resolve_pending(None);
    subject.into_inlines()
}

struct Subject<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    references: &'a ReferenceMap,
    dispatch: &'a DispatchTable,
    /// `nodes[0]` is a sentinel whose `next` is the first real node.
    nodes: Vec<Node>,
    last: InlineId,
    stack: DelimiterStack,
}

impl<'a> Subject<'a> {
    fn new(text: &'a str, references: &'a ReferenceMap, dispatch: &'a DispatchTable) -> Self {
        Subject {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            references,
            dispatch,
            nodes: vec![Node {
                kind: Kind::Text(String::new()),
                next: None,
            }],
            last: InlineId(0),
            stack: DelimiterStack::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn node(&mut self, kind: Kind) -> InlineId {
        let id = InlineId(self.nodes.len());
        self.nodes.push(Node { kind, next: None });
        id
    }

    fn text_node(&mut self, text: impl Into<String>) -> InlineId {
        self.node(Kind::Text(text.into()))
    }

    fn append(&mut self, id: InlineId) {
        self.nodes[self.last.0].next = Some(id);
        self.last = id;
    }

    /// Parse one construct at `pos`. `None` means the handler folded its
    /// input into nodes that are already in place.
    fn parse_inline(&mut self) -> Option<InlineId> {
        let Some(handler) = self.dispatch.get(self.bytes[self.pos]) else {
            return Some(self.handle_text());
        };
        match handler {
            Handler::Newline => Some(self.handle_newline()),
            Handler::Backticks => Some(self.handle_backticks()),
            Handler::Backslash => Some(self.handle_backslash()),
            Handler::Entity => Some(self.handle_entity()),
            Handler::PointyBrace => Some(self.handle_pointy_brace()),
            Handler::Delimiter => self.handle_delimiter(),
            Handler::OpenBracket => {
                self.pos += 1;
                Some(self.open_bracket(false))
            }
            Handler::CloseBracket => self.handle_close_bracket(),
            Handler::Bang => {
                self.pos += 1;
                if self.peek() == Some(b'[') {
                    self.pos += 1;
                    Some(self.open_bracket(true))
                } else {
                    Some(self.text_node("!"))
                }
            }
        }
    }

    fn handle_text(&mut self) -> InlineId {
        let start = self.pos;
        let end = self.bytes[start + 1..]
            .iter()
            .position(|&b| self.dispatch.get(b).is_some())
            .map_or(self.bytes.len(), |offset| start + 1 + offset);
        self.pos = end;

        let mut contents = &self.text[start..end];
        if self.peek() == Some(b'\n') {
            contents = contents.trim_end();
        }
        self.text_node(contents)
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn handle_newline(&mut self) -> InlineId {
        let newline = self.pos;
        self.pos += 1;
        self.skip_spaces();
        if newline >= 2 && &self.bytes[newline - 2..newline] == b"  " {
            self.node(Kind::LineBreak)
        } else {
            self.node(Kind::SoftBreak)
        }
    }

    fn handle_backticks(&mut self) -> InlineId {
        let start = self.pos;
        let ticks = self.bytes[start..].iter().take_while(|&&b| b == b'`').count();
        let content_start = start + ticks;

        let mut i = content_start;
        while i < self.bytes.len() {
            if self.bytes[i] != b'`' {
                i += 1;
                continue;
            }
            let run = self.bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == ticks {
                self.pos = i + run;
                let code = collapse_whitespace(&self.text[content_start..i]);
                return self.node(Kind::Code(code));
            }
            i += run;
        }

        self.pos = content_start;
        self.text_node(&self.text[start..content_start])
    }

    fn handle_backslash(&mut self) -> InlineId {
        self.pos += 1;
        match self.text[self.pos..].chars().next() {
            Some('\n') => {
                self.pos += 1;
                self.skip_spaces();
                self.node(Kind::LineBreak)
            }
            Some(c) if is_escapable(c) => {
                self.pos += c.len_utf8();
                self.text_node(c)
            }
            _ => self.text_node("\\"),
        }
    }

    fn handle_entity(&mut self) -> InlineId {
        match entity::decode_entity(self.text, self.pos) {
            Some((decoded, len)) => {
                self.pos += len;
                self.text_node(decoded)
            }
            None => {
                self.pos += 1;
                self.text_node("&")
            }
        }
    }

    fn handle_pointy_brace(&mut self) -> InlineId {
        self.pos += 1;
        let start = self.pos;

        let uri = scan_autolink_uri(self.bytes, start);
        if uri > 0 {
            let contents = &self.text[start..start + uri - 1];
            self.pos += uri;
            return self.autolink(contents.to_string(), contents);
        }

        let email = scan_autolink_email(self.bytes, start);
        if email > 0 {
            let contents = &self.text[start..start + email - 1];
            self.pos += email;
            return self.autolink(format!("mailto:{contents}"), contents);
        }

        let tag = scan_html_tag(self.bytes, start);
        if tag > 0 {
            self.pos += tag;
            return self.node(Kind::RawHtml(self.text[start - 1..start + tag].to_string()));
        }

        self.text_node("<")
    }

    fn autolink(&mut self, url: String, contents: &str) -> InlineId {
        let child = self.text_node(entity::decode_entities(contents));
        self.node(Kind::Link {
            url,
            title: String::new(),
            children: Some(child),
        })
    }

    /// Measure the delimiter run at `pos` and decide whether it may open
    /// and/or close emphasis. Advances past the run.
    fn scan_delimiters(&mut self, c: u8) -> (usize, bool, bool) {
        let start = self.pos;
        let count = self.bytes[start..].iter().take_while(|&&b| b == c).count();
        self.pos = start + count;

        let before = self.text[..start].chars().next_back().unwrap_or('\n');
        let after = self.text[self.pos..].chars().next().unwrap_or('\n');
        let (before_space, before_punct) = classify(before);
        let (after_space, after_punct) = classify(after);

        let mut can_open = !after_space && !(after_punct && !before_space && !before_punct);
        let mut can_close = !before_space && !(before_punct && !after_space && !after_punct);
        if c == b'_' {
            can_open = can_open && !before.is_ascii_alphanumeric();
            can_close = can_close && !after.is_ascii_alphanumeric();
        }
        (count, can_open, can_close)
    }

    fn handle_delimiter(&mut self) -> Option<InlineId> {
        let c = self.bytes[self.pos];
        let start = self.pos;
        let (count, can_open, mut can_close) = self.scan_delimiters(c);

        if c == b'~' && count == 1 {
            return Some(self.text_node("~"));
        }

        if can_close {
            let (opener, still_closes) =
                self.stack
                    .find_matching_opener(self.stack.last(), None, Priority::Emphasis, c);
            can_close = still_closes;
            if let Some(opener) = opener {
                let used = self.match_delimiters(opener, count, None);
                if used > 0 {
                    if self.stack.get(opener).count == 0 {
                        self.stack.remove_range(opener, None);
                    } else {
                        if let Some(inner) = self.stack.next(opener) {
                            self.stack.remove_range(inner, None);
                        }
                        if exhausted(self.stack.get(opener)) {
                            self.stack.remove(opener);
                        }
                    }
                    // Leftover closer characters are scanned again as a new run.
                    self.pos -= count - used;
                    return None;
                }
            }
        }

        let node = self.text_node(&self.text[start..start + count]);
        if can_open || can_close {
            self.stack
                .push(Entry::emphasis(c, count, can_open, can_close, node));
        }
        Some(node)
    }

    /// Wrap the nodes between `opener` and the current position (or
    /// `closer`) in an emphasis container. Returns how many delimiter
    /// characters were used from each side.
    fn match_delimiters(
        &mut self,
        opener: EntryId,
        closing_count: usize,
        closer: Option<EntryId>,
    ) -> usize {
        let entry = self.stack.get(opener);
        let delimiter = entry.delimiter;
        let used = use_length(delimiter, entry.count, closing_count);
        if used == 0 {
            return 0;
        }
        let node = entry.node;
        let remaining = entry.count - used;
        let children = self.nodes[node.0].next;
        let container = match (delimiter, used) {
            (b'~', _) => Kind::Strikethrough(children),
            (_, 1) => Kind::Emphasis(children),
            _ => Kind::Strong(children),
        };
        self.stack.get_mut(opener).count = remaining;

        let wrapper = if remaining == 0 {
            self.nodes[node.0].kind = container;
            node
        } else {
            if let Kind::Text(literal) = &mut self.nodes[node.0].kind {
                literal.truncate(remaining);
            }
            let wrapper = self.node(container);
            self.nodes[node.0].next = Some(wrapper);
            wrapper
        };

        match closer {
            Some(closer) => self.consume_closer(wrapper, closer, used),
            None => {
                self.nodes[wrapper.0].next = None;
                self.last = wrapper;
            }
        }
        used
    }

    /// Take `used` characters off a pending closer. Its old node stays
    /// behind, emptied, as the last child of `container`; any leftover
    /// characters move to a fresh node after the container.
    fn consume_closer(&mut self, container: InlineId, closer: EntryId, used: usize) {
        let entry = self.stack.get(closer);
        let old = entry.node;
        let remaining = entry.count - used;
        let delimiter = entry.delimiter;

        let after = self.nodes[old.0].next.take();
        self.nodes[old.0].kind = Kind::Text(String::new());
        self.stack.get_mut(closer).count = remaining;

        if remaining > 0 {
            let fresh = self.text_node(char::from(delimiter).to_string().repeat(remaining));
            self.nodes[fresh.0].next = after;
            self.nodes[container.0].next = Some(fresh);
            self.stack.get_mut(closer).node = fresh;
        } else {
            self.nodes[container.0].next = after;
        }
    }

    /// Settle every pending entry after `floor` (all of them when `None`):
    /// brackets are dropped, closers are matched against openers that come
    /// after `floor`. Entries left unmatched stay on the stack.
    fn resolve_pending(&mut self, floor: Option<EntryId>) {
        let first_after = |stack: &DelimiterStack| match floor {
            Some(f) => stack.next(f),
            None => stack.first(),
        };

        let mut current = first_after(&self.stack);
        while let Some(id) = current {
            current = self.stack.next(id);
            if self.stack.get(id).priority == Priority::Links {
                self.stack.remove(id);
            }
        }

        let mut current = first_after(&self.stack);
        while let Some(closer) = current {
            let entry = self.stack.get(closer);
            if !entry.can_close {
                current = self.stack.next(closer);
                continue;
            }
            let (opener, still_closes) = self.stack.find_matching_opener(
                self.stack.prev(closer),
                floor,
                entry.priority,
                entry.delimiter,
            );

            let Some(opener) = opener else {
                current = self.stack.next(closer);
                if !still_closes {
                    let entry = self.stack.get_mut(closer);
                    entry.can_close = false;
                    if !entry.can_open {
                        self.stack.remove(closer);
                    }
                }
                continue;
            };

            let count = self.stack.get(closer).count;
            let used = self.match_delimiters(opener, count, Some(closer));
            if used == 0 {
                current = self.stack.next(closer);
                continue;
            }
            self.stack.remove_between(opener, closer);
            if exhausted(self.stack.get(opener)) {
                self.stack.remove(opener);
            }
            if exhausted(self.stack.get(closer)) {
                current = self.stack.next(closer);
                self.stack.remove(closer);
            }
        }
    }

    fn open_bracket(&mut self, image: bool) -> InlineId {
        let node = self.text_node(if image { "![" } else { "[" });
        self.stack.push(Entry::bracket(image, node, self.pos));
        node
    }

    fn handle_close_bracket(&mut self) -> Option<InlineId> {
        self.pos += 1;
        let (opener, _) =
            self.stack
                .find_matching_opener(self.stack.last(), None, Priority::Links, b'[');
        let Some(opener) = opener else {
            return Some(self.text_node("]"));
        };
        if self.stack.get(opener).activity == Activity::Blocked {
            self.stack.remove(opener);
            return Some(self.text_node("]"));
        }

        let label_end = self.pos;
        let mut target = self.parse_link_details();
        if matches!(target, None | Some(LinkTarget::SelfReference)) {
            let start = self.stack.get(opener).start;
            target = if label_end - 1 - start > 4 * MAX_LABEL_LENGTH {
                Some(LinkTarget::InvalidReference)
            } else {
                Some(self.references.lookup(&self.text[start..label_end - 1]))
            };
            if target == Some(LinkTarget::InvalidReference) {
                // Rescan a `[]` that turned out not to name anything.
                self.pos = label_end;
            }
        }

        match target {
            Some(LinkTarget::Resolved { url, title }) => {
                self.make_link(opener, url, title);
                None
            }
            _ => {
                self.stack.remove(opener);
                Some(self.text_node("]"))
            }
        }
    }

    /// Promote the opener's node to a link or image holding everything
    /// parsed since the bracket.
    fn make_link(&mut self, opener: EntryId, url: String, title: String) {
        let entry = self.stack.get(opener);
        let node = entry.node;
        let image = entry.image;
        let children = self.nodes[node.0].next.take();
        self.nodes[node.0].kind = if image {
            Kind::Image {
                url,
                title,
                children,
            }
        } else {
            Kind::Link {
                url,
                title,
                children,
            }
        };

        if !image {
            let mut current = self.stack.prev(opener);
            while let Some(id) = current {
                let earlier = self.stack.get_mut(id);
                if earlier.delimiter == b'[' && !earlier.image {
                    if earlier.activity == Activity::Blocked {
                        break;
                    }
                    earlier.activity = Activity::Blocked;
                }
                current = self.stack.prev(id);
            }
        }

        let floor = self.stack.prev(opener);
        self.stack.remove(opener);
        self.resolve_pending(floor);
        let rest = match floor {
            Some(f) => self.stack.next(f),
            None => self.stack.first(),
        };
        if let Some(rest) = rest {
            self.stack.remove_range(rest, None);
        }
        self.last = node;
    }

    /// Read what follows a closing bracket: an inline `(url "title")`, or a
    /// `[label]` to look up. Leaves `pos` untouched unless something matched.
    fn parse_link_details(&mut self) -> Option<LinkTarget> {
        let label_end = self.pos;
        match self.peek() {
            Some(b'(') => {
                let url_start = self.pos + 1 + scan_spacechars(self.bytes, self.pos + 1);
                let url_end = url_start + scan_link_url(self.bytes, url_start);
                let title_start = url_end + scan_spacechars(self.bytes, url_end);
                let title_end = if title_start == url_end {
                    title_start
                } else {
                    title_start + scan_link_title(self.bytes, title_start)
                };
                let end = title_end + scan_spacechars(self.bytes, title_end);
                if self.bytes.get(end) == Some(&b')') {
                    self.pos = end + 1;
                    return Some(LinkTarget::Resolved {
                        url: clean_url(&self.text[url_start..url_end]),
                        title: clean_title(&self.text[title_start..title_end]),
                    });
                }
            }
            Some(b'[' | b' ' | b'\n') => {
                if let Some((start, end, after)) = scan_reference_label(self.bytes, self.pos) {
                    self.pos = after;
                    if start == end {
                        return Some(LinkTarget::SelfReference);
                    }
                    let target = self.references.lookup(&self.text[start..end]);
                    if matches!(target, LinkTarget::Resolved { .. }) {
                        return Some(target);
                    }
                    self.pos = label_end;
                    return Some(LinkTarget::InvalidReference);
                }
            }
            _ => {}
        }
        self.pos = label_end;
        None
    }

    fn into_inlines(mut self) -> Vec<Inline> {
        let first = self.nodes[0].next;
        self.collect(first)
    }

    fn collect(&mut self, first: Option<InlineId>) -> Vec<Inline> {
        let mut out: Vec<Inline> = Vec::new();
        let mut current = first;
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            current = node.next;
            let kind = std::mem::replace(&mut node.kind, Kind::Text(String::new()));
            let inline = match kind {
                Kind::Text(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(Inline::Text(previous)) = out.last_mut() {
                        previous.push_str(&text);
                        continue;
                    }
                    Inline::Text(text)
                }
                Kind::LineBreak => Inline::LineBreak,
                Kind::SoftBreak => Inline::SoftBreak,
                Kind::Code(code) => Inline::Code(code),
                Kind::RawHtml(html) => Inline::RawHtml(html),
                Kind::Emphasis(children) => Inline::Emphasis(self.collect(children)),
                Kind::Strong(children) => Inline::Strong(self.collect(children)),
                Kind::Strikethrough(children) => Inline::Strikethrough(self.collect(children)),
                Kind::Link {
                    url,
                    title,
                    children,
                } => Inline::Link {
                    url,
                    title,
                    children: self.collect(children),
                },
                Kind::Image {
                    url,
                    title,
                    children,
                } => Inline::Image {
                    url,
                    title,
                    children: self.collect(children),
                },
            };
            out.push(inline);
        }
        out
    }
}

/// How many characters a closer takes from an opener. When both runs are
/// at least three long the parity of their combined length decides.
fn use_length(delimiter: u8, opener: usize, closer: usize) -> usize {
    if delimiter == b'~' {
        return if opener >= 2 && closer >= 2 { 2 } else { 0 };
    }
    if opener >= 3 && closer >= 3 {
        if (opener + closer) % 2 == 0 { 2 } else { 1 }
    } else {
        opener.min(closer)
    }
}

fn exhausted(entry: &Entry) -> bool {
    entry.count == 0 || (entry.delimiter == b'~' && entry.count < 2)
}

/// (is whitespace, is punctuation or symbol)
fn classify(c: char) -> (bool, bool) {
    (
        c.is_whitespace(),
        c.is_ascii_punctuation() || c.is_punctuation() || c.is_symbol(),
    )
}

/// Trim spaces and newlines from both ends and collapse inner runs of
/// them to a single space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.trim_matches([' ', '\n']).chars() {
        if c == ' ' || c == '\n' {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

fn clean_url(url: &str) -> String {
    let url = url.trim();
    let url = url
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url);
    unescape(url)
}

fn clean_title(title: &str) -> String {
    let quoted = [('"', '"'), ('\'', '\''), ('(', ')')]
        .iter()
        .find_map(|&(open, close)| title.strip_prefix(open)?.strip_suffix(close));
    unescape(quoted.unwrap_or(title))
}

/// Skip spaces and at most one newline.
fn spnl(bytes: &[u8], mut pos: usize) -> usize {
    let mut seen_newline = false;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b' ' => {}
            b'\n' if !seen_newline => seen_newline = true,
            _ => break,
        }
        pos += 1;
    }
    pos
}

/// Bracketed label starting at `pos`, after optional spaces and newlines.
/// Returns the label's byte range and the position after the `]`.
fn scan_reference_label(bytes: &[u8], pos: usize) -> Option<(usize, usize, usize)> {
    let open = pos + bytes[pos..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\n')
        .count();
    if bytes.get(open) != Some(&b'[') {
        return None;
    }
    let start = open + 1;
    let limit = bytes.len().min(start + MAX_LABEL_LENGTH);
    let mut i = start;
    while i < limit {
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => return None,
            b']' => return Some((start, i, i + 1)),
            _ => i += 1,
        }
    }
    None
}

/// Parse one link reference definition at the start of `content` and
/// register it. Returns the number of bytes it spans, or 0 if `content`
/// does not start with a definition.
pub(crate) fn parse_reference_definition(content: &str, references: &mut ReferenceMap) -> usize {
    let text = content.trim_end();
    let bytes = text.as_bytes();

    let Some((label_start, label_end, mut pos)) = scan_reference_label(bytes, 0) else {
        return 0;
    };
    let label = &text[label_start..label_end];
    if normalize_label(label).is_none_or(|key| key.is_empty()) {
        return 0;
    }

    if bytes.get(pos) != Some(&b':') {
        return 0;
    }
    pos = spnl(bytes, pos + 1);

    let url_len = scan_link_url(bytes, pos);
    if url_len == 0 {
        return 0;
    }
    let url = clean_url(&text[pos..pos + url_len]);
    pos += url_len;

    let before_title = pos;
    pos = spnl(bytes, pos);
    let title_len = scan_link_title(bytes, pos);
    let title = if title_len > 0 {
        let title = clean_title(&text[pos..pos + title_len]);
        pos += title_len;
        title
    } else {
        pos = before_title;
        String::new()
    };

    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'\n') => pos += 1,
        None => {}
        Some(_) => return 0,
    }

    references.insert(label, url, title);
    pos
}
