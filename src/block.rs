//! Block structure pass.
//!
//! Lines are fed in one at a time. Each line first re-matches the chain of
//! open containers from the root down, then looks for new container
//! starts, and whatever text is left goes to a leaf. Blocks are finalized
//! as soon as a line fails to continue them; the inline pass runs only
//! after the last line, once every reference definition is known.

use crate::ast::{
    BlockContent, BlockId, BlockTag, Document, FencedCodeData, ListData, ListDelimiter, ListKind,
};
use crate::entity::unescape;
use crate::error::{ParseError, Result};
use crate::inline::{DispatchTable, parse_inlines, parse_reference_definition};
use crate::scanners::{
    scan_atx_header_start, scan_close_code_fence, scan_hrule, scan_html_block_tag,
    scan_open_code_fence, scan_setext_header_line,
};

const CODE_INDENT: usize = 4;
const TAB_STOP: usize = 4;

pub(crate) struct BlockParser {
    document: Document,
    /// Deepest open block after the previous line.
    current: BlockId,
    line_number: usize,
}

impl BlockParser {
    pub fn new() -> Self {
        BlockParser {
            document: Document::new(),
            current: BlockId::ROOT,
            line_number: 0,
        }
    }

    fn parent(&self, id: BlockId, line: usize) -> Result<BlockId> {
        let block = &self.document[id];
        block.parent.ok_or(ParseError::MissingAncestor {
            tag: block.tag.name(),
            line,
        })
    }

    /// Incorporate one input line, without its line terminator.
    pub fn process_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let line_number = self.line_number;
        let mut ln = expand_tabs(line);
        ln.push('\n');
        let bytes = ln.as_bytes();

        let mut offset = 0;
        let mut indentation = Indentation::default();
        let mut all_matched = true;
        let mut blank = false;
        let mut container = BlockId::ROOT;

        // Continue the open containers.
        while let Some(child) = self.document[container]
            .last_child
            .filter(|&c| self.document[c].open)
        {
            container = child;
            let first_nonspace = indentation.first_nonspace(bytes, offset);
            let indent = first_nonspace - offset;
            blank = bytes.get(first_nonspace) == Some(&b'\n');

            match &self.document[container].tag {
                BlockTag::BlockQuote => {
                    if indent <= 3 && bytes.get(first_nonspace) == Some(&b'>') {
                        offset = first_nonspace + 1;
                        if bytes.get(offset) == Some(&b' ') {
                            offset += 1;
                        }
                    } else {
                        all_matched = false;
                    }
                }
                BlockTag::ListItem(data) => {
                    let width = data.marker_offset + data.padding;
                    if indent >= width {
                        offset += width;
                    } else if blank {
                        offset = first_nonspace;
                    } else {
                        all_matched = false;
                    }
                }
                BlockTag::IndentedCode => {
                    if indent >= CODE_INDENT {
                        offset += CODE_INDENT;
                    } else if blank {
                        offset = first_nonspace;
                    } else {
                        all_matched = false;
                    }
                }
                // a header never spans lines
                BlockTag::AtxHeader { .. } | BlockTag::SetextHeader { .. } => all_matched = false,
                BlockTag::FencedCode(data) => {
                    let mut remaining = data.fence_offset;
                    while remaining > 0 && bytes.get(offset) == Some(&b' ') {
                        offset += 1;
                        remaining -= 1;
                    }
                }
                BlockTag::HtmlBlock => all_matched = !blank,
                BlockTag::Paragraph => {
                    if blank {
                        self.document.get_mut(container).last_line_blank = true;
                        all_matched = false;
                    }
                }
                _ => {}
            }

            if !all_matched {
                container = self.parent(container, line_number)?;
                break;
            }
        }

        let last_matched = container;

        // A second blank line in a row closes every enclosing list.
        if blank && self.document[container].last_line_blank {
            container = self.break_out_of_lists(container, line_number)?;
        }

        // Look for new container starts.
        let mut consumed_line = false;
        while !matches!(
            self.document[container].tag,
            BlockTag::FencedCode(_) | BlockTag::IndentedCode | BlockTag::HtmlBlock
        ) {
            let first_nonspace = indentation.first_nonspace(bytes, offset);
            let indent = first_nonspace - offset;
            blank = bytes.get(first_nonspace) == Some(&b'\n');

            if indent >= CODE_INDENT {
                // no indented code inside a lazy paragraph line
                if matches!(self.document[self.current].tag, BlockTag::Paragraph) || blank {
                    break;
                }
                offset += CODE_INDENT;
                container =
                    self.add_child(container, BlockTag::IndentedCode, line_number, offset + 1)?;
            } else if bytes.get(first_nonspace) == Some(&b'>') {
                offset = first_nonspace + 1;
                if bytes.get(offset) == Some(&b' ') {
                    offset += 1;
                }
                container = self.add_child(
                    container,
                    BlockTag::BlockQuote,
                    line_number,
                    first_nonspace + 1,
                )?;
            } else if let matched @ 1.. = scan_atx_header_start(bytes, first_nonspace) {
                offset = first_nonspace + matched;
                let level = bytes[first_nonspace..]
                    .iter()
                    .take_while(|&&b| b == b'#')
                    .count() as u8;
                container = self.add_child(
                    container,
                    BlockTag::AtxHeader { level },
                    line_number,
                    offset + 1,
                )?;
            } else if let fence_length @ 1.. = scan_open_code_fence(bytes, first_nonspace) {
                let data = FencedCodeData {
                    fence_char: char::from(bytes[first_nonspace]),
                    fence_length,
                    fence_offset: indent,
                    info: String::new(),
                };
                container = self.add_child(
                    container,
                    BlockTag::FencedCode(data),
                    line_number,
                    first_nonspace + 1,
                )?;
                offset = first_nonspace + fence_length;
            } else if scan_html_block_tag(bytes, first_nonspace) > 0 {
                // the tag stays part of the block's text
                container =
                    self.add_child(container, BlockTag::HtmlBlock, line_number, first_nonspace + 1)?;
            } else if let Some(level) = self.setext_level(container, bytes, first_nonspace) {
                self.document.get_mut(container).tag = BlockTag::SetextHeader { level };
                offset = bytes.len() - 1;
                consumed_line = true;
            } else if !(matches!(self.document[container].tag, BlockTag::Paragraph) && !all_matched)
                && scan_hrule(bytes, first_nonspace) > 0
            {
                let rule = self.add_child(
                    container,
                    BlockTag::HorizontalRuler,
                    line_number,
                    first_nonspace + 1,
                )?;
                self.finalize(rule, line_number);
                container = self.parent(rule, line_number)?;
                offset = bytes.len() - 1;
                consumed_line = true;
            } else if let Some((len, width, mut data)) = parse_list_marker(&ln, first_nonspace) {
                offset = first_nonspace + len;
                let spaces = bytes[offset..]
                    .iter()
                    .take(6)
                    .take_while(|&&b| b == b' ')
                    .count();
                if spaces >= 5 || spaces < 1 || bytes.get(offset) == Some(&b'\n') {
                    // content indented further belongs to a code block inside the item
                    data.padding = width + 1;
                    if spaces > 0 {
                        offset += 1;
                    }
                } else {
                    data.padding = width + spaces;
                    offset += spaces;
                }
                data.marker_offset = indent;

                let continues_list = matches!(
                    &self.document[container].tag,
                    BlockTag::List(list) if list.matches(&data)
                );
                if !continues_list {
                    container = self.add_child(
                        container,
                        BlockTag::List(data.clone()),
                        line_number,
                        first_nonspace + 1,
                    )?;
                }
                container = self.add_child(
                    container,
                    BlockTag::ListItem(data),
                    line_number,
                    first_nonspace + 1,
                )?;
            } else {
                break;
            }

            if self.document[container].tag.accepts_lines() {
                break;
            }
        }

        // What remains from `offset` on is text.
        let first_nonspace = indentation.first_nonspace(bytes, offset);
        let indent = first_nonspace - offset;
        let blank = bytes.get(first_nonspace) == Some(&b'\n');

        // Quote markers make a line non-blank, and blank lines inside fenced
        // code or headers never make a list loose. Neither does the line
        // that opened an empty list item.
        let block = &self.document[container];
        let last_line_blank = blank
            && !consumed_line
            && !matches!(
                block.tag,
                BlockTag::BlockQuote
                    | BlockTag::FencedCode(_)
                    | BlockTag::AtxHeader { .. }
                    | BlockTag::SetextHeader { .. }
            )
            && !(matches!(block.tag, BlockTag::ListItem(_))
                && block.first_child.is_none()
                && block.start_line == line_number);
        self.document.get_mut(container).last_line_blank = last_line_blank;

        let mut ancestor = self.document[container].parent;
        while let Some(id) = ancestor {
            let block = self.document.get_mut(id);
            block.last_line_blank = false;
            ancestor = block.parent;
        }

        let current = &self.document[self.current];
        let lazy = self.current != last_matched
            && container == last_matched
            && !blank
            && matches!(current.tag, BlockTag::Paragraph)
            && !current.raw_text().is_empty();
        if lazy {
            return self.add_line(self.current, &ln, offset);
        }

        // Close whatever was not matched.
        let mut unmatched = self.current;
        while unmatched != last_matched {
            self.finalize(unmatched, line_number);
            unmatched = self.parent(unmatched, line_number)?;
        }

        match &self.document[container].tag {
            BlockTag::IndentedCode | BlockTag::HtmlBlock => {
                self.add_line(container, &ln, offset)?;
            }
            BlockTag::FencedCode(data) => {
                let closes = indent <= 3
                    && bytes.get(first_nonspace) == Some(&(data.fence_char as u8))
                    && scan_close_code_fence(bytes, first_nonspace, data.fence_length) > 0;
                if closes {
                    self.finalize(container, line_number);
                    container = self.parent(container, line_number)?;
                } else {
                    self.add_line(container, &ln, offset)?;
                }
            }
            _ if blank => {}
            BlockTag::AtxHeader { .. } => {
                let text = strip_closing_hashes(&ln);
                self.add_line(container, text, first_nonspace)?;
                self.finalize(container, line_number);
                container = self.parent(container, line_number)?;
            }
            tag if tag.accepts_lines() => {
                self.add_line(container, &ln, first_nonspace)?;
            }
            BlockTag::HorizontalRuler | BlockTag::SetextHeader { .. } => {
                tracing::warn!(
                    line = line_number,
                    container = self.document[container].tag.name(),
                    text = %ln.trim_end(),
                    "line did not match any block, dropping it"
                );
            }
            _ => {
                container =
                    self.add_child(container, BlockTag::Paragraph, line_number, first_nonspace + 1)?;
                self.add_line(container, &ln, first_nonspace)?;
            }
        }

        self.current = container;
        Ok(())
    }

    /// Finalize every open block and parse inline content.
    pub fn finish(mut self, dispatch: &DispatchTable) -> Result<Document> {
        let line = self.line_number + 1;
        let mut open = Some(self.current);
        while let Some(id) = open {
            self.finalize(id, line);
            open = self.document[id].parent;
        }

        let Document { blocks, references } = &mut self.document;
        for block in blocks.iter_mut() {
            if !matches!(
                block.tag,
                BlockTag::Paragraph | BlockTag::AtxHeader { .. } | BlockTag::SetextHeader { .. }
            ) {
                continue;
            }
            let BlockContent::Raw(text) = &block.content else {
                return Err(ParseError::MissingContent {
                    tag: block.tag.name(),
                });
            };
            let inlines = parse_inlines(text, references, dispatch);
            block.content = BlockContent::Inlines(inlines);
        }
        Ok(self.document)
    }

    /// Append `parent`'s new child, first closing `parent` and its
    /// ancestors until one of them can hold `tag`.
    fn add_child(
        &mut self,
        mut parent: BlockId,
        tag: BlockTag,
        line: usize,
        column: usize,
    ) -> Result<BlockId> {
        while !self.document[parent].tag.can_contain(&tag) {
            self.finalize(parent, line);
            parent = self.parent(parent, line)?;
        }
        Ok(self.document.append_child(parent, tag, line, column))
    }

    fn add_line(&mut self, id: BlockId, line: &str, offset: usize) -> Result<()> {
        let block = self.document.get_mut(id);
        if !block.open {
            return Err(ParseError::ClosedContainer {
                tag: block.tag.name(),
                line: self.line_number,
            });
        }
        if let BlockContent::Raw(text) = &mut block.content {
            text.push_str(line.get(offset..).unwrap_or_default());
        }
        Ok(())
    }

    /// Setext underline level, when `container` is a one-line paragraph.
    fn setext_level(&self, container: BlockId, bytes: &[u8], pos: usize) -> Option<u8> {
        let block = &self.document[container];
        if !matches!(block.tag, BlockTag::Paragraph) {
            return None;
        }
        let level = scan_setext_header_line(bytes, pos);
        let text = block.raw_text();
        let single_line = !text.strip_suffix('\n').unwrap_or(text).contains('\n');
        (level > 0 && single_line).then_some(level)
    }

    /// Close `container` and everything up to and including the outermost
    /// list enclosing it. Returns the list's parent, or `container` when no
    /// list encloses it.
    fn break_out_of_lists(&mut self, container: BlockId, line: usize) -> Result<BlockId> {
        let mut list = Some(BlockId::ROOT);
        while let Some(id) = list {
            if matches!(self.document[id].tag, BlockTag::List(_)) {
                break;
            }
            list = self.document[id].last_child;
        }
        let Some(list) = list else {
            return Ok(container);
        };
        if !self.encloses(list, container) {
            return Ok(container);
        }

        let mut current = container;
        while current != list {
            self.finalize(current, line);
            current = self.parent(current, line)?;
        }
        self.finalize(list, line);
        self.parent(list, line)
    }

    fn encloses(&self, ancestor: BlockId, mut id: BlockId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.document[id].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Close a block. Does nothing if it is already closed.
    pub fn finalize(&mut self, id: BlockId, line_number: usize) {
        if !self.document[id].open {
            return;
        }
        let tight = matches!(self.document[id].tag, BlockTag::List(_))
            .then(|| self.list_is_tight(id));

        let Document { blocks, references } = &mut self.document;
        let block = &mut blocks[id.index()];
        block.open = false;
        block.end_line = if line_number > block.start_line {
            line_number - 1
        } else {
            line_number
        };

        let mut only_definitions = false;
        match (&mut block.tag, &mut block.content) {
            (BlockTag::Paragraph, BlockContent::Raw(text)) => {
                while text.starts_with('[') {
                    let consumed = parse_reference_definition(text, references);
                    if consumed == 0 {
                        break;
                    }
                    text.drain(..consumed);
                }
                only_definitions = text.trim().is_empty();
            }
            (BlockTag::IndentedCode, BlockContent::Raw(text)) => remove_trailing_blank_lines(text),
            (BlockTag::FencedCode(data), BlockContent::Raw(text)) => {
                let first_line = text.find('\n').unwrap_or(text.len());
                data.info = unescape(text[..first_line].trim());
                text.drain(..(first_line + 1).min(text.len()));
            }
            (BlockTag::List(data), _) => data.tight = tight.unwrap_or(true),
            _ => {}
        }
        if only_definitions {
            block.tag = BlockTag::ReferenceDefinition;
        }
    }

    /// A list is loose when an item other than the last ends with a blank
    /// line, or when any item has a blank line between two of its children.
    fn list_is_tight(&self, list: BlockId) -> bool {
        for (item_id, item) in self.document.children(list) {
            if item.last_line_blank && item.next.is_some() {
                return false;
            }
            for (child_id, child) in self.document.children(item_id) {
                if self.ends_with_blank_line(child_id)
                    && (item.next.is_some() || child.next.is_some())
                {
                    return false;
                }
            }
        }
        true
    }

    fn ends_with_blank_line(&self, id: BlockId) -> bool {
        let block = &self.document[id];
        if block.last_line_blank {
            return true;
        }
        match block.tag {
            BlockTag::List(_) | BlockTag::ListItem(_) => block
                .last_child
                .is_some_and(|child| self.ends_with_blank_line(child)),
            _ => false,
        }
    }
}

fn count_spaces(bytes: &[u8], pos: usize) -> usize {
    bytes
        .get(pos..)
        .map_or(0, |rest| rest.iter().take_while(|&&b| b == b' ').count())
}

/// First non-space byte at or after an offset within one line. Remembers
/// the last run of spaces it scanned, so nested containers stepping through
/// the same indentation do not count it again.
#[derive(Debug, Default)]
struct Indentation {
    run: Option<(usize, usize)>,
}

impl Indentation {
    fn first_nonspace(&mut self, bytes: &[u8], offset: usize) -> usize {
        let cached = self
            .run
            .filter(|&(start, end)| start <= offset && offset <= end);
        if let Some((_, end)) = cached {
            return end;
        }
        let end = offset + count_spaces(bytes, offset);
        self.run = Some((offset, end));
        end
    }
}

/// Replace tabs with spaces up to the next multiple of four columns.
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 1);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let width = TAB_STOP - column % TAB_STOP;
            out.extend(std::iter::repeat_n(' ', width));
            column += width;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Drop an ATX header's closing run of `#`. A backslash before the last
/// `#` keeps that one.
fn strip_closing_hashes(line: &str) -> &str {
    let line = line.trim_end();
    let hashes = line.bytes().rev().take_while(|&b| b == b'#').count();
    let mut end = line.len() - hashes;
    if hashes > 0 && line[..end].ends_with('\\') {
        end += 1;
    }
    &line[..end]
}

/// Cut trailing lines that hold only whitespace, keeping the newline of
/// the last line with content.
fn remove_trailing_blank_lines(text: &mut String) {
    match text.rfind(|c: char| !matches!(c, ' ' | '\t' | '\r' | '\n')) {
        None => text.clear(),
        Some(last) => {
            if let Some(newline) = text[last..].find('\n') {
                text.truncate(last + newline + 1);
            }
        }
    }
}

/// List marker at `pos`. Returns its length in bytes, its width in
/// columns, and the list data (padding and offset filled in by the caller).
fn parse_list_marker(line: &str, pos: usize) -> Option<(usize, usize, ListData)> {
    let rest = line.get(pos..)?;
    let followed_by_space =
        |len: usize| rest[len..].chars().next().is_some_and(char::is_whitespace);
    let mut data = ListData {
        kind: ListKind::Bullet,
        bullet_char: None,
        start: 1,
        delimiter: ListDelimiter::Period,
        marker_offset: 0,
        padding: 0,
        tight: false,
    };

    let first = rest.chars().next()?;
    match first {
        '*' | '-' | '+' if scan_hrule(line.as_bytes(), pos) == 0 => {
            if !followed_by_space(1) {
                return None;
            }
            data.bullet_char = Some(first);
            Some((1, 1, data))
        }
        '•' => {
            let len = first.len_utf8();
            if !followed_by_space(len) {
                return None;
            }
            data.bullet_char = Some(first);
            Some((len, 1, data))
        }
        '0'..='9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            // numbers that overflow are not list markers
            data.start = rest[..digits].parse().ok()?;
            data.delimiter = match rest.as_bytes().get(digits) {
                Some(b'.') => ListDelimiter::Period,
                Some(b')') => ListDelimiter::Parenthesis,
                _ => return None,
            };
            if !followed_by_space(digits + 1) {
                return None;
            }
            data.kind = ListKind::Ordered;
            Some((digits + 1, digits + 1, data))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ParserSettings;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(input: &str) -> Document {
        let mut parser = BlockParser::new();
        for line in input.lines() {
            parser.process_line(line).unwrap();
        }
        parser
            .finish(&DispatchTable::new(&ParserSettings::default()))
            .unwrap()
    }

    fn tags(doc: &Document, id: BlockId) -> Vec<&'static str> {
        doc.children(id).map(|(_, b)| b.tag.name()).collect()
    }

    fn first_child(doc: &Document, id: BlockId) -> BlockId {
        doc[id].first_child.unwrap()
    }

    #[rstest]
    #[case("\tfoo", "    foo")]
    #[case("a\tb", "a   b")]
    #[case("abcd\te", "abcd    e")]
    #[case("•\tx", "•   x")]
    fn tabs_expand_to_four_columns(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand_tabs(input), expected);
    }

    #[rstest]
    #[case("# foo ##\n", "# foo ")]
    #[case("# foo \\#\n", "# foo \\#")]
    #[case("# foo#\n", "# foo")]
    #[case("#\n", "")]
    #[case("# \\\n", "# \\")]
    fn closing_hashes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_closing_hashes(input), expected);
    }

    #[test]
    fn trailing_blank_lines_are_removed() {
        let mut text = String::from("a\n  b\n\n   \n");
        remove_trailing_blank_lines(&mut text);
        assert_eq!(text, "a\n  b\n");

        let mut blank = String::from("\n \n");
        remove_trailing_blank_lines(&mut blank);
        assert_eq!(blank, "");
    }

    #[rstest]
    #[case("- a", 1, 1, ListKind::Bullet)]
    #[case("• a", 3, 1, ListKind::Bullet)]
    #[case("12) a", 3, 3, ListKind::Ordered)]
    #[case("1.\n", 2, 2, ListKind::Ordered)]
    fn list_markers(
        #[case] line: &str,
        #[case] len: usize,
        #[case] width: usize,
        #[case] kind: ListKind,
    ) {
        let (l, w, data) = parse_list_marker(line, 0).unwrap();
        assert_eq!((l, w, data.kind), (len, width, kind));
    }

    #[rstest]
    #[case("-a")]
    #[case("* * *")]
    #[case("99999999999. big")]
    #[case("1: nope")]
    #[case("x. a")]
    fn rejected_list_markers(#[case] line: &str) {
        assert!(parse_list_marker(line, 0).is_none());
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let doc = parse("a\nb\n\nc");
        assert_eq!(tags(&doc, BlockId::ROOT), vec!["Paragraph", "Paragraph"]);
        let first = first_child(&doc, BlockId::ROOT);
        assert_eq!(doc[first].start_line, 1);
        assert_eq!(doc[first].end_line, 2);
    }

    #[test]
    fn lazy_continuation_extends_quoted_paragraph() {
        let doc = parse("> a\nb");
        assert_eq!(tags(&doc, BlockId::ROOT), vec!["BlockQuote"]);
        let quote = first_child(&doc, BlockId::ROOT);
        assert_eq!(tags(&doc, quote), vec!["Paragraph"]);
    }

    #[test]
    fn setext_header_needs_single_line_paragraph() {
        let doc = parse("Title\n===");
        let header = first_child(&doc, BlockId::ROOT);
        assert_eq!(doc[header].tag, BlockTag::SetextHeader { level: 1 });

        let doc = parse("a\nb\n---");
        assert_eq!(tags(&doc, BlockId::ROOT), vec!["Paragraph", "HorizontalRuler"]);
    }

    #[test]
    fn lines_after_headers_and_rules_start_paragraphs() {
        let doc = parse("Title\n===\nnext\n***\nafter");
        assert_eq!(
            tags(&doc, BlockId::ROOT),
            vec!["SetextHeader", "Paragraph", "HorizontalRuler", "Paragraph"]
        );
    }

    #[test]
    fn fenced_code_keeps_info_and_content() {
        let doc = parse("  ```rust \\*x\n  let a;\n    b\n```");
        let code = first_child(&doc, BlockId::ROOT);
        let BlockTag::FencedCode(data) = &doc[code].tag else {
            panic!("expected fenced code, got {:?}", doc[code].tag);
        };
        assert_eq!(data.info, "rust *x");
        assert_eq!(doc[code].raw_text(), "let a;\n  b\n");
    }

    #[test]
    fn short_fence_does_not_close() {
        let doc = parse("````\n```\n````");
        let code = first_child(&doc, BlockId::ROOT);
        assert_eq!(doc[code].raw_text(), "```\n");
        assert_eq!(doc.children(BlockId::ROOT).count(), 1);
    }

    #[test]
    fn indented_code_drops_trailing_blank_lines() {
        let doc = parse("    a\n\n    b\n\n\n");
        let code = first_child(&doc, BlockId::ROOT);
        assert_eq!(doc[code].tag, BlockTag::IndentedCode);
        assert_eq!(doc[code].raw_text(), "a\n\nb\n");
    }

    #[test]
    fn indented_line_after_paragraph_is_continuation() {
        let doc = parse("a\n    b");
        assert_eq!(tags(&doc, BlockId::ROOT), vec!["Paragraph"]);
    }

    #[test]
    fn reference_only_paragraph_is_retagged() {
        let doc = parse("[foo]: /url\n[bar]: /other 'T'\n\n[foo]");
        assert_eq!(
            tags(&doc, BlockId::ROOT),
            vec!["ReferenceDefinition", "Paragraph"]
        );
        assert_eq!(doc.references().len(), 2);
    }

    #[test]
    fn tight_and_loose_lists() {
        let doc = parse("- a\n- b");
        let list = first_child(&doc, BlockId::ROOT);
        assert!(doc[list].list_data().unwrap().tight);

        let doc = parse("- a\n\n- b");
        let list = first_child(&doc, BlockId::ROOT);
        assert!(!doc[list].list_data().unwrap().tight);
    }

    #[test]
    fn changing_bullet_starts_new_list() {
        let doc = parse("- a\n+ b\n1. c\n2) d");
        assert_eq!(
            tags(&doc, BlockId::ROOT),
            vec!["List", "List", "List", "List"]
        );
    }

    #[test]
    fn two_blank_lines_end_nested_lists() {
        let doc = parse("- a\n  - b\n\n\n  c");
        assert_eq!(tags(&doc, BlockId::ROOT), vec!["List", "Paragraph"]);
    }

    #[test]
    fn indentation_reuses_the_scanned_run() {
        let bytes = b"      - a\n";
        let mut indentation = Indentation::default();
        assert_eq!(indentation.first_nonspace(bytes, 0), 6);
        assert_eq!(indentation.run, Some((0, 6)));
        assert_eq!(indentation.first_nonspace(bytes, 2), 6);
        assert_eq!(indentation.first_nonspace(bytes, 6), 6);
        assert_eq!(indentation.run, Some((0, 6)));
        assert_eq!(indentation.first_nonspace(bytes, 8), 9);
        assert_eq!(indentation.run, Some((8, 9)));
    }

    #[test]
    fn deeply_nested_lists_keep_their_depth() {
        let input: String = (0..300)
            .map(|level| format!("{}- a\n", "  ".repeat(level)))
            .collect();
        let doc = parse(&input);

        let mut depth = 0;
        let mut list = doc[BlockId::ROOT].last_child;
        while let Some(id) = list {
            assert_eq!(doc[id].tag.name(), "List");
            depth += 1;
            let item = doc[id].last_child.unwrap();
            list = doc[item].last_child.filter(|&c| doc[c].tag.name() == "List");
        }
        assert_eq!(depth, 300);
    }

    #[test]
    fn rule_inside_item_keeps_list_tight() {
        let doc = parse("- ***\n- b");
        let list = first_child(&doc, BlockId::ROOT);
        assert!(doc[list].list_data().unwrap().tight);
    }

    #[test]
    fn finalize_twice_is_a_no_op() {
        let mut parser = BlockParser::new();
        parser.process_line("[a]: /x").unwrap();
        parser.process_line("para").unwrap();
        let para = parser.current;
        parser.finalize(para, 3);
        let once = parser.document.clone();
        parser.finalize(para, 9);
        assert_eq!(parser.document, once);
        assert_eq!(parser.document[para].raw_text(), "para\n");
    }

    #[test]
    fn text_on_closed_block_is_an_error() {
        let mut parser = BlockParser::new();
        parser.process_line("para").unwrap();
        let para = parser.current;
        parser.finalize(para, 2);
        assert_eq!(
            parser.add_line(para, "more\n", 0),
            Err(ParseError::ClosedContainer {
                tag: "Paragraph",
                line: 1
            })
        );
    }
}
