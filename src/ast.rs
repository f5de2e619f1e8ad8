//! Document tree types: an arena of blocks whose leaves carry inline content.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceMap;

/// Index of a block inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(usize);

impl BlockId {
    /// The document root. Every block of a document can reach it through
    /// `parent` links.
    pub const ROOT: BlockId = BlockId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListDelimiter {
    Period,
    Parenthesis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListData {
    pub kind: ListKind,
    /// Marker character for bullet lists (`*`, `-`, `+` or `•`).
    pub bullet_char: Option<char>,
    pub start: u32,
    pub delimiter: ListDelimiter,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Columns from the marker start to the item content.
    pub padding: usize,
    /// Only meaningful once the list is finalized.
    pub tight: bool,
}

impl ListData {
    /// Whether an item with these markers may continue a list started with `self`.
    pub fn matches(&self, item: &ListData) -> bool {
        self.kind == item.kind
            && self.delimiter == item.delimiter
            && self.bullet_char == item.bullet_char
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FencedCodeData {
    pub fence_char: char,
    pub fence_length: usize,
    /// Indentation of the opening fence; stripped from content lines.
    pub fence_offset: usize,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockTag {
    Document,
    BlockQuote,
    List(ListData),
    ListItem(ListData),
    Paragraph,
    AtxHeader { level: u8 },
    SetextHeader { level: u8 },
    IndentedCode,
    FencedCode(FencedCodeData),
    HtmlBlock,
    HorizontalRuler,
    /// A paragraph that turned out to hold only reference definitions.
    ReferenceDefinition,
}

impl BlockTag {
    pub fn name(&self) -> &'static str {
        match self {
            BlockTag::Document => "Document",
            BlockTag::BlockQuote => "BlockQuote",
            BlockTag::List(_) => "List",
            BlockTag::ListItem(_) => "ListItem",
            BlockTag::Paragraph => "Paragraph",
            BlockTag::AtxHeader { .. } => "AtxHeader",
            BlockTag::SetextHeader { .. } => "SetextHeader",
            BlockTag::IndentedCode => "IndentedCode",
            BlockTag::FencedCode(_) => "FencedCode",
            BlockTag::HtmlBlock => "HtmlBlock",
            BlockTag::HorizontalRuler => "HorizontalRuler",
            BlockTag::ReferenceDefinition => "ReferenceDefinition",
        }
    }

    /// Container blocks hold other blocks.
    pub fn can_contain(&self, child: &BlockTag) -> bool {
        match self {
            BlockTag::Document | BlockTag::BlockQuote | BlockTag::ListItem(_) => true,
            BlockTag::List(_) => matches!(child, BlockTag::ListItem(_)),
            _ => false,
        }
    }

    /// Leaf blocks that take the rest of a line as text.
    pub fn accepts_lines(&self) -> bool {
        matches!(
            self,
            BlockTag::Paragraph
                | BlockTag::AtxHeader { .. }
                | BlockTag::IndentedCode
                | BlockTag::FencedCode(_)
        )
    }

    pub fn header_level(&self) -> Option<u8> {
        match self {
            BlockTag::AtxHeader { level } | BlockTag::SetextHeader { level } => Some(*level),
            _ => None,
        }
    }
}

/// Text of a leaf block. Raw text during the block pass; paragraphs and
/// headers are switched to inlines by the inline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockContent {
    Raw(String),
    Inlines(Vec<Inline>),
}

impl BlockContent {
    pub fn raw(&self) -> Option<&str> {
        match self {
            BlockContent::Raw(text) => Some(text),
            BlockContent::Inlines(_) => None,
        }
    }

    pub fn inlines(&self) -> Option<&[Inline]> {
        match self {
            BlockContent::Inlines(inlines) => Some(inlines),
            BlockContent::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub tag: BlockTag,
    pub open: bool,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub content: BlockContent,
    pub last_line_blank: bool,
    pub parent: Option<BlockId>,
    pub first_child: Option<BlockId>,
    pub last_child: Option<BlockId>,
    pub previous: Option<BlockId>,
    pub next: Option<BlockId>,
}

impl Block {
    fn new(tag: BlockTag, start_line: usize, start_column: usize) -> Self {
        Block {
            tag,
            open: true,
            start_line,
            start_column,
            end_line: start_line,
            content: BlockContent::Raw(String::new()),
            last_line_blank: false,
            parent: None,
            first_child: None,
            last_child: None,
            previous: None,
            next: None,
        }
    }

    pub fn raw_text(&self) -> &str {
        self.content.raw().unwrap_or_default()
    }

    pub fn inlines(&self) -> &[Inline] {
        self.content.inlines().unwrap_or_default()
    }

    pub fn list_data(&self) -> Option<&ListData> {
        match &self.tag {
            BlockTag::List(data) | BlockTag::ListItem(data) => Some(data),
            _ => None,
        }
    }
}

/// A parsed document: the block arena plus the reference table it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) references: ReferenceMap,
}

impl Document {
    pub(crate) fn new() -> Self {
        Document {
            blocks: vec![Block::new(BlockTag::Document, 1, 1)],
            references: ReferenceMap::new(),
        }
    }

    pub fn root(&self) -> &Block {
        &self.blocks[BlockId::ROOT.0]
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }

    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().first_child.is_none()
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: BlockId) -> Children<'_> {
        Children {
            document: self,
            next: self[id].first_child,
        }
    }

    /// Append a new open block as the last child of `parent`.
    pub(crate) fn append_child(
        &mut self,
        parent: BlockId,
        tag: BlockTag,
        line: usize,
        column: usize,
    ) -> BlockId {
        let id = BlockId(self.blocks.len());
        let mut block = Block::new(tag, line, column);
        block.parent = Some(parent);
        block.previous = self[parent].last_child;
        self.blocks.push(block);

        match self[parent].last_child {
            Some(last) => self.get_mut(last).next = Some(id),
            None => self.get_mut(parent).first_child = Some(id),
        }
        self.get_mut(parent).last_child = Some(id);
        id
    }
}

impl Index<BlockId> for Document {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }
}

pub struct Children<'a> {
    document: &'a Document,
    next: Option<BlockId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let block = &self.document[id];
        self.next = block.next;
        Some((id, block))
    }
}

/// Inline content of a paragraph or header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    LineBreak,
    SoftBreak,
    Code(String),
    RawHtml(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link {
        url: String,
        title: String,
        children: Vec<Inline>,
    },
    Image {
        url: String,
        title: String,
        children: Vec<Inline>,
    },
}

impl Inline {
    /// Concatenated literal text, as used for image alt text.
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) | Inline::Code(text) | Inline::RawHtml(text) => {
                    out.push_str(text)
                }
                Inline::LineBreak | Inline::SoftBreak => out.push('\n'),
                Inline::Emphasis(children)
                | Inline::Strong(children)
                | Inline::Strikethrough(children)
                | Inline::Link { children, .. }
                | Inline::Image { children, .. } => out.push_str(&Inline::plain_text(children)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_links_siblings() {
        let mut doc = Document::new();
        let a = doc.append_child(BlockId::ROOT, BlockTag::Paragraph, 1, 1);
        let b = doc.append_child(BlockId::ROOT, BlockTag::HorizontalRuler, 2, 1);

        assert_eq!(doc.root().first_child, Some(a));
        assert_eq!(doc.root().last_child, Some(b));
        assert_eq!(doc[a].next, Some(b));
        assert_eq!(doc[b].previous, Some(a));
        assert_eq!(doc[b].parent, Some(BlockId::ROOT));

        let ids: Vec<BlockId> = doc.children(BlockId::ROOT).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn list_only_contains_items() {
        let data = ListData {
            kind: ListKind::Bullet,
            bullet_char: Some('-'),
            start: 1,
            delimiter: ListDelimiter::Period,
            marker_offset: 0,
            padding: 2,
            tight: false,
        };
        let list = BlockTag::List(data.clone());
        assert!(list.can_contain(&BlockTag::ListItem(data)));
        assert!(!list.can_contain(&BlockTag::Paragraph));
        assert!(BlockTag::BlockQuote.can_contain(&BlockTag::Paragraph));
        assert!(!BlockTag::Paragraph.can_contain(&BlockTag::Paragraph));
    }

    #[test]
    fn plain_text_flattens_nested_inlines() {
        let inlines = vec![
            Inline::Text("a ".into()),
            Inline::Emphasis(vec![Inline::Text("b".into())]),
            Inline::Code("c".into()),
        ];
        assert_eq!(Inline::plain_text(&inlines), "a bc");
    }
}
