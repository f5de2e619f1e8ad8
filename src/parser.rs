//! Markdown parser entry point.

use crate::ast::Document;
use crate::block::BlockParser;
use crate::error::Result;
use crate::inline::DispatchTable;
use crate::settings::ParserSettings;

/// Parses markdown text into a [`Document`].
///
/// Settings are fixed at construction; one parser can be reused for any
/// number of documents.
#[derive(Debug, Clone)]
pub struct Parser {
    settings: ParserSettings,
    dispatch: DispatchTable,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_settings(ParserSettings::default())
    }

    pub fn with_settings(settings: ParserSettings) -> Self {
        let dispatch = DispatchTable::new(&settings);
        Parser { settings, dispatch }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parse a whole document. Lines may end in `\n` or `\r\n`.
    ///
    /// Any input produces a document; an error means the block engine hit
    /// an internal inconsistency.
    pub fn parse(&self, input: &str) -> Result<Document> {
        let mut blocks = BlockParser::new();
        let mut lines = 0;
        for line in input.lines() {
            blocks.process_line(line)?;
            lines += 1;
        }
        let document = blocks.finish(&self.dispatch)?;
        tracing::debug!(
            lines,
            blocks = document.len(),
            references = document.references().len(),
            "parsed document"
        );
        Ok(document)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BlockId, BlockTag, Inline};

    #[test]
    fn crlf_lines_parse_like_lf() {
        let parser = Parser::new();
        let lf = parser.parse("# a\nb\n").unwrap();
        let crlf = parser.parse("# a\r\nb\r\n").unwrap();
        assert_eq!(lf, crlf);
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = Parser::new().parse("").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.root().tag, BlockTag::Document);
        assert!(!doc.root().open);
    }

    #[test]
    fn settings_select_inline_handlers() {
        let plain = Parser::new();
        let tilde = Parser::with_settings(ParserSettings::new().strikethrough_tilde(true));
        assert!(tilde.settings().strikethrough_tilde);

        let first_inline = |parser: &Parser| {
            let doc = parser.parse("~~x~~").unwrap();
            let para = doc.root().first_child.unwrap();
            doc[para].inlines()[0].clone()
        };
        assert_eq!(first_inline(&plain), Inline::Text("~~x~~".into()));
        assert_eq!(
            first_inline(&tilde),
            Inline::Strikethrough(vec![Inline::Text("x".into())])
        );
    }

    #[test]
    fn forward_references_resolve() {
        let doc = Parser::new().parse("[foo]\n\n[foo]: /url").unwrap();
        let para = doc.children(BlockId::ROOT).next().unwrap().1;
        assert_eq!(
            para.inlines(),
            &[Inline::Link {
                url: "/url".into(),
                title: String::new(),
                children: vec![Inline::Text("foo".into())],
            }]
        );
    }
}
