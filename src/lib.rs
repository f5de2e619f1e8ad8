//! A CommonMark parser that builds a block tree with resolved inline content.
pub mod ast;
mod block;
mod delimiter;
mod entity;
pub mod error;
mod inline;
pub mod parser;
pub mod reference;
pub mod renderer;
mod scanners;
pub mod settings;

pub use ast::{Block, BlockId, BlockTag, Document, Inline};
pub use error::{ParseError, SettingsError};
pub use parser::Parser;
pub use renderer::HtmlRenderer;
pub use settings::ParserSettings;

/// Parse markdown text with default settings.
pub fn parse_document(markdown: &str) -> Result<Document, ParseError> {
    Parser::new().parse(markdown)
}

/// Parse markdown text and render to HTML
pub fn markdown_to_html(markdown: &str) -> Result<String, ParseError> {
    let document = parse_document(markdown)?;
    Ok(HtmlRenderer::new().render(&document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html("").unwrap(), "");
    }

    #[test]
    fn test_basic_image() {
        let result = markdown_to_html("![foo](/url \"title\")\n").unwrap();
        assert_eq!(
            result,
            "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n"
        );
    }

    #[test]
    fn test_image_without_title() {
        let result = markdown_to_html("![bar](/path)\n").unwrap();
        assert_eq!(result, "<p><img src=\"/path\" alt=\"bar\" /></p>\n");
    }

    #[test]
    fn test_multi_codepoint_entities() {
        assert_eq!(
            markdown_to_html("&ngE; &nGt;").unwrap(),
            "<p>\u{2267}\u{338} \u{226B}\u{20D2}</p>\n"
        );
    }

    #[test]
    fn test_undefined_collapsed_reference() {
        assert_eq!(
            markdown_to_html("[missing][]").unwrap(),
            "<p>[missing][]</p>\n"
        );
    }

    #[test]
    fn test_document_serializes_to_json() {
        let document = parse_document("# hi").unwrap();
        let json = serde_json::to_string(&document).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document);
    }
}
