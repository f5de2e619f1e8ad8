//! HTML renderer for parsed documents.

use crate::ast::{BlockId, BlockTag, Document, Inline, ListKind};

pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    pub fn render(&self, document: &Document) -> String {
        let mut out = Output::default();
        out.children(document, BlockId::ROOT, false);
        out.html
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Output {
    html: String,
}

impl Output {
    /// Start a new line unless already at the start of one.
    fn cr(&mut self) {
        if !self.html.is_empty() && !self.html.ends_with('\n') {
            self.html.push('\n');
        }
    }

    fn children(&mut self, document: &Document, id: BlockId, tight: bool) {
        for (child, _) in document.children(id) {
            self.block(document, child, tight);
        }
    }

    fn block(&mut self, document: &Document, id: BlockId, tight: bool) {
        let block = &document[id];
        match &block.tag {
            BlockTag::Document => self.children(document, id, false),
            BlockTag::BlockQuote => {
                self.cr();
                self.html.push_str("<blockquote>\n");
                self.children(document, id, false);
                self.cr();
                self.html.push_str("</blockquote>\n");
            }
            BlockTag::List(data) => {
                self.cr();
                match data.kind {
                    ListKind::Bullet => self.html.push_str("<ul>\n"),
                    ListKind::Ordered if data.start == 1 => self.html.push_str("<ol>\n"),
                    ListKind::Ordered => {
                        self.html.push_str(&format!("<ol start=\"{}\">\n", data.start))
                    }
                }
                self.children(document, id, data.tight);
                self.cr();
                self.html.push_str(match data.kind {
                    ListKind::Bullet => "</ul>\n",
                    ListKind::Ordered => "</ol>\n",
                });
            }
            BlockTag::ListItem(_) => {
                self.cr();
                self.html.push_str("<li>");
                self.children(document, id, tight);
                self.html.push_str("</li>\n");
            }
            // Paragraphs in tight lists render bare.
            BlockTag::Paragraph if tight => self.inlines(block.inlines()),
            BlockTag::Paragraph => {
                self.cr();
                self.html.push_str("<p>");
                self.inlines(block.inlines());
                self.html.push_str("</p>\n");
            }
            BlockTag::AtxHeader { level } | BlockTag::SetextHeader { level } => {
                self.cr();
                self.html.push_str(&format!("<h{level}>"));
                self.inlines(block.inlines());
                self.html.push_str(&format!("</h{level}>\n"));
            }
            BlockTag::IndentedCode => self.code_block("", block.raw_text()),
            BlockTag::FencedCode(data) => self.code_block(&data.info, block.raw_text()),
            BlockTag::HtmlBlock => {
                self.cr();
                self.html.push_str(block.raw_text());
            }
            BlockTag::HorizontalRuler => {
                self.cr();
                self.html.push_str("<hr />\n");
            }
            BlockTag::ReferenceDefinition => {}
        }
    }

    fn code_block(&mut self, info: &str, code: &str) {
        self.cr();
        match info.split_whitespace().next() {
            Some(language) => {
                self.html.push_str("<pre><code class=\"language-");
                escape_html(&mut self.html, language);
                self.html.push_str("\">");
            }
            None => self.html.push_str("<pre><code>"),
        }
        escape_html(&mut self.html, code);
        self.html.push_str("</code></pre>\n");
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => escape_html(&mut self.html, text),
            Inline::LineBreak => self.html.push_str("<br />\n"),
            Inline::SoftBreak => self.html.push('\n'),
            Inline::Code(code) => {
                self.html.push_str("<code>");
                escape_html(&mut self.html, code);
                self.html.push_str("</code>");
            }
            Inline::RawHtml(html) => self.html.push_str(html),
            Inline::Emphasis(children) => self.wrap("em", children),
            Inline::Strong(children) => self.wrap("strong", children),
            Inline::Strikethrough(children) => self.wrap("del", children),
            Inline::Link {
                url,
                title,
                children,
            } => {
                self.html.push_str("<a href=\"");
                escape_href(&mut self.html, url);
                self.html.push('"');
                self.title(title);
                self.html.push('>');
                self.inlines(children);
                self.html.push_str("</a>");
            }
            Inline::Image {
                url,
                title,
                children,
            } => {
                self.html.push_str("<img src=\"");
                escape_href(&mut self.html, url);
                self.html.push_str("\" alt=\"");
                escape_html(&mut self.html, &Inline::plain_text(children));
                self.html.push('"');
                self.title(title);
                self.html.push_str(" />");
            }
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        self.html.push_str(&format!("<{tag}>"));
        self.inlines(children);
        self.html.push_str(&format!("</{tag}>"));
    }

    fn title(&mut self, title: &str) {
        if !title.is_empty() {
            self.html.push_str(" title=\"");
            escape_html(&mut self.html, title);
            self.html.push('"');
        }
    }
}

fn escape_html(out: &mut String, text: &str) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

/// Percent-encode a URL for an attribute, leaving characters that are
/// already safe in URLs alone.
fn escape_href(out: &mut String, url: &str) {
    for c in url.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#x27;"),
            c if c.is_ascii_alphanumeric() || "-_.!~*()+,/:;=?@#$%".contains(c) => out.push(c),
            _ => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
}
