use marktree::ast::{BlockContent, ListKind};
use marktree::{BlockId, BlockTag, Document, Inline, Parser, ParserSettings, parse_document};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn text(s: &str) -> Inline {
    Inline::Text(s.to_string())
}

fn top_level(doc: &Document) -> Vec<BlockId> {
    doc.children(BlockId::ROOT).map(|(id, _)| id).collect()
}

fn only_paragraph(doc: &Document) -> &[Inline] {
    let blocks = top_level(doc);
    assert_eq!(blocks.len(), 1, "expected a single block");
    assert_eq!(doc[blocks[0]].tag, BlockTag::Paragraph);
    doc[blocks[0]].inlines()
}

#[rstest]
#[case("- a\n- b\n- c", true)]
#[case("- a\n\n- b\n- c", false)]
#[case("- a\n- b\n\n- c", false)]
#[case("- a\n\n  b", false)]
#[case("- a\n  - b\n\n  c", false)]
#[case("* a\n\n\n", true)]
fn list_tightness(#[case] input: &str, #[case] tight: bool) {
    let doc = parse_document(input).unwrap();
    let list = top_level(&doc)[0];
    assert_eq!(doc[list].list_data().unwrap().tight, tight);
}

#[rstest]
#[case("***a***", vec![Inline::Emphasis(vec![Inline::Strong(vec![text("a")])])])]
#[case("***a****", vec![Inline::Strong(vec![Inline::Emphasis(vec![text("a")])]), text("*")])]
#[case("*a**", vec![Inline::Emphasis(vec![text("a")]), text("*")])]
#[case("**a*", vec![text("*"), Inline::Emphasis(vec![text("a")])])]
fn delimiter_lengths(#[case] input: &str, #[case] expected: Vec<Inline>) {
    let doc = parse_document(input).unwrap();
    assert_eq!(only_paragraph(&doc), expected.as_slice());
}

#[test]
fn labels_match_case_and_whitespace_insensitively() {
    let doc = parse_document("[Foo  Bar] [foo bar]\n\n[FOO bar]: /u").unwrap();
    let link = |label: &str| Inline::Link {
        url: "/u".into(),
        title: String::new(),
        children: vec![text(label)],
    };
    let blocks = top_level(&doc);
    assert_eq!(doc[blocks[1]].tag, BlockTag::ReferenceDefinition);
    let para = blocks[0];
    assert_eq!(
        doc[para].inlines(),
        &[link("Foo  Bar"), text(" "), link("foo bar")]
    );
}

#[test]
fn links_never_nest() {
    fn contains_link(inlines: &[Inline]) -> bool {
        inlines.iter().any(|inline| match inline {
            Inline::Link { .. } => true,
            Inline::Emphasis(c) | Inline::Strong(c) | Inline::Strikethrough(c) => contains_link(c),
            Inline::Image { children, .. } => contains_link(children),
            _ => false,
        })
    }

    let doc = parse_document("[a [b](/x) c](/y)").unwrap();
    let inlines = only_paragraph(&doc);
    for inline in inlines {
        if let Inline::Link { children, .. } = inline {
            assert!(!contains_link(children));
        }
    }
    assert_eq!(inlines.first(), Some(&text("[a ")));
}

#[test]
fn empty_ordered_items() {
    let doc = parse_document("1.\n2.").unwrap();
    let list = top_level(&doc)[0];
    let data = doc[list].list_data().unwrap();
    assert_eq!(data.kind, ListKind::Ordered);
    assert!(data.tight);
    let items: Vec<_> = doc.children(list).collect();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|(_, item)| item.first_child.is_none()));
}

#[test]
fn unicode_bullet_list() {
    let doc = parse_document("• foo\n• bar").unwrap();
    let list = top_level(&doc)[0];
    let data = doc[list].list_data().unwrap();
    assert_eq!(data.bullet_char, Some('•'));
    assert!(data.tight);

    let items: Vec<String> = doc
        .children(list)
        .map(|(item, _)| {
            let (_, para) = doc.children(item).next().unwrap();
            Inline::plain_text(para.inlines())
        })
        .collect();
    assert_eq!(items, vec!["foo", "bar"]);
}

#[test]
fn escaped_bullets_stay_paragraphs() {
    let doc = parse_document("\\• foo\n\n\\* bar").unwrap();
    let texts: Vec<&[Inline]> = top_level(&doc)
        .into_iter()
        .map(|id| doc[id].inlines())
        .collect();
    assert_eq!(texts, vec![&[text("• foo")][..], &[text("* bar")][..]]);
}

#[test]
fn definition_only_paragraph_disappears() {
    let doc = parse_document("[label]\n\n[label]: /url \"title\"\n").unwrap();
    let blocks = top_level(&doc);
    assert_eq!(doc[blocks[1]].tag, BlockTag::ReferenceDefinition);
    assert_eq!(
        doc[blocks[0]].inlines(),
        &[Inline::Link {
            url: "/url".into(),
            title: "title".into(),
            children: vec![text("label")],
        }]
    );
    let reference = doc.references().get("LABEL").unwrap();
    assert_eq!(reference.url, "/url");
}

#[rstest]
#[case("```\ncode\n````", "code\n", 1)]
#[case("```\ncode\n``\nmore", "code\n``\nmore\n", 1)]
fn fence_closing_length(#[case] input: &str, #[case] code: &str, #[case] blocks: usize) {
    let doc = parse_document(input).unwrap();
    let top = top_level(&doc);
    assert_eq!(top.len(), blocks);
    assert_eq!(doc[top[0]].content, BlockContent::Raw(code.to_string()));
}

#[test]
fn block_positions_are_recorded() {
    let doc = parse_document("para\n\n> quote\n> more\n").unwrap();
    let top = top_level(&doc);
    let quote = &doc[top[1]];
    assert_eq!((quote.start_line, quote.start_column), (3, 1));
    assert_eq!(quote.end_line, 4);
}

#[test]
fn strikethrough_only_when_enabled() {
    let input = "~~a~~";
    let plain = parse_document(input).unwrap();
    assert_eq!(only_paragraph(&plain), &[text("~~a~~")]);

    let parser = Parser::with_settings(ParserSettings::new().strikethrough_tilde(true));
    let doc = parser.parse(input).unwrap();
    assert_eq!(
        only_paragraph(&doc),
        &[Inline::Strikethrough(vec![text("a")])]
    );
}

#[test]
fn arbitrary_input_never_fails() {
    let inputs = [
        "[[[[]]]]](((",
        "*_*_*_**__~~``",
        "> - > - 1. > ```\n\n\n  x",
        "<!-- <a href=\"",
        "&#99999999; &#x; &",
        "\t-\t*\t+\n\t\t1)",
        "[x]: <\n[y]:",
    ];
    for input in inputs {
        assert!(parse_document(input).is_ok(), "failed on {input:?}");
    }
}
