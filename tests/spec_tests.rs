use marktree::markdown_to_html;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct Example {
    markdown: String,
    html: String,
    example: u32,
    section: String,
}

fn load_examples() -> Vec<Example> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/examples.json");
    let data = fs::read_to_string(path).expect("Failed to read examples.json");
    serde_json::from_str(&data).expect("Failed to parse examples.json")
}

#[test]
fn rendered_examples_match() {
    let examples = load_examples();
    assert!(!examples.is_empty());

    let mut failures = Vec::new();
    for example in &examples {
        let result = markdown_to_html(&example.markdown).expect("parse failed");
        if result != example.html {
            eprintln!("\nExample {} failed ({})", example.example, example.section);
            eprintln!("  Input: {:?}", example.markdown);
            eprintln!("  Expected: {:?}", example.html);
            eprintln!("  Got: {:?}", result);
            failures.push(example.example);
        }
    }

    eprintln!(
        "\n{} of {} examples passed",
        examples.len() - failures.len(),
        examples.len()
    );
    assert_eq!(failures, Vec::<u32>::new());
}
