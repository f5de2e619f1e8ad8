//! Link reference definitions and label matching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_casefold::UnicodeCaseFold;

/// Labels longer than this never match a definition.
pub const MAX_LABEL_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Label as written in the definition, without brackets.
    pub label: String,
    pub url: String,
    pub title: String,
}

/// Outcome of reading the part of a link after its closing `]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Resolved { url: String, title: String },
    /// Collapsed `[text][]`: the link text doubles as the label.
    SelfReference,
    /// A label was given but nothing is defined under it.
    InvalidReference,
}

/// Definitions keyed by normalized label. The first definition of a
/// label wins; later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMap {
    entries: HashMap<String, Reference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a definition. Returns false when the label is blank, too
    /// long, or already defined.
    pub fn insert(&mut self, label: &str, url: String, title: String) -> bool {
        let Some(key) = normalize_label(label) else {
            return false;
        };
        if key.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        tracing::trace!(label = %key, url = %url, "registered link reference");
        self.entries.insert(
            key,
            Reference {
                label: label.to_string(),
                url,
                title,
            },
        );
        true
    }

    pub fn get(&self, label: &str) -> Option<&Reference> {
        self.entries.get(&normalize_label(label)?)
    }

    pub fn lookup(&self, label: &str) -> LinkTarget {
        match self.get(label) {
            Some(reference) => LinkTarget::Resolved {
                url: reference.url.clone(),
                title: reference.title.clone(),
            },
            None => LinkTarget::InvalidReference,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.entries.values()
    }
}

/// Case-fold a label and collapse its whitespace runs to single spaces.
/// `None` for labels over [`MAX_LABEL_LENGTH`] characters.
pub fn normalize_label(label: &str) -> Option<String> {
    // A char is at most four bytes, so this only ever walks a bounded prefix.
    if label.len() > 4 * MAX_LABEL_LENGTH || label.chars().nth(MAX_LABEL_LENGTH).is_some() {
        return None;
    }
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(collapsed.chars().case_fold().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Foo  Bar", "foo bar")]
    #[case("  foo\n bar ", "foo bar")]
    #[case("ẞ", "ss")]
    #[case("ΑΓΩ", "αγω")]
    fn normalizes_labels(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_label(input).as_deref(), Some(expected));
    }

    #[test]
    fn first_definition_wins() {
        let mut map = ReferenceMap::new();
        assert!(map.insert("foo", "/first".into(), String::new()));
        assert!(!map.insert("FOO", "/second".into(), String::new()));
        assert_eq!(map.get("Foo").map(|r| r.url.as_str()), Some("/first"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn blank_labels_are_rejected() {
        let mut map = ReferenceMap::new();
        assert!(!map.insert(" \n ", "/url".into(), String::new()));
        assert!(map.is_empty());
    }

    #[test]
    fn overlong_labels_never_resolve() {
        let long = "a".repeat(MAX_LABEL_LENGTH + 1);
        let mut map = ReferenceMap::new();
        assert!(!map.insert(&long, "/url".into(), String::new()));
        assert_eq!(map.lookup(&long), LinkTarget::InvalidReference);
    }

    #[test]
    fn label_length_counts_characters() {
        let wide = "é".repeat(MAX_LABEL_LENGTH);
        assert_eq!(normalize_label(&wide), Some(wide.clone()));
        assert_eq!(normalize_label(&(wide + "é")), None);
        assert_eq!(normalize_label(&"a".repeat(8 * MAX_LABEL_LENGTH)), None);
    }

    #[test]
    fn lookup_resolves_collapsed_whitespace() {
        let mut map = ReferenceMap::new();
        map.insert("foo bar", "/url".into(), "t".into());
        assert_eq!(
            map.lookup("Foo  Bar"),
            LinkTarget::Resolved {
                url: "/url".into(),
                title: "t".into()
            }
        );
    }
}
