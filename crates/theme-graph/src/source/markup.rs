//! Helpers over the markup of a tag or output.
//!
//! Only literal strings are recognised. A name computed at render time cannot be
//! resolved statically, so the helpers return `None` rather than guess.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::reference::Range;

static TYPE_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s,])type\s*:\s*('([^']*)'|"([^"]*)")"#).expect("type argument pattern is valid")
});

static ASSET_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"('([^']*)'|"([^"]*)")\s*\|\s*(?:asset_url|asset_img_url)\b"#)
        .expect("asset filter pattern is valid")
});

/// A string literal and the range it spans in the source, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub range: Range,
}

impl StringLiteral {
    fn from_captures(captures: &Captures<'_>, offset: usize) -> Option<Self> {
        let quoted = captures.get(1)?;
        let value = captures.get(2).or_else(|| captures.get(3))?;
        Some(Self {
            value: value.as_str().to_string(),
            range: Range::new(quoted.start(), quoted.end()).offset_by(offset),
        })
    }
}

/// The string literal a markup starts with (`'card'` in `'card', product: p`).
pub fn leading_string(markup: &str, offset: usize) -> Option<StringLiteral> {
    let trimmed = markup.trim_start();
    let start = markup.len() - trimmed.len();

    let quote = trimmed.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let close = trimmed[1..].find(quote)? + 1;

    Some(StringLiteral {
        value: trimmed[1..close].to_string(),
        range: Range::new(start, start + close + 1).offset_by(offset),
    })
}

/// Whether the markup starts with the bare word `word` (`none` in `{% layout none %}`).
pub fn starts_with_word(markup: &str, word: &str) -> bool {
    markup
        .trim_start()
        .strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Literal value of a `type: '...'` named argument.
pub fn type_argument(markup: &str, offset: usize) -> Option<StringLiteral> {
    TYPE_ARGUMENT
        .captures(markup)
        .and_then(|captures| StringLiteral::from_captures(&captures, offset))
}

/// Every literal piped into `asset_url` or `asset_img_url`.
pub fn asset_references(markup: &str, offset: usize) -> Vec<StringLiteral> {
    if !markup.contains("asset_") {
        return Vec::new();
    }
    ASSET_FILTER
        .captures_iter(markup)
        .filter_map(|captures| StringLiteral::from_captures(&captures, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_string() {
        let literal = leading_string("  'card' with product", 10).unwrap();
        assert_eq!(literal.value, "card");
        assert_eq!(literal.range, Range::new(12, 18));

        assert_eq!(leading_string("\"price\"", 0).unwrap().value, "price");
        assert!(leading_string("snippet_name", 0).is_none());
        assert!(leading_string("'unterminated", 0).is_none());
    }

    #[test]
    fn test_type_argument() {
        let markup = "'block', type: \"slide\", id: 'hero'";
        let literal = type_argument(markup, 0).unwrap();
        assert_eq!(literal.value, "slide");
        assert_eq!(&markup[literal.range.start..literal.range.end], "\"slide\"");

        assert!(type_argument("'block', type: block_type, id: 'x'", 0).is_none());
        assert!(type_argument("'block', subtype: 'x'", 0).is_none());
    }

    #[test]
    fn test_asset_references() {
        let markup = "'theme.css' | asset_url | stylesheet_tag";
        let assets = asset_references(markup, 3);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].value, "theme.css");
        assert_eq!(assets[0].range, Range::new(3, 14));

        let img = asset_references("'logo.png' | asset_img_url: '100x'", 0);
        assert_eq!(img[0].value, "logo.png");

        assert!(asset_references("file | asset_url", 0).is_empty());
        assert!(asset_references("'a.js' | file_url", 0).is_empty());
    }

    #[test]
    fn test_starts_with_word() {
        assert!(starts_with_word(" none", "none"));
        assert!(!starts_with_word("none_of_these", "none"));
        assert!(!starts_with_word("'none'", "none"));
    }
}
