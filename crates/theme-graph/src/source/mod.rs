//! Source model consumed by the traverser.
//!
//! A [`SourceCode`] pairs the text of a file with its syntax tree, or with the
//! [`ParseError`] that prevented building one. Parse failures are data, not errors:
//! a theme being edited is expected to be broken some of the time.

pub mod liquid;
pub mod markup;

use thiserror::Error;

use crate::uri::Uri;

pub use liquid::{HtmlElement, LiquidDocument, LiquidOutput, LiquidTag, RawBlock, parse_liquid};

/// Why a file could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {offset})")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Syntax tree of a file, by file type.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceAst {
    Liquid(LiquidDocument),
    Json(serde_json::Value),
    /// JavaScript and CSS are not parsed.
    Asset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceCode {
    pub uri: Uri,
    pub text: String,
    pub ast: Result<SourceAst, ParseError>,
}

impl SourceCode {
    pub fn liquid(&self) -> Option<&LiquidDocument> {
        match &self.ast {
            Ok(SourceAst::Liquid(document)) => Some(document),
            Ok(SourceAst::Json(_)) | Ok(SourceAst::Asset) | Err(_) => None,
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.ast {
            Ok(SourceAst::Json(value)) => Some(value),
            Ok(SourceAst::Liquid(_)) | Ok(SourceAst::Asset) | Err(_) => None,
        }
    }
}

/// Parse `text` according to the extension of `uri`.
pub fn parse_source(uri: Uri, text: String) -> SourceCode {
    let ast = match uri.extension() {
        Some("liquid") => parse_liquid(&text).map(SourceAst::Liquid),
        Some("json") => parse_json(&text).map(SourceAst::Json),
        _ => Ok(SourceAst::Asset),
    };
    SourceCode { uri, text, ast }
}

/// Parse a theme JSON file, which may open with a `/* ... */` banner comment.
pub fn parse_json(text: &str) -> Result<serde_json::Value, ParseError> {
    let text = blank_leading_comment(text)?;
    serde_json::from_str(&text).map_err(|e| {
        ParseError::new(offset_of(&text, e.line(), e.column()), e.to_string())
    })
}

/// Replace a leading block comment with spaces so offsets stay valid.
fn blank_leading_comment(text: &str) -> Result<std::borrow::Cow<'_, str>, ParseError> {
    let start = text.len() - text.trim_start().len();
    if !text[start..].starts_with("/*") {
        return Ok(std::borrow::Cow::Borrowed(text));
    }
    let end = text[start + 2..]
        .find("*/")
        .map(|found| start + 2 + found + 2)
        .ok_or_else(|| ParseError::new(start, "unterminated comment"))?;

    let mut blanked = String::with_capacity(text.len());
    blanked.push_str(&text[..start]);
    blanked.push_str(&" ".repeat(end - start));
    blanked.push_str(&text[end..]);
    Ok(std::borrow::Cow::Owned(blanked))
}

/// Byte offset of a 1-based line and column.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}
