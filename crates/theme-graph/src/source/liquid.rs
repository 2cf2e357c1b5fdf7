//! Liquid scanner.
//!
//! This is not a Liquid parser. It locates the delimiters the graph cares about
//! (`{% %}`, `{{ }}`, opening HTML tags and the `{% schema %}` body) and records
//! their byte ranges, which is all reference extraction needs.

use std::sync::LazyLock;

use memchr::{memchr, memchr2, memmem};
use regex::Regex;

use super::ParseError;
use crate::reference::Range;

/// Closing tags of the blocks whose body is not scanned.
static END_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*end(raw|comment|schema|javascript|stylesheet)\s*-?%\}")
        .expect("end tag pattern is valid")
});

/// A `{% name markup %}` tag, or one line of a `{% liquid %}` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidTag {
    pub name: String,
    pub markup: String,
    /// Byte offset of `markup` in the source.
    pub markup_offset: usize,
    pub range: Range,
}

/// A `{{ markup }}` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidOutput {
    pub markup: String,
    pub markup_offset: usize,
    pub range: Range,
}

/// An opening HTML tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    pub name: String,
    pub name_range: Range,
}

impl HtmlElement {
    /// Custom elements must contain a hyphen.
    pub fn is_custom_element(&self) -> bool {
        self.name.contains('-')
    }
}

/// Body of a block whose contents are not Liquid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub body: String,
    pub offset: usize,
}

/// Everything the scanner found in one Liquid file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiquidDocument {
    pub tags: Vec<LiquidTag>,
    pub outputs: Vec<LiquidOutput>,
    pub elements: Vec<HtmlElement>,
    pub schema: Option<RawBlock>,
}

impl LiquidDocument {
    /// Tags with the given name.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LiquidTag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    /// `(markup, markup_offset)` of every tag and output.
    pub fn markups(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tags
            .iter()
            .map(|tag| (tag.markup.as_str(), tag.markup_offset))
            .chain(
                self.outputs
                    .iter()
                    .map(|output| (output.markup.as_str(), output.markup_offset)),
            )
    }
}

/// Scan a Liquid source file.
pub fn parse_liquid(text: &str) -> Result<LiquidDocument, ParseError> {
    Scanner::new(text).run()
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    document: LiquidDocument,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            document: LiquidDocument::default(),
        }
    }

    fn run(mut self) -> Result<LiquidDocument, ParseError> {
        while let Some(found) = memchr2(b'{', b'<', &self.bytes[self.pos..]) {
            let start = self.pos + found;
            match (self.bytes[start], self.bytes.get(start + 1).copied()) {
                (b'{', Some(b'%')) => self.tag(start)?,
                (b'{', Some(b'{')) => self.output(start)?,
                (b'<', Some(b'!')) => self.html_comment(start),
                (b'<', Some(next)) if next.is_ascii_alphabetic() => self.element(start),
                _ => self.pos = start + 1,
            }
        }
        Ok(self.document)
    }

    fn closing(&self, start: usize, delimiter: &[u8], what: &str) -> Result<usize, ParseError> {
        memmem::find(&self.bytes[start + 2..], delimiter)
            .map(|found| start + 2 + found)
            .ok_or_else(|| ParseError::new(start, format!("unterminated {what}")))
    }

    fn tag(&mut self, start: usize) -> Result<(), ParseError> {
        let close = self.closing(start, b"%}", "tag")?;
        let end = close + 2;
        self.pos = end;

        let (inner_start, inner_end) = trim_delimited(self.bytes, start + 2, close);
        let Some((name, markup_start)) = split_name(self.bytes, inner_start, inner_end) else {
            return Ok(());
        };

        match name {
            "liquid" => {
                self.liquid_lines(markup_start, inner_end);
                Ok(())
            }
            "raw" | "comment" | "javascript" | "stylesheet" => {
                self.skip_body(start, end, name)?;
                Ok(())
            }
            "schema" => {
                let body_end = self.skip_body(start, end, name)?;
                self.document.schema = Some(RawBlock {
                    body: self.text[end..body_end].to_string(),
                    offset: end,
                });
                Ok(())
            }
            _ => {
                self.push_tag(name, markup_start, inner_end, Range::new(start, end));
                Ok(())
            }
        }
    }

    /// Jump past the matching end tag. Returns the offset where the body ends.
    fn skip_body(&mut self, start: usize, body_start: usize, name: &str) -> Result<usize, ParseError> {
        let closing = END_TAG
            .captures_iter(&self.text[body_start..])
            .find(|captures| captures.get(1).is_some_and(|m| m.as_str() == name))
            .and_then(|captures| captures.get(0));

        match closing {
            Some(m) => {
                self.pos = body_start + m.end();
                Ok(body_start + m.start())
            }
            None => Err(ParseError::new(start, format!("unterminated {{% {name} %}} block"))),
        }
    }

    /// Expand each line of a `{% liquid %}` tag into a tag of its own.
    fn liquid_lines(&mut self, start: usize, end: usize) {
        let mut line_start = start;
        let mut in_comment = false;

        while line_start < end {
            let line_end = memchr(b'\n', &self.bytes[line_start..end])
                .map(|found| line_start + found)
                .unwrap_or(end);
            let (s, e) = trim_whitespace(self.bytes, line_start, line_end);
            line_start = line_end + 1;

            let Some((name, markup_start)) = split_name(self.bytes, s, e) else {
                continue;
            };
            match (in_comment, name) {
                (true, "endcomment") => in_comment = false,
                (true, _) => {}
                (false, "comment") => in_comment = true,
                (false, _) => self.push_tag(name, markup_start, e, Range::new(s, e)),
            }
        }
    }

    fn push_tag(&mut self, name: &str, markup_start: usize, markup_end: usize, range: Range) {
        self.document.tags.push(LiquidTag {
            name: name.to_string(),
            markup: self.text[markup_start..markup_end].to_string(),
            markup_offset: markup_start,
            range,
        });
    }

    fn output(&mut self, start: usize) -> Result<(), ParseError> {
        let close = self.closing(start, b"}}", "output")?;
        let end = close + 2;
        self.pos = end;

        let (s, e) = trim_delimited(self.bytes, start + 2, close);
        self.document.outputs.push(LiquidOutput {
            markup: self.text[s..e].to_string(),
            markup_offset: s,
            range: Range::new(start, end),
        });
        Ok(())
    }

    fn html_comment(&mut self, start: usize) {
        if !self.bytes[start..].starts_with(b"<!--") {
            self.pos = start + 1;
            return;
        }
        self.pos = memmem::find(&self.bytes[start + 4..], b"-->")
            .map(|found| start + 4 + found + 3)
            .unwrap_or(self.bytes.len());
    }

    fn element(&mut self, start: usize) {
        let name_start = start + 1;
        let name_end = self.bytes[name_start..]
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':')))
            .map(|len| name_start + len)
            .unwrap_or(self.bytes.len());

        self.document.elements.push(HtmlElement {
            name: self.text[name_start..name_end].to_ascii_lowercase(),
            name_range: Range::new(name_start, name_end),
        });
        self.pos = name_end;
    }
}

/// Strip whitespace-control dashes and surrounding whitespace from a delimited region.
fn trim_delimited(bytes: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    if start < end && bytes[start] == b'-' {
        start += 1;
    }
    if end > start && bytes[end - 1] == b'-' {
        end -= 1;
    }
    trim_whitespace(bytes, start, end)
}

fn trim_whitespace(bytes: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    (start, end)
}

/// Split `name markup` into the tag name and the offset where the markup starts.
///
/// Returns `None` for empty tags and `#` inline comments.
fn split_name(bytes: &[u8], start: usize, end: usize) -> Option<(&str, usize)> {
    let name_end = bytes[start..end]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .map(|len| start + len)
        .unwrap_or(end);
    if name_end == start {
        return None;
    }

    let name = std::str::from_utf8(&bytes[start..name_end]).ok()?;
    let (markup_start, _) = trim_whitespace(bytes, name_end, end);
    Some((name, markup_start))
}
