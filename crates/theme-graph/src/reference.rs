use serde::{Deserialize, Serialize};

use crate::uri::Uri;

/// Identity of an edge in the graph's edge arena.
///
/// Both endpoints of an edge store the same id, which is what makes the
/// incoming and outgoing lists views of one `Reference` rather than copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceId(pub(crate) u64);

/// Half-open byte offset pair into a file's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Shift a range that was computed relative to `offset`.
    pub fn offset_by(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<(usize, usize)> for Range {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

impl From<Range> for (usize, usize) {
    fn from(range: Range) -> Self {
        (range.start, range.end)
    }
}

/// One endpoint of a reference. A missing range means "the whole file".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: Uri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Location {
    pub fn new(uri: Uri, range: Option<Range>) -> Self {
        Self { uri, range }
    }
}

/// How a reference was introduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// Literal reference in markup or a JSON document.
    #[default]
    Direct,
    /// Introduced by a wildcard block declaration or an implied default.
    Indirect,
    /// Introduced by a schema preset or section default.
    Preset,
}

/// A directed edge between two theme files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub source: Location,
    pub target: Location,
    #[serde(rename = "type")]
    pub kind: ReferenceType,
}

/// Positional data and type attached to an edge by [`crate::ThemeGraph::bind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub source_range: Option<Range>,
    pub target_range: Option<Range>,
    pub kind: ReferenceType,
}

impl BindOptions {
    pub fn direct(source_range: Option<Range>) -> Self {
        Self {
            source_range,
            ..Self::default()
        }
    }

    pub fn of_kind(kind: ReferenceType) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_target_range(mut self, target_range: Option<Range>) -> Self {
        self.target_range = target_range;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_serializes_with_type_tag() {
        let reference = Reference {
            source: Location::new(
                Uri::new("file:///t/sections/a.liquid").unwrap(),
                Some(Range::new(3, 20)),
            ),
            target: Location::new(Uri::new("file:///t/snippets/b.liquid").unwrap(), None),
            kind: ReferenceType::Preset,
        };

        let value = serde_json::to_value(&reference).unwrap();
        assert_eq!(value["type"], "preset");
        assert_eq!(value["source"]["range"], serde_json::json!([3, 20]));
        assert!(value["target"].get("range").is_none());
    }

    #[test]
    fn test_range_helpers() {
        let range = Range::new(2, 6).offset_by(10);
        assert_eq!(range, Range::new(12, 16));
        assert_eq!(range.len(), 4);
        assert!(!range.is_empty());
    }
}
