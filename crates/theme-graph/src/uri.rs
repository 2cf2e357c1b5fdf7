use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use path_clean::PathClean;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const FILE_SCHEME: &str = "file://";

/// Canonical identifier for a file in a theme.
///
/// URIs are normalised once on construction (forward slashes, no trailing slash) so
/// that every lookup in the graph can compare them as plain strings. Filesystem paths
/// are turned into `file://` URIs; anything else (virtual schemes used by editors) is
/// kept verbatim apart from normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(String);

/// Errors produced when constructing a [`Uri`].
#[derive(Debug, Error)]
pub enum UriError {
    #[error("URI cannot be empty")]
    Empty,

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),
}

impl Uri {
    /// Create a URI from its textual form.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UriError> {
        let value = value.as_ref();
        if value.trim().is_empty() {
            return Err(UriError::Empty);
        }
        Ok(Self(normalize(value)))
    }

    /// Create a `file://` URI from a filesystem path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UriError> {
        let cleaned = path.as_ref().to_path_buf().clean();
        let text = cleaned
            .to_str()
            .ok_or_else(|| UriError::NonUtf8(cleaned.clone()))?;

        if text.is_empty() {
            return Err(UriError::Empty);
        }

        let text = text.replace('\\', "/");
        if text.starts_with('/') {
            Self::new(format!("{FILE_SCHEME}{text}"))
        } else {
            Self::new(format!("{FILE_SCHEME}/{text}"))
        }
    }

    /// Filesystem path for `file://` URIs; other schemes are returned as-is.
    pub fn to_path(&self) -> PathBuf {
        match self.0.strip_prefix(FILE_SCHEME) {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.0),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a relative path (`"snippets/card.liquid"`) to this URI.
    pub fn join(&self, relative: &str) -> Uri {
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            return self.clone();
        }
        Uri(normalize(&format!("{}/{}", self.0, relative)))
    }

    /// Path of this URI relative to `root`, or `None` when it lives elsewhere.
    pub fn relative_to(&self, root: &Uri) -> Option<&str> {
        self.0
            .strip_prefix(root.as_str())?
            .strip_prefix('/')
            .filter(|rest| !rest.is_empty())
    }

    /// Last path segment (`"card.liquid"`).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Last path segment without its final extension (`"card"`).
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Final extension of the last path segment, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

fn normalize(value: &str) -> String {
    let mut normalized = value.trim().replace('\\', "/");
    while normalized.len() > 1 && normalized.ends_with('/') && !normalized.ends_with("://") {
        normalized.pop();
    }
    normalized
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Uri::new(value).map_err(serde::de::Error::custom)
    }
}
