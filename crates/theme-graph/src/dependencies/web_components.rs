//! Custom element definitions in theme scripts.

use std::sync::LazyLock;

use regex::Regex;

use crate::reference::Range;

static DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"customElements\s*\.\s*define\s*\(\s*(?:'([^']+)'|"([^"]+)"|`([^`$]+)`)"#)
        .expect("customElements.define pattern is valid")
});

/// `(tag name, range of the name literal)` for every `customElements.define` call.
pub fn find_definitions(script: &str) -> Vec<(String, Range)> {
    if !script.contains("customElements") {
        return Vec::new();
    }
    DEFINE
        .captures_iter(script)
        .filter_map(|captures| {
            let name = captures
                .get(1)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(3))?;
            Some((
                name.as_str().to_ascii_lowercase(),
                Range::new(name.start(), name.end()),
            ))
        })
        .filter(|(name, _)| name.contains('-'))
        .collect()
}
