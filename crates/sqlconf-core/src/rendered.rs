//! Rendered configuration lines

/// An ordered, append-only sequence of newline-terminated config lines.
///
/// Produced by one materialization pass in document order: a context's
/// opening tag, its directives, its children, then its closing tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedConfig {
    lines: Vec<String>,
}

impl RenderedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `<key value>`, or `<key>` when the value is absent or empty.
    pub fn open_tag(&mut self, key: &str, value: Option<&str>) {
        let line = match value.filter(|v| !v.is_empty()) {
            Some(value) => format!("<{} {}>\n", key, value),
            None => format!("<{}>\n", key),
        };
        self.lines.push(line);
    }

    /// Append `</key>`.
    pub fn close_tag(&mut self, key: &str) {
        self.lines.push(format!("</{}>\n", key));
    }

    /// Append `key value`, or `key` alone when the value is NULL.
    pub fn directive(&mut self, key: &str, value: Option<&str>) {
        let line = match value {
            Some(value) => format!("{} {}\n", key, value),
            None => format!("{}\n", key),
        };
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, including its trailing newline
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Concatenate every line into one configuration text
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Total size in bytes of all lines
    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(String::len).sum()
    }
}

#[cfg(test)]
#[path = "rendered_test.rs"]
mod tests;
