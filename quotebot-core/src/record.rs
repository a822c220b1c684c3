use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One table row keyed by header name, in column order. Cells keep whatever
/// scalar type the backend handed us.
pub type Row = Map<String, Value>;

/// A quote ready for selection.
///
/// Built fresh from the table on every run; `posted` is the only state that
/// survives between runs and it lives in the table, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Trimmed, never empty.
    pub text: String,
    pub author: Option<String>,
    /// 1-based row in the backing table (header is row 1).
    pub source_row: usize,
    pub posted: bool,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, source_row: usize) -> Self {
        Self {
            text: text.into(),
            author: None,
            source_row,
            posted: false,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_posted(mut self, posted: bool) -> Self {
        self.posted = posted;
        self
    }

    /// Short preview for logs.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut out: String = self.text.chars().take(max_chars).collect();
        if self.text.chars().count() > max_chars {
            out.push_str("...");
        }
        out
    }
}

/// String form of a cell: strings as-is, numbers and booleans via `Display`.
/// Null and nested values count as absent.
pub(crate) fn cell_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
