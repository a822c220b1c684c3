//! Row → [`QuoteRecord`] normalisation.
//!
//! Sheets maintained by hand rarely agree on column names, so each field is
//! resolved through an ordered list of candidate headers. The tables below are
//! the canonical mapping; the first candidate holding a non-blank value wins.

use crate::record::{cell_text, QuoteRecord, Row};
use crate::source::TabularSource;

/// Rows start at 2: the table is 1-indexed and row 1 is the header.
const FIRST_DATA_ROW: usize = 2;

/// Ordered candidate headers for one record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldLookup {
    pub candidates: &'static [&'static str],
    pub ignore_case: bool,
}

pub const TEXT_COLUMNS: FieldLookup = FieldLookup {
    candidates: &["Quote", "Text", "Content", "Message", "quote", "text"],
    ignore_case: false,
};

pub const AUTHOR_COLUMNS: FieldLookup = FieldLookup {
    candidates: &["Author", "By", "Source", "author", "by"],
    ignore_case: false,
};

pub const POSTED_COLUMNS: FieldLookup = FieldLookup {
    candidates: &["Posted", "Tweeted", "Used"],
    ignore_case: true,
};

/// Lowercased cell values that mark a row as already published.
pub const POSTED_VALUES: &[&str] = &["yes", "true", "1", "posted", "tweeted"];

impl FieldLookup {
    /// First candidate present in `row` whose value is non-blank, trimmed.
    ///
    /// Case-insensitive lookups take the leftmost matching column, the same
    /// column [`crate::writeback::find_posted_column`] writes to.
    pub fn resolve(&self, row: &Row) -> Option<String> {
        self.candidates.iter().find_map(|name| {
            let cell = if self.ignore_case {
                row.iter()
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            } else {
                row.get(*name)
            }?;
            let text = cell_text(cell)?;
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
    }
}

fn is_posted(row: &Row) -> bool {
    POSTED_COLUMNS
        .resolve(row)
        .map(|v| POSTED_VALUES.contains(&v.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Normalise raw rows into records, dropping rows without usable text.
///
/// Positions are kept even for dropped rows, so `source_row` always points at
/// the row the record came from.
pub fn extract(rows: &[Row]) -> Vec<QuoteRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let text = TEXT_COLUMNS.resolve(row)?;
            Some(QuoteRecord {
                text,
                author: AUTHOR_COLUMNS.resolve(row),
                source_row: idx + FIRST_DATA_ROW,
                posted: is_posted(row),
            })
        })
        .collect()
}

/// Read the whole table and extract records.
///
/// A read failure is logged and reported as an empty list; the caller sees
/// "nothing to post" rather than an error.
pub async fn load_records(source: &dyn TabularSource) -> Vec<QuoteRecord> {
    let rows = match source.read_all_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching quotes");
            return Vec::new();
        }
    };

    let records = extract(&rows);
    let unposted = records.iter().filter(|r| !r.posted).count();
    tracing::info!(
        rows = rows.len(),
        quotes = records.len(),
        unposted,
        "Fetched {} quotes from source",
        records.len()
    );
    records
}
