use crate::record::QuoteRecord;
use crate::source::TabularSource;
use quotebot_common::{QuotebotError, Result};

/// Header names recognised as the posted column, in priority order.
pub const POSTED_HEADERS: &[&str] = &["posted", "tweeted", "used"];

/// Title for the column created when none exists.
pub const NEW_POSTED_HEADER: &str = "Posted";

/// Value written into the posted column.
pub const POSTED_MARK: &str = "Yes";

/// 1-based index of the posted column in `header`, if there is one.
pub fn find_posted_column(header: &[String]) -> Option<usize> {
    POSTED_HEADERS.iter().find_map(|wanted| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .map(|idx| idx + 1)
    })
}

/// Record in the table that `record` has been published.
///
/// Reuses an existing posted/tweeted/used column or appends a `Posted` column
/// after the last header cell. Returns the column written. Every failure comes
/// back as [`QuotebotError::WriteBack`].
pub async fn mark_posted(source: &dyn TabularSource, record: &QuoteRecord) -> Result<usize> {
    let header = source
        .read_header_row()
        .await
        .map_err(|e| QuotebotError::WriteBack(format!("reading header row: {e}")))?;

    let column = match find_posted_column(&header) {
        Some(col) => col,
        None => {
            let col = header.len() + 1;
            tracing::info!(column = col, "No posted column found; adding '{NEW_POSTED_HEADER}'");
            source
                .write_cell(1, col, NEW_POSTED_HEADER)
                .await
                .map_err(|e| QuotebotError::WriteBack(format!("creating posted column: {e}")))?;
            col
        }
    };

    source
        .write_cell(record.source_row, column, POSTED_MARK)
        .await
        .map_err(|e| {
            QuotebotError::WriteBack(format!(
                "marking row {} column {column}: {e}",
                record.source_row
            ))
        })?;

    tracing::info!(row = record.source_row, column, "Marked quote as posted");
    Ok(column)
}
