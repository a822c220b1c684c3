//! A1 notation helpers.

/// Column letters for a 1-based column number (1 → `A`, 27 → `AA`).
pub fn column_letters(mut column: usize) -> String {
    debug_assert!(column > 0, "columns are 1-based");
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Quote a worksheet title for use in a range (`'It''s'`).
pub fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// `'<sheet>'!<col><row>` for 1-based row/column.
pub fn cell_range(sheet: &str, row: usize, column: usize) -> String {
    format!("{}!{}{}", quote_sheet(sheet), column_letters(column), row)
}

/// `'<sheet>'!<row>:<row>`, a whole row.
pub fn row_range(sheet: &str, row: usize) -> String {
    format!("{}!{row}:{row}", quote_sheet(sheet))
}
