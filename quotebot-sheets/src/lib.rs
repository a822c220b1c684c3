//! Google Sheets backend for the quote table.
//!
//! Talks to the Sheets v4 `values` API: one worksheet is read whole (first row
//! as the header), and single cells are written back in A1 notation.
pub mod a1;
pub mod client;
pub mod types;

pub use client::{SheetsAuth, SheetsClient};
