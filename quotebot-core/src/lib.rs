//! Quote selection, posted-tracking and tweet formatting.
//!
//! A run is strictly linear: [`extract`] rows from a [`TabularSource`], [`select`]
//! one record, [`format_tweet`] it, publish through a [`PostingService`], then
//! [`mark_posted`] on a best-effort basis. [`QuoteBot`] strings those steps
//! together; the individual functions stay public so callers (and tests) can use
//! them on their own.
//!
//! ```
//! use quotebot_core::{extract, format_tweet, FormatOptions, Row};
//! use serde_json::json;
//!
//! let rows: Vec<Row> = vec![
//!     [("Quote".to_string(), json!("Stay hungry.")), ("Author".to_string(), json!("S. Jobs"))]
//!         .into_iter()
//!         .collect(),
//! ];
//! let records = extract(&rows);
//! assert_eq!(records[0].source_row, 2);
//! assert_eq!(format_tweet(&records[0], &FormatOptions::default()), "Stay hungry. - S. Jobs");
//! ```
pub mod bot;
pub mod extract;
pub mod format;
pub mod poster;
pub mod record;
pub mod select;
pub mod source;
pub mod writeback;

pub use bot::{prepare, PreparedTweet, QuoteBot, RunReport};
pub use extract::{extract, load_records};
pub use format::{format_tweet, FormatOptions, TWEET_MAX_CHARS};
pub use poster::{PostingService, PublishedPost};
pub use record::{QuoteRecord, Row};
pub use select::{select, select_with, Selection};
pub use source::{MemoryTable, TabularSource};
pub use writeback::mark_posted;
