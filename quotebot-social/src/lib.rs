//! Posting backends for the quote bot.
//!
//! Only Twitter/X is implemented. Its client publishes through the v2 API with a
//! user-context bearer token and plugs into the core as a
//! [`quotebot_core::PostingService`].
pub mod twitter;

pub use twitter::TwitterApi;
