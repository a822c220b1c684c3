//! Twitter/X v2 integration: the HTTP wrapper and its wire types.
pub mod client;
pub mod types;

pub use client::TwitterApi;
