use async_trait::async_trait;
use quotebot_common::Result;
use serde::{Deserialize, Serialize};

/// Identifier handed back by the posting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    pub id: String,
}

/// Publish text, get back an identifier or a failure.
///
/// Implementations must report a reply without an identifier as
/// [`quotebot_common::QuotebotError::Publish`].
#[async_trait]
pub trait PostingService: Send + Sync {
    async fn publish(&self, text: &str) -> Result<PublishedPost>;
}
