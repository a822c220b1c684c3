//! Thin wrapper around the Twitter/X v2 write API.
//!
//! Posting is never retried: a timed-out `POST /2/tweets` may still have been
//! accepted, and a second attempt would publish the quote twice.
use crate::twitter::types::{CreateTweetRequest, CreateTweetResponse, MeResponse};
use async_trait::async_trait;
use quotebot_common::{QuotebotError, Result};
use quotebot_core::{PostingService, PublishedPost};
use quotebot_http::{Auth, HttpClient, HttpError, RequestOpts};

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl std::fmt::Debug for TwitterApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterApi")
            .field("base", &self.http.base().as_str())
            .finish_non_exhaustive()
    }
}

impl TwitterApi {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.twitter.com/";

    /// `access_token` must be an OAuth 2.0 user-context token with
    /// `tweet.write`; app-only tokens are rejected by the API.
    pub fn new(endpoint: &str, access_token: impl Into<String>) -> std::result::Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
            bearer: access_token.into(),
        })
    }

    fn opts(&self, retries: Option<usize>) -> RequestOpts<'_> {
        RequestOpts {
            auth: Some(Auth::Bearer(&self.bearer)),
            retries,
            ..Default::default()
        }
    }

    /// Username of the account the token acts for.
    pub async fn verify_credentials(&self) -> Result<String> {
        let resp: MeResponse = self
            .http
            .get_json("2/users/me", self.opts(None))
            .await
            .map_err(|e| QuotebotError::Config(format!("twitter credentials rejected: {e}")))?;
        let user = resp
            .data
            .ok_or_else(|| QuotebotError::Config("twitter returned no user for the token".into()))?;
        tracing::info!(user_id = %user.id, "Twitter connected as @{}", user.username);
        Ok(user.username)
    }

    /// Create a tweet and return its id.
    pub async fn create_tweet(&self, text: &str) -> Result<PublishedPost> {
        let resp: CreateTweetResponse = self
            .http
            .post_json("2/tweets", &CreateTweetRequest { text }, self.opts(Some(0)))
            .await
            .map_err(|e| QuotebotError::Publish(e.to_string()))?;

        let id = resp
            .data
            .map(|d| d.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| QuotebotError::Publish("twitter returned no tweet id".into()))?;
        tracing::debug!(tweet_id = %id, "twitter.create_tweet");
        Ok(PublishedPost { id })
    }
}

#[async_trait]
impl PostingService for TwitterApi {
    async fn publish(&self, text: &str) -> Result<PublishedPost> {
        self.create_tweet(text).await
    }
}
