#![allow(dead_code)]

use async_trait::async_trait;
use quotebot_common::observability::{init_logging, LogConfig};
use quotebot_common::{QuotebotError, Result};
use quotebot_core::{MemoryTable, PostingService, PublishedPost, Row, TabularSource};
use std::sync::{Mutex, OnceLock};

static INIT: OnceLock<()> = OnceLock::new();

pub fn init_test_tracing() {
    INIT.get_or_init(|| {
        let config = LogConfig {
            app_name: "quotebot-tests",
            default_filter: "debug".into(),
            ..LogConfig::default()
        };
        let _ = init_logging(config);
    });
}

/// Records every published text; replies with sequential ids.
#[derive(Default)]
pub struct RecordingPoster {
    pub published: Mutex<Vec<String>>,
}

impl RecordingPoster {
    pub fn texts(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostingService for RecordingPoster {
    async fn publish(&self, text: &str) -> Result<PublishedPost> {
        let mut published = self.published.lock().unwrap();
        published.push(text.to_string());
        Ok(PublishedPost {
            id: format!("{}", 1000 + published.len()),
        })
    }
}

/// Rejects every post.
pub struct RejectingPoster;

#[async_trait]
impl PostingService for RejectingPoster {
    async fn publish(&self, _text: &str) -> Result<PublishedPost> {
        Err(QuotebotError::Publish("403 duplicate content".into()))
    }
}

/// Accepts the post but hands back no identifier.
pub struct SilentPoster;

#[async_trait]
impl PostingService for SilentPoster {
    async fn publish(&self, _text: &str) -> Result<PublishedPost> {
        Ok(PublishedPost { id: String::new() })
    }
}

/// Wraps a [`MemoryTable`] and fails selected operations.
pub struct FaultyTable {
    pub inner: MemoryTable,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[async_trait]
impl TabularSource for FaultyTable {
    async fn read_all_rows(&self) -> Result<Vec<Row>> {
        if self.fail_reads {
            return Err(QuotebotError::SourceRead("connection reset".into()));
        }
        self.inner.read_all_rows().await
    }

    async fn read_header_row(&self) -> Result<Vec<String>> {
        self.inner.read_header_row().await
    }

    async fn write_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(QuotebotError::SourceRead("read-only token".into()));
        }
        self.inner.write_cell(row, column, value).await
    }
}
