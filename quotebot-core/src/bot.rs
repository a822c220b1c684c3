//! One scheduled run: load, select, format, publish, mark.

use crate::extract::load_records;
use crate::format::{format_tweet, FormatOptions};
use crate::poster::PostingService;
use crate::record::QuoteRecord;
use crate::select::{select_with, Selection};
use crate::source::TabularSource;
use crate::writeback::mark_posted;
use quotebot_common::{QuotebotError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Characters of the quote shown in the "selected" log line.
const PREVIEW_CHARS: usize = 50;

/// A formatted post that has not been published yet.
#[derive(Debug, Clone)]
pub struct PreparedTweet {
    pub record: QuoteRecord,
    pub text: String,
    pub pool_exhausted: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub post_id: String,
    pub text: String,
    pub source_row: usize,
    pub pool_exhausted: bool,
    /// False when the write-back failed; the post itself still went out.
    pub marked_posted: bool,
}

/// Load, select and format without touching the posting service.
pub async fn prepare<R: Rng + ?Sized>(
    source: &dyn TabularSource,
    format: &FormatOptions,
    rng: &mut R,
) -> Result<PreparedTweet> {
    let records = load_records(source).await;
    if records.is_empty() {
        tracing::error!("No quotes found in the source");
    }

    let Selection {
        record,
        pool_exhausted,
    } = select_with(&records, rng)?;
    tracing::info!(
        row = record.source_row,
        pool_exhausted,
        "Selected quote: {}",
        record.preview(PREVIEW_CHARS)
    );

    let text = format_tweet(&record, format);
    Ok(PreparedTweet {
        record,
        text,
        pool_exhausted,
    })
}

/// The run pipeline with its two collaborators.
pub struct QuoteBot {
    source: Arc<dyn TabularSource>,
    poster: Arc<dyn PostingService>,
    format: FormatOptions,
}

impl QuoteBot {
    pub fn new(source: Arc<dyn TabularSource>, poster: Arc<dyn PostingService>) -> Self {
        Self {
            source,
            poster,
            format: FormatOptions::default(),
        }
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(&mut rng).await
    }

    /// Publish one quote and mark it as posted.
    ///
    /// Fails on an empty pool or a rejected publish. A failed write-back is
    /// logged and reported through [`RunReport::marked_posted`] only; a crash
    /// between publish and write-back can post the same quote again later.
    pub async fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunReport> {
        let prepared = prepare(self.source.as_ref(), &self.format, rng).await?;

        let post = self
            .poster
            .publish(&prepared.text)
            .await
            .map_err(|e| match e {
                QuotebotError::Publish(_) => e,
                other => QuotebotError::Publish(other.to_string()),
            })?;
        if post.id.trim().is_empty() {
            return Err(QuotebotError::Publish(
                "posting service returned no identifier".into(),
            ));
        }

        tracing::info!(post_id = %post.id, "Tweet posted successfully");
        tracing::info!("Tweet content: {}", prepared.text);

        let marked_posted = match mark_posted(self.source.as_ref(), &prepared.record).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    row = prepared.record.source_row,
                    "Could not mark quote as posted; it may be selected again"
                );
                false
            }
        };

        Ok(RunReport {
            post_id: post.id,
            text: prepared.text,
            source_row: prepared.record.source_row,
            pool_exhausted: prepared.pool_exhausted,
            marked_posted,
        })
    }
}
