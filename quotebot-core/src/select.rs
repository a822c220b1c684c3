use crate::record::QuoteRecord;
use quotebot_common::{QuotebotError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The record chosen for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub record: QuoteRecord,
    /// Every record was already posted; the pick came from the full set and
    /// the pool has started over.
    pub pool_exhausted: bool,
}

/// Pick a record with a freshly seeded RNG. See [`select_with`].
pub fn select(records: &[QuoteRecord]) -> Result<Selection> {
    select_with(records, &mut StdRng::from_entropy())
}

/// Pick uniformly among unposted records, or among all records once every one
/// has been posted (flagged via [`Selection::pool_exhausted`]).
///
/// Fails with [`QuotebotError::EmptyPool`] when `records` is empty.
pub fn select_with<R: Rng + ?Sized>(records: &[QuoteRecord], rng: &mut R) -> Result<Selection> {
    let unposted: Vec<&QuoteRecord> = records.iter().filter(|r| !r.posted).collect();

    if let Some(record) = unposted.choose(&mut *rng) {
        return Ok(Selection {
            record: (*record).clone(),
            pool_exhausted: false,
        });
    }

    let record = records.choose(rng).ok_or(QuotebotError::EmptyPool)?;
    tracing::warn!(
        total = records.len(),
        "All quotes have been posted; cycling through the full pool again"
    );
    Ok(Selection {
        record: record.clone(),
        pool_exhausted: true,
    })
}
