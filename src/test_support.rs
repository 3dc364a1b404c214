//! Shared fixtures for tests and benchmarks: a bitemporal balance record,
//! a single-temporal rate record, and seeded history generators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::schema::RecordSchema;
use crate::temporal::{Instant, Span, INFINITY};

/// A bitemporal account balance row: business validity plus processing
/// (system) validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub account: String,
    pub quantity: i64,
    pub business_from: Instant,
    pub business_thru: Instant,
    pub processing_in: Instant,
    pub processing_out: Instant,
}

/// Schema for [`BalanceRow`]: both milestoning axes present.
#[derive(Debug, Clone, Copy)]
pub struct BalanceSchema;

impl RecordSchema for BalanceSchema {
    type Record = BalanceRow;

    fn entity_name(&self) -> &str {
        "Balance"
    }

    fn primary_key(&self, record: &BalanceRow) -> String {
        record.account.clone()
    }

    fn business_span(&self, record: &BalanceRow) -> Option<Span> {
        Some(Span::raw(record.business_from, record.business_thru))
    }

    fn processing_span(&self, record: &BalanceRow) -> Option<Span> {
        Some(Span::raw(record.processing_in, record.processing_out))
    }

    fn copy_with_spans(
        &self,
        record: &BalanceRow,
        business: Option<Span>,
        processing: Option<Span>,
    ) -> BalanceRow {
        let mut copy = record.clone();
        if let Some(span) = business {
            copy.business_from = span.from;
            copy.business_thru = span.thru;
        }
        if let Some(span) = processing {
            copy.processing_in = span.from;
            copy.processing_out = span.thru;
        }
        copy
    }
}

/// A single-temporal rate row: business validity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    pub key: String,
    pub value: i64,
    pub from: Instant,
    pub thru: Instant,
}

/// Schema for [`RateRow`]: no processing dimension.
#[derive(Debug, Clone, Copy)]
pub struct RateSchema;

impl RecordSchema for RateSchema {
    type Record = RateRow;

    fn entity_name(&self) -> &str {
        "Rate"
    }

    fn primary_key(&self, record: &RateRow) -> String {
        record.key.clone()
    }

    fn business_span(&self, record: &RateRow) -> Option<Span> {
        Some(Span::raw(record.from, record.thru))
    }

    fn processing_span(&self, _record: &RateRow) -> Option<Span> {
        None
    }

    fn copy_with_spans(
        &self,
        record: &RateRow,
        business: Option<Span>,
        _processing: Option<Span>,
    ) -> RateRow {
        let mut copy = record.clone();
        if let Some(span) = business {
            copy.from = span.from;
            copy.thru = span.thru;
        }
        copy
    }
}

/// Build a balance row.
pub fn balance(
    account: &str,
    quantity: i64,
    business_from: Instant,
    business_thru: Instant,
    processing_in: Instant,
    processing_out: Instant,
) -> BalanceRow {
    BalanceRow {
        account: account.to_string(),
        quantity,
        business_from,
        business_thru,
        processing_in,
        processing_out,
    }
}

/// Build a rate row.
pub fn rate(key: &str, value: i64, from: Instant, thru: Instant) -> RateRow {
    RateRow {
        key: key.to_string(),
        value,
        from,
        thru,
    }
}

/// Generate a contiguous chain of `count` daily rate rows starting at
/// `start`, with the final row open-ended. `step` is the row width in
/// milliseconds.
pub fn generate_rate_chain(key: &str, count: usize, start: Instant, step: Instant) -> Vec<RateRow> {
    (0..count)
        .map(|i| {
            let from = start + i as Instant * step;
            let thru = if i + 1 == count {
                INFINITY
            } else {
                from + step
            };
            rate(key, i as i64, from, thru)
        })
        .collect()
}

/// Generate `count` random rate rows for one key within `[0, horizon)`.
/// Spans may overlap freely; bounds are always strictly increasing, so
/// every generated row passes the validity invariant.
pub fn generate_random_rates(key: &str, count: usize, horizon: Instant, seed: u64) -> Vec<RateRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let from = rng.random_range(0..horizon - 1);
            let thru = rng.random_range(from + 1..=horizon);
            rate(key, i as i64, from, thru)
        })
        .collect()
}
