//! Year-month period derivation and row partitioning
//!
//! Period keys are `YYYY-MM`. Timestamps are compared lexically throughout;
//! the fixed-width format makes that equivalent to chronological order, and
//! empty timestamps sort before every real one.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::TransactionRecord;

static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[/-](\d{2})").expect("period pattern"));

/// `YYYY-MM` key for a timestamp, or `None` when no year/month is present.
pub fn period_key(processed_at: &str) -> Option<String> {
    PERIOD_RE
        .captures(processed_at)
        .map(|caps| format!("{}-{}", &caps[1], &caps[2]))
}

/// Distinct period keys present in `rows`, newest first.
pub fn available_periods(rows: &[TransactionRecord]) -> Vec<String> {
    let mut periods = BTreeSet::new();
    for row in rows {
        if let Some(key) = period_key(&row.processed_at) {
            periods.insert(key);
        }
    }
    periods.into_iter().rev().collect()
}

/// Rows whose timestamp falls inside `period`; all rows when no period is
/// selected.
pub fn rows_in_period(
    rows: &[TransactionRecord],
    period: Option<&str>,
) -> Vec<TransactionRecord> {
    let Some(period) = period else {
        return rows.to_vec();
    };
    let prefix = period.replace('-', "/");
    rows.iter()
        .filter(|r| r.processed_at.starts_with(&prefix))
        .cloned()
        .collect()
}

/// Rows whose period compares strictly before `period`.
///
/// The comparison takes the first seven timestamp characters with `/` mapped
/// to `-`, so empty or unparseable timestamps land before every real period.
pub fn rows_before_period(rows: &[TransactionRecord], period: &str) -> Vec<TransactionRecord> {
    rows.iter()
        .filter(|r| row_month(&r.processed_at).as_str() < period)
        .cloned()
        .collect()
}

fn row_month(processed_at: &str) -> String {
    processed_at.chars().take(7).collect::<String>().replace('/', "-")
}
