//! Opening-balance carryover from prior-period activity

use std::collections::BTreeMap;

use crate::period::rows_before_period;
use crate::record::TransactionRecord;

/// Last reported total per user across `rows`.
///
/// Rows are folded in ascending timestamp order with later rows overwriting
/// earlier ones, so the retained value is each user's chronologically last
/// reported balance. The sort is stable; same-timestamp rows keep their
/// input order.
pub fn last_reported_totals(rows: &[TransactionRecord]) -> BTreeMap<String, i64> {
    let mut sorted: Vec<&TransactionRecord> = rows.iter().collect();
    sorted.sort_by(|a, b| a.processed_at.cmp(&b.processed_at));

    let mut totals = BTreeMap::new();
    for row in sorted {
        totals.insert(row.customer_id.clone(), row.reported_total);
    }
    totals
}

/// Aggregate opening balance rolled into `period` from all prior activity.
///
/// Zero when no period is selected or no prior rows exist.
pub fn carryover(rows: &[TransactionRecord], period: Option<&str>) -> i64 {
    let Some(period) = period else {
        return 0;
    };
    let prior = rows_before_period(rows, period);
    last_reported_totals(&prior).values().sum()
}
