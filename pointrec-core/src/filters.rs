//! Row-level filters applied before any aggregation

use std::collections::HashSet;

use crate::record::TransactionRecord;

/// Order status marking a canceled order in the source export.
pub const CANCELED_STATUS: &str = "취소완료";

/// Drop rows belonging to denylisted (test) accounts.
///
/// Total and idempotent: re-applying to its own output is a no-op.
pub fn apply_denylist(
    rows: &[TransactionRecord],
    denylist: &HashSet<String>,
) -> Vec<TransactionRecord> {
    rows.iter()
        .filter(|r| !denylist.contains(&r.customer_id))
        .cloned()
        .collect()
}

/// Drop canceled-order rows unless the caller opts into keeping them.
pub fn exclude_canceled(
    rows: &[TransactionRecord],
    include_canceled: bool,
) -> Vec<TransactionRecord> {
    if include_canceled {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| r.status != CANCELED_STATUS)
        .cloned()
        .collect()
}

/// Number of canceled-order rows present, for display alongside the toggle.
pub fn canceled_count(rows: &[TransactionRecord]) -> usize {
    rows.iter().filter(|r| r.status == CANCELED_STATUS).count()
}
