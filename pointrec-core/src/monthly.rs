//! Period-level earn/use totals

use serde::{Deserialize, Serialize};

use crate::record::TransactionRecord;

/// Summary card for a selected period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// Opening balance rolled in from prior periods.
    pub carryover: i64,
    /// Sum of earn-side deltas (expected non-negative).
    pub earned: i64,
    /// Sum of use-side deltas (expected non-positive).
    pub used: i64,
    /// `carryover + earned + used`.
    pub balance: i64,
    pub earn_count: usize,
    pub use_count: usize,
}

pub fn monthly_totals(period_rows: &[TransactionRecord], carryover: i64) -> MonthlyTotals {
    let mut totals = MonthlyTotals {
        carryover,
        ..MonthlyTotals::default()
    };
    for row in period_rows {
        if row.kind.is_use() {
            totals.used += row.point_delta;
            totals.use_count += 1;
        } else {
            totals.earned += row.point_delta;
            totals.earn_count += 1;
        }
    }
    totals.balance = totals.carryover + totals.earned + totals.used;
    totals
}
