//! pointrec-core: deterministic reconciliation and aggregation over
//! loyalty-point transaction rows.
//!
//! Everything here is pure and synchronous: raw rows in, derived views out.
//! Malformed domain data never raises; numeric junk coerces to zero and
//! missing timestamps sort first.

pub mod record;
pub mod filters;
pub mod period;
pub mod carryover;
pub mod monthly;
pub mod aggregates;
pub mod ledger;
pub mod search;
pub mod recon;

pub use record::{TransactionRecord, TxKind, USE_LABEL};
pub use filters::{apply_denylist, canceled_count, exclude_canceled, CANCELED_STATUS};
pub use period::{available_periods, period_key, rows_before_period, rows_in_period};
pub use carryover::{carryover, last_reported_totals};
pub use monthly::{monthly_totals, MonthlyTotals};
pub use aggregates::{
    by_merchant, by_product, earn_by_category, DateStat, EarnCategoryAggregate,
    MerchantAggregate, ProductAggregate, NO_MEMO_LABEL, NO_MERCHANT_LABEL,
    UNKNOWN_PRODUCT_LABEL,
};
pub use ledger::{build_ledgers, LedgerEntry, LedgerReport, UserLedger, MISMATCH_TOLERANCE};
pub use search::{filter_view, Searchable};
pub use recon::{reconcile, ReconParams, Reconciliation};
