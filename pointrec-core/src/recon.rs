//! Full-pipeline glue: one call recomputes every derived view
//!
//! The pipeline is a pure function of (rows, denylist, params). There is no
//! hidden state and no caching; the caller decides when to re-derive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregates::{
    by_merchant, by_product, earn_by_category, EarnCategoryAggregate, MerchantAggregate,
    ProductAggregate,
};
use crate::carryover::carryover;
use crate::filters::{apply_denylist, canceled_count, exclude_canceled};
use crate::ledger::{build_ledgers, UserLedger};
use crate::monthly::{monthly_totals, MonthlyTotals};
use crate::period::{available_periods, rows_in_period};
use crate::record::TransactionRecord;
use crate::search::filter_view;

/// Caller-owned view state threaded through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconParams {
    /// `YYYY-MM`; `None` selects all periods.
    pub period: Option<String>,
    pub include_canceled: bool,
    /// Case-insensitive label filter; empty disables filtering.
    pub search: String,
}

/// Every derived view for one (rows, params) state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Periods present in the filtered data, newest first.
    pub available_periods: Vec<String>,
    /// Canceled rows found among non-denylisted rows, whether or not they
    /// were kept.
    pub canceled_count: usize,
    pub totals: MonthlyTotals,
    pub earn_categories: Vec<EarnCategoryAggregate>,
    pub merchants: Vec<MerchantAggregate>,
    pub products: Vec<ProductAggregate>,
    pub ledgers: Vec<UserLedger>,
    /// Mismatched ledgers before search filtering.
    pub mismatch_count: usize,
}

/// Run the whole reconciliation pipeline over `rows`.
pub fn reconcile(
    rows: &[TransactionRecord],
    denylist: &HashSet<String>,
    params: &ReconParams,
) -> Reconciliation {
    let real = apply_denylist(rows, denylist);
    let valid = exclude_canceled(&real, params.include_canceled);
    let period = params.period.as_deref();

    let period_rows = rows_in_period(&valid, period);
    let carry = carryover(&valid, period);
    let totals = monthly_totals(&period_rows, carry);

    let earn_categories = earn_by_category(&period_rows);
    let merchants = by_merchant(&period_rows);
    let products = by_product(&period_rows);
    let report = build_ledgers(&period_rows, &valid, period);

    Reconciliation {
        available_periods: available_periods(&valid),
        canceled_count: canceled_count(&real),
        totals,
        earn_categories: filter_view(&earn_categories, &params.search),
        merchants: filter_view(&merchants, &params.search),
        products: filter_view(&products, &params.search),
        ledgers: filter_view(&report.ledgers, &params.search),
        mismatch_count: report.mismatch_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TxKind;

    fn sample_rows() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("U001", "김하나", "2023/12/20 09:00:00", TxKind::Earn, 50, 50),
            TransactionRecord::new("U001", "김하나", "2024/01/05 10:00:00", TxKind::Earn, 100, 150),
            TransactionRecord {
                merchant: "헬스몰".to_string(),
                user_memo: "상품명(비타민C)".to_string(),
                ..TransactionRecord::new("U001", "김하나", "2024/01/10 09:30:00", TxKind::Use, -30, 120)
            },
            TransactionRecord {
                admin_memo: "리뷰 이벤트".to_string(),
                ..TransactionRecord::new("U002", "이두리", "2024/01/12 11:00:00", TxKind::Earn, 200, 200)
            },
            TransactionRecord::new("TMPDS-test", "테스트", "2024/01/15 10:00:00", TxKind::Earn, 9999, 9999),
        ]
    }

    fn denylist() -> HashSet<String> {
        ["TMPDS-test".to_string()].into_iter().collect()
    }

    #[test]
    fn test_balance_identity() {
        let params = ReconParams {
            period: Some("2024-01".to_string()),
            ..ReconParams::default()
        };
        let recon = reconcile(&sample_rows(), &denylist(), &params);
        assert_eq!(recon.totals.carryover, 50);
        assert_eq!(
            recon.totals.balance,
            recon.totals.carryover + recon.totals.earned + recon.totals.used
        );
        assert_eq!(recon.totals.balance, 50 + 300 - 30);
    }

    #[test]
    fn test_denylisted_rows_reach_no_view() {
        let params = ReconParams::default();
        let recon = reconcile(&sample_rows(), &denylist(), &params);
        assert!(recon.ledgers.iter().all(|l| l.id != "TMPDS-test"));
        assert!(recon.totals.earned < 9999);
        // The denylisted earn row must not create a category either.
        assert!(recon
            .earn_categories
            .iter()
            .all(|c| c.total_point < 9999));
    }

    #[test]
    fn test_search_narrows_views_but_not_mismatch_count() {
        let params = ReconParams {
            period: Some("2024-01".to_string()),
            search: "이두리".to_string(),
            ..ReconParams::default()
        };
        let recon = reconcile(&sample_rows(), &denylist(), &params);
        assert_eq!(recon.ledgers.len(), 1);
        assert_eq!(recon.ledgers[0].id, "U002");
        // Mismatch count reflects all ledgers, not the searched subset.
        assert_eq!(recon.mismatch_count, 0);
    }

    #[test]
    fn test_identical_inputs_yield_byte_identical_output() {
        let params = ReconParams {
            period: Some("2024-01".to_string()),
            ..ReconParams::default()
        };
        let rows = sample_rows();
        let first = reconcile(&rows, &denylist(), &params);
        let second = reconcile(&rows, &denylist(), &params);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_input_rows_are_untouched() {
        let rows = sample_rows();
        let before = rows.clone();
        let params = ReconParams::default();
        let _ = reconcile(&rows, &denylist(), &params);
        assert_eq!(rows, before);
    }
}
