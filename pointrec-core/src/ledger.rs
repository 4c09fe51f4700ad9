//! Per-user ledger reconstruction and mismatch detection
//!
//! The builder folds a period's rows per user in ascending timestamp order,
//! reconstructs each user's opening balance from prior-period history (or by
//! reverse-deriving it from the earliest in-period row), and flags users
//! whose recomputed closing balance disagrees with the source system's
//! reported balance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::carryover::last_reported_totals;
use crate::period::rows_before_period;
use crate::record::{TransactionRecord, TxKind};

/// Reported-vs-computed differences within this tolerance are absorbed as
/// upstream rounding artifacts.
pub const MISMATCH_TOLERANCE: i64 = 1;

/// One period transaction retained for detail display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub processed_at: String,
    pub kind: TxKind,
    pub point_delta: i64,
    pub reported_total: i64,
    /// Admin memo when present, user memo otherwise.
    pub memo: String,
    pub status: String,
}

/// Reconciled per-user balances for the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLedger {
    pub id: String,
    pub name: String,
    /// Opening balance carried in from prior periods (or reverse-derived).
    pub start_point: i64,
    pub earned_point: i64,
    /// Signed accumulation; non-positive for well-formed input.
    pub used_point: i64,
    /// Observed closing balance per the source system's reported totals.
    pub current_point: i64,
    /// `start_point + earned_point + used_point`.
    pub calculated_point: i64,
    pub mismatch: bool,
    /// Period transactions in ascending timestamp order.
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Ledgers with in-period activity, ascending by used points.
    pub ledgers: Vec<UserLedger>,
    pub mismatch_count: usize,
}

struct LedgerAcc {
    ledger: UserLedger,
    last_seen: String,
}

/// Build reconciled ledgers for `period_rows`.
///
/// `all_rows` is the full cancellation-filtered row set, used to look up each
/// user's last prior-period balance; without prior history the opening
/// balance is reverse-derived from the user's earliest in-period row
/// (`reported_total − point_delta`).
pub fn build_ledgers(
    period_rows: &[TransactionRecord],
    all_rows: &[TransactionRecord],
    period: Option<&str>,
) -> LedgerReport {
    let mut sorted: Vec<&TransactionRecord> = period_rows.iter().collect();
    sorted.sort_by(|a, b| a.processed_at.cmp(&b.processed_at));

    let mut accs: BTreeMap<String, LedgerAcc> = BTreeMap::new();
    for row in sorted {
        let acc = accs
            .entry(row.customer_id.clone())
            .or_insert_with(|| LedgerAcc {
                ledger: UserLedger {
                    id: row.customer_id.clone(),
                    name: row.customer_name.clone(),
                    start_point: 0,
                    earned_point: 0,
                    used_point: 0,
                    current_point: 0,
                    calculated_point: 0,
                    mismatch: false,
                    entries: Vec::new(),
                },
                last_seen: String::new(),
            });

        // Latest row wins the display name.
        acc.ledger.name = row.customer_name.clone();

        if row.kind.is_use() {
            acc.ledger.used_point += row.point_delta;
        } else {
            acc.ledger.earned_point += row.point_delta;
        }

        // Observed balance follows the newest timestamp; rows sharing a
        // timestamp resolve to the smallest reported total.
        if row.processed_at > acc.last_seen {
            acc.ledger.current_point = row.reported_total;
            acc.last_seen = row.processed_at.clone();
        } else if row.processed_at == acc.last_seen
            && row.reported_total < acc.ledger.current_point
        {
            acc.ledger.current_point = row.reported_total;
        }

        acc.ledger.entries.push(LedgerEntry {
            processed_at: row.processed_at.clone(),
            kind: row.kind,
            point_delta: row.point_delta,
            reported_total: row.reported_total,
            memo: if !row.admin_memo.is_empty() {
                row.admin_memo.clone()
            } else {
                row.user_memo.clone()
            },
            status: row.status.clone(),
        });
    }

    let prior_totals = match period {
        Some(p) => last_reported_totals(&rows_before_period(all_rows, p)),
        None => BTreeMap::new(),
    };

    let mut ledgers = Vec::new();
    for (_, acc) in accs {
        let mut ledger = acc.ledger;
        ledger.start_point = match prior_totals.get(&ledger.id) {
            Some(total) => *total,
            // Entries are already ascending, so the first one is the
            // user's earliest in-period transaction.
            None => ledger
                .entries
                .first()
                .map(|e| e.reported_total - e.point_delta)
                .unwrap_or(0),
        };
        ledger.calculated_point = ledger.start_point + ledger.earned_point + ledger.used_point;
        ledger.mismatch =
            (ledger.calculated_point - ledger.current_point).abs() > MISMATCH_TOLERANCE;

        if ledger.earned_point != 0 || ledger.used_point != 0 {
            ledgers.push(ledger);
        }
    }
    ledgers.sort_by(|a, b| a.used_point.cmp(&b.used_point));

    let mismatch_count = ledgers.iter().filter(|l| l.mismatch).count();
    LedgerReport {
        ledgers,
        mismatch_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        id: &str,
        ts: &str,
        kind: TxKind,
        delta: i64,
        total: i64,
    ) -> TransactionRecord {
        TransactionRecord::new(id, "김하나", ts, kind, delta, total)
    }

    #[test]
    fn test_single_user_no_prior_history() {
        // One user, two rows, nothing carried in: the opening balance
        // reverse-derives to zero and the books balance.
        let rows = vec![
            row("U001", "2024/01/05 10:00:00", TxKind::Earn, 100, 100),
            row("U001", "2024/01/10 09:30:00", TxKind::Use, -30, 70),
        ];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        assert_eq!(report.ledgers.len(), 1);

        let u = &report.ledgers[0];
        assert_eq!(u.start_point, 0);
        assert_eq!(u.earned_point, 100);
        assert_eq!(u.used_point, -30);
        assert_eq!(u.current_point, 70);
        assert_eq!(u.calculated_point, 70);
        assert!(!u.mismatch);
        assert_eq!(report.mismatch_count, 0);
    }

    #[test]
    fn test_prior_balance_feeds_start_point_and_flags_mismatch() {
        let prior = row("U001", "2023/12/20 09:00:00", TxKind::Earn, 50, 50);
        let period_rows = vec![
            row("U001", "2024/01/05 10:00:00", TxKind::Earn, 100, 100),
            row("U001", "2024/01/10 09:30:00", TxKind::Use, -30, 70),
        ];
        let mut all_rows = vec![prior];
        all_rows.extend(period_rows.iter().cloned());

        let report = build_ledgers(&period_rows, &all_rows, Some("2024-01"));
        let u = &report.ledgers[0];
        assert_eq!(u.start_point, 50);
        assert_eq!(u.calculated_point, 120);
        assert_eq!(u.current_point, 70);
        assert!(u.mismatch);
        assert_eq!(report.mismatch_count, 1);
    }

    #[test]
    fn test_same_timestamp_resolves_to_smaller_total() {
        let rows = vec![
            row("U001", "2024/01/05 10:00:00", TxKind::Earn, 50, 50),
            row("U001", "2024/01/05 10:00:00", TxKind::Use, -10, 40),
        ];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        assert_eq!(report.ledgers[0].current_point, 40);

        // The smaller total wins regardless of row order.
        let reversed: Vec<_> = rows.iter().rev().cloned().collect();
        let report = build_ledgers(&reversed, &reversed, Some("2024-01"));
        assert_eq!(report.ledgers[0].current_point, 40);
    }

    #[test]
    fn test_mismatch_tolerance_boundary() {
        // A known zero prior balance pins start_point so the reported total
        // alone controls the difference.
        let prior = row("U001", "2023/12/01 09:00:00", TxKind::Earn, 0, 0);
        let period = vec![row("U001", "2024/01/05 10:00:00", TxKind::Earn, 100, 101)];
        let all = vec![prior.clone(), period[0].clone()];
        let report = build_ledgers(&period, &all, Some("2024-01"));
        assert!(!report.ledgers[0].mismatch, "|100 - 101| == 1 is tolerated");

        let period = vec![row("U001", "2024/01/05 10:00:00", TxKind::Earn, 100, 102)];
        let all = vec![prior, period[0].clone()];
        let report = build_ledgers(&period, &all, Some("2024-01"));
        assert!(report.ledgers[0].mismatch, "|100 - 102| == 2 is flagged");
    }

    #[test]
    fn test_zero_activity_users_dropped() {
        let rows = vec![
            row("U001", "2024/01/05 10:00:00", TxKind::Earn, 0, 500),
            row("U002", "2024/01/06 10:00:00", TxKind::Earn, 10, 10),
        ];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        assert_eq!(report.ledgers.len(), 1);
        assert_eq!(report.ledgers[0].id, "U002");
    }

    #[test]
    fn test_ledgers_sorted_ascending_by_used_point() {
        let rows = vec![
            row("U001", "2024/01/05 10:00:00", TxKind::Use, -10, 90),
            row("U002", "2024/01/06 10:00:00", TxKind::Use, -300, 0),
            row("U003", "2024/01/07 10:00:00", TxKind::Earn, 50, 50),
        ];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        let order: Vec<&str> = report.ledgers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["U002", "U001", "U003"]);
    }

    #[test]
    fn test_latest_name_wins_and_entries_stay_ordered() {
        let rows = vec![
            TransactionRecord::new("U001", "옛이름", "2024/01/10 09:00:00", TxKind::Earn, 10, 110),
            TransactionRecord::new("U001", "새이름", "2024/01/20 09:00:00", TxKind::Earn, 10, 120),
            TransactionRecord::new("U001", "옛이름", "2024/01/05 09:00:00", TxKind::Earn, 100, 100),
        ];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        let u = &report.ledgers[0];
        assert_eq!(u.name, "새이름");
        let times: Vec<&str> = u.entries.iter().map(|e| e.processed_at.as_str()).collect();
        assert_eq!(
            times,
            vec!["2024/01/05 09:00:00", "2024/01/10 09:00:00", "2024/01/20 09:00:00"]
        );
    }

    #[test]
    fn test_entry_memo_prefers_admin_memo() {
        let mut with_both = row("U001", "2024/01/05 10:00:00", TxKind::Earn, 10, 10);
        with_both.admin_memo = "관리자".to_string();
        with_both.user_memo = "사용자".to_string();
        let mut user_only = row("U001", "2024/01/06 10:00:00", TxKind::Earn, 10, 20);
        user_only.user_memo = "사용자만".to_string();

        let rows = vec![with_both, user_only];
        let report = build_ledgers(&rows, &rows, Some("2024-01"));
        let entries = &report.ledgers[0].entries;
        assert_eq!(entries[0].memo, "관리자");
        assert_eq!(entries[1].memo, "사용자만");
    }

    #[test]
    fn test_no_period_reverse_derives_every_start() {
        let rows = vec![
            row("U001", "2023/12/20 09:00:00", TxKind::Earn, 50, 50),
            row("U001", "2024/01/05 10:00:00", TxKind::Earn, 100, 150),
        ];
        // All-period view: both rows are in scope and there is no prior map,
        // so the start point derives from the earliest row.
        let report = build_ledgers(&rows, &rows, None);
        let u = &report.ledgers[0];
        assert_eq!(u.start_point, 0);
        assert_eq!(u.calculated_point, 150);
        assert_eq!(u.current_point, 150);
        assert!(!u.mismatch);
    }
}
