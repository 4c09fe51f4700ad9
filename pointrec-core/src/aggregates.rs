//! Grouped earn/use aggregates with deduplicated user counts
//!
//! Three independent reducers: earn rows by normalized admin memo, use rows
//! by merchant, use rows by the product name embedded in the user memo.
//! Grouping folds use ordered maps so output is deterministic regardless of
//! input order; each final list re-establishes its own sort explicitly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::TransactionRecord;

/// Label for earn rows with no admin memo.
pub const NO_MEMO_LABEL: &str = "(메모없음)";
/// Label for use rows with no merchant.
pub const NO_MERCHANT_LABEL: &str = "(없음)";
/// Label for use rows whose user memo carries no product name.
pub const UNKNOWN_PRODUCT_LABEL: &str = "(알수없음)";

static PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"상품명\(([^)]+)\)").expect("product pattern"));

/// Per-date accumulation inside an earn category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStat {
    /// First ten timestamp characters (`YYYY/MM/DD`).
    pub date: String,
    pub point: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnCategoryAggregate {
    pub label: String,
    pub total_point: i64,
    pub user_count: usize,
    /// Daily breakdown, ascending by date.
    pub dates: Vec<DateStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantAggregate {
    pub label: String,
    pub used_point: i64,
    pub user_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub label: String,
    pub used_point: i64,
    pub user_count: usize,
}

#[derive(Default)]
struct EarnAcc {
    total_point: i64,
    users: BTreeSet<String>,
    dates: BTreeMap<String, (i64, usize)>,
}

#[derive(Default)]
struct UseAcc {
    used_point: i64,
    users: BTreeSet<String>,
}

/// Earn rows grouped by normalized admin memo, largest totals first.
pub fn earn_by_category(rows: &[TransactionRecord]) -> Vec<EarnCategoryAggregate> {
    let mut groups: BTreeMap<String, EarnAcc> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.kind.is_use()) {
        let date: String = row.processed_at.chars().take(10).collect();
        let acc = groups.entry(normalize_memo(&row.admin_memo)).or_default();
        acc.total_point += row.point_delta;
        acc.users.insert(row.customer_id.clone());
        let day = acc.dates.entry(date).or_insert((0, 0));
        day.0 += row.point_delta;
        day.1 += 1;
    }

    let mut out: Vec<EarnCategoryAggregate> = groups
        .into_iter()
        .map(|(label, acc)| EarnCategoryAggregate {
            label,
            total_point: acc.total_point,
            user_count: acc.users.len(),
            dates: acc
                .dates
                .into_iter()
                .map(|(date, (point, count))| DateStat { date, point, count })
                .collect(),
        })
        .collect();
    out.sort_by(|a, b| b.total_point.cmp(&a.total_point));
    out
}

/// Use rows grouped by merchant, smallest (most negative) usage first.
pub fn by_merchant(rows: &[TransactionRecord]) -> Vec<MerchantAggregate> {
    let mut groups: BTreeMap<String, UseAcc> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.kind.is_use()) {
        let label = if row.merchant.is_empty() {
            NO_MERCHANT_LABEL.to_string()
        } else {
            row.merchant.clone()
        };
        let acc = groups.entry(label).or_default();
        acc.used_point += row.point_delta;
        acc.users.insert(row.customer_id.clone());
    }

    let mut out: Vec<MerchantAggregate> = groups
        .into_iter()
        .map(|(label, acc)| MerchantAggregate {
            label,
            used_point: acc.used_point,
            user_count: acc.users.len(),
        })
        .collect();
    out.sort_by(|a, b| a.used_point.cmp(&b.used_point));
    out
}

/// Use rows grouped by the product name extracted from the user memo,
/// smallest (most negative) usage first.
pub fn by_product(rows: &[TransactionRecord]) -> Vec<ProductAggregate> {
    let mut groups: BTreeMap<String, UseAcc> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.kind.is_use()) {
        let acc = groups.entry(product_label(&row.user_memo)).or_default();
        acc.used_point += row.point_delta;
        acc.users.insert(row.customer_id.clone());
    }

    let mut out: Vec<ProductAggregate> = groups
        .into_iter()
        .map(|(label, acc)| ProductAggregate {
            label,
            used_point: acc.used_point,
            user_count: acc.users.len(),
        })
        .collect();
    out.sort_by(|a, b| a.used_point.cmp(&b.used_point));
    out
}

/// Missing memos get the placeholder; present memos are trimmed and embedded
/// line breaks stripped. A whitespace-only memo normalizes to the empty
/// label, not the placeholder.
fn normalize_memo(memo: &str) -> String {
    if memo.is_empty() {
        return NO_MEMO_LABEL.to_string();
    }
    memo.trim().replace('\n', "")
}

fn product_label(user_memo: &str) -> String {
    PRODUCT_RE
        .captures(user_memo)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNKNOWN_PRODUCT_LABEL.to_string())
}
