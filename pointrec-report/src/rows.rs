//! Flat export rows
//!
//! Column labels reproduce the source deployment's spreadsheet exports
//! byte-for-byte; they are a compatibility surface for downstream fixtures.
//! Field order matters to the CSV writer, so it mirrors the export layout.

use pointrec_core::{EarnCategoryAggregate, MerchantAggregate, ProductAggregate, UserLedger};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarnCategoryRow {
    #[serde(rename = "적립유형(관리자메모)")]
    pub label: String,
    #[serde(rename = "총적립포인트")]
    pub total_point: i64,
    #[serde(rename = "적립인원")]
    pub user_count: usize,
}

impl From<&EarnCategoryAggregate> for EarnCategoryRow {
    fn from(agg: &EarnCategoryAggregate) -> Self {
        Self {
            label: agg.label.clone(),
            total_point: agg.total_point,
            user_count: agg.user_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantRow {
    #[serde(rename = "업체명")]
    pub label: String,
    #[serde(rename = "사용포인트")]
    pub used_point: i64,
    #[serde(rename = "사용인원")]
    pub user_count: usize,
}

impl From<&MerchantAggregate> for MerchantRow {
    fn from(agg: &MerchantAggregate) -> Self {
        Self {
            label: agg.label.clone(),
            used_point: agg.used_point,
            user_count: agg.user_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    #[serde(rename = "상품명")]
    pub label: String,
    #[serde(rename = "사용포인트")]
    pub used_point: i64,
    #[serde(rename = "사용인원")]
    pub user_count: usize,
}

impl From<&ProductAggregate> for ProductRow {
    fn from(agg: &ProductAggregate) -> Self {
        Self {
            label: agg.label.clone(),
            used_point: agg.used_point,
            user_count: agg.user_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    #[serde(rename = "고객ID")]
    pub id: String,
    #[serde(rename = "고객명")]
    pub name: String,
    #[serde(rename = "시작포인트")]
    pub start_point: i64,
    #[serde(rename = "적립포인트")]
    pub earned_point: i64,
    #[serde(rename = "사용포인트")]
    pub used_point: i64,
    #[serde(rename = "계산잔여")]
    pub calculated_point: i64,
    #[serde(rename = "실제잔여")]
    pub current_point: i64,
    /// `O` when flagged, empty otherwise, as the original exports render it.
    #[serde(rename = "불일치")]
    pub mismatch: String,
}

impl From<&UserLedger> for UserRow {
    fn from(ledger: &UserLedger) -> Self {
        Self {
            id: ledger.id.clone(),
            name: ledger.name.clone(),
            start_point: ledger.start_point,
            earned_point: ledger.earned_point,
            used_point: ledger.used_point,
            calculated_point: ledger.calculated_point,
            current_point: ledger.current_point,
            mismatch: if ledger.mismatch { "O".to_string() } else { String::new() },
        }
    }
}
