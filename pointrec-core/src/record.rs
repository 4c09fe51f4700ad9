//! Transaction record types shared by every pipeline stage

use serde::{Deserialize, Serialize};

/// Source label marking a redemption row; every other label is earn-side.
pub const USE_LABEL: &str = "사용";

/// Transaction kind discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    #[default]
    #[serde(rename = "earn")]
    Earn,
    #[serde(rename = "use")]
    Use,
}

impl TxKind {
    /// Map the source export's kind label to a discriminator.
    pub fn from_label(label: &str) -> Self {
        if label.trim() == USE_LABEL {
            TxKind::Use
        } else {
            TxKind::Earn
        }
    }

    pub fn is_use(&self) -> bool {
        matches!(self, TxKind::Use)
    }
}

/// One row of the point-history export.
///
/// Never mutated after ingestion; every derived view is recomputed from
/// scratch over the full filtered row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub customer_name: String,
    /// Lexically sortable `YYYY/MM/DD HH:MM:SS`; empty when the source value
    /// was missing or unparseable (empty strings sort first).
    pub processed_at: String,
    pub kind: TxKind,
    /// Signed delta; `Use` rows carry non-positive values so summation yields
    /// the balance directly.
    pub point_delta: i64,
    /// Running balance reported by the source system as of this row.
    pub reported_total: i64,
    pub order_number: String,
    pub status: String,
    pub admin_memo: String,
    pub user_memo: String,
    pub merchant: String,
}

impl TransactionRecord {
    /// Create a record with the reconciliation-relevant fields set and the
    /// free-text fields empty.
    pub fn new(
        customer_id: impl Into<String>,
        customer_name: impl Into<String>,
        processed_at: impl Into<String>,
        kind: TxKind,
        point_delta: i64,
        reported_total: i64,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            processed_at: processed_at.into(),
            kind,
            point_delta,
            reported_total,
            ..Self::default()
        }
    }
}
