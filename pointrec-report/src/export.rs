//! CSV export of any computed view

use anyhow::Result;
use chrono::Local;
use pointrec_core::Reconciliation;
use std::io::Write;

use crate::rows::{EarnCategoryRow, MerchantRow, ProductRow, UserRow};

/// Which of the four computed views to print or export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    Earn,
    Merchant,
    Product,
    User,
}

impl ReportView {
    /// CLI argument name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "earn" => Some(ReportView::Earn),
            "merchant" => Some(ReportView::Merchant),
            "product" => Some(ReportView::Product),
            "user" => Some(ReportView::User),
            _ => None,
        }
    }

    /// Sheet label used in export filenames, matching the original exports.
    pub fn label(&self) -> &'static str {
        match self {
            ReportView::Earn => "적립내역",
            ReportView::Merchant => "업체별",
            ReportView::Product => "상품별",
            ReportView::User => "사용자별",
        }
    }
}

/// Serialize the selected view as CSV with the fixed export column labels.
pub fn write_csv<W: Write>(recon: &Reconciliation, view: ReportView, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    match view {
        ReportView::Earn => {
            for agg in &recon.earn_categories {
                wtr.serialize(EarnCategoryRow::from(agg))?;
            }
        }
        ReportView::Merchant => {
            for agg in &recon.merchants {
                wtr.serialize(MerchantRow::from(agg))?;
            }
        }
        ReportView::Product => {
            for agg in &recon.products {
                wtr.serialize(ProductRow::from(agg))?;
            }
        }
        ReportView::User => {
            for ledger in &recon.ledgers {
                wtr.serialize(UserRow::from(ledger))?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

/// `{period-or-전체}_{view}_{YYYY-MM-DD}.csv`, matching the original's
/// download naming.
pub fn default_export_filename(period: Option<&str>, view: ReportView) -> String {
    format!(
        "{}_{}_{}.csv",
        period.unwrap_or("전체"),
        view.label(),
        Local::now().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names_round_trip() {
        for name in ["earn", "merchant", "product", "user"] {
            assert!(ReportView::from_name(name).is_some());
        }
        assert_eq!(ReportView::from_name("unknown"), None);
    }

    #[test]
    fn test_filename_uses_period_or_all() {
        let name = default_export_filename(Some("2024-01"), ReportView::User);
        assert!(name.starts_with("2024-01_사용자별_"));
        assert!(name.ends_with(".csv"));

        let name = default_export_filename(None, ReportView::Earn);
        assert!(name.starts_with("전체_적립내역_"));
    }
}
