//! Case-insensitive post-filters over computed views
//!
//! Filtering never re-derives an aggregate; it only narrows an
//! already-computed list by its primary label field(s).

use crate::aggregates::{EarnCategoryAggregate, MerchantAggregate, ProductAggregate};
use crate::ledger::UserLedger;

/// A view row that can be matched against a lowercase search needle.
pub trait Searchable {
    fn matches(&self, needle: &str) -> bool;
}

impl Searchable for EarnCategoryAggregate {
    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
    }
}

impl Searchable for MerchantAggregate {
    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
    }
}

impl Searchable for ProductAggregate {
    fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
    }
}

impl Searchable for UserLedger {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.id.to_lowercase().contains(needle)
    }
}

/// Filter a view by a search term; an empty term passes everything through.
pub fn filter_view<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    if term.is_empty() {
        return items.to_vec();
    }
    let needle = term.to_lowercase();
    items.iter().filter(|i| i.matches(&needle)).cloned().collect()
}
