//! # Purchase History
//!
//! Filtering and per-purchase counts over receipts that were already
//! submitted. Reading them from storage is the console's job.
//!
//! ## Search
//! ```text
//! receipts ──► submitted_at within [from, to] ──► reference contains term
//!          ──► newest first
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::money::Money;
use crate::purchase::PurchaseReceipt;
use crate::validation::{validate_date_range, ValidationResult};

/// Inclusive submission-time bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| instant >= from) && self.to.map_or(true, |to| instant <= to)
    }
}

/// Criteria for [`filter_purchases`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseFilter {
    pub range: DateRange,
    /// Case-insensitive substring of the receipt reference.
    pub reference: Option<String>,
}

impl PurchaseFilter {
    /// Builds a filter from raw request values.
    ///
    /// Dates go through [`validate_date_range`]; a blank reference matches
    /// everything.
    pub fn new(from: Option<&str>, to: Option<&str>, reference: Option<&str>) -> ValidationResult<Self> {
        Ok(PurchaseFilter {
            range: validate_date_range(from, to)?,
            reference: reference
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_lowercase),
        })
    }

    pub fn matches(&self, receipt: &PurchaseReceipt) -> bool {
        if !self.range.contains(receipt.submitted_at) {
            return false;
        }

        match &self.reference {
            Some(term) => receipt.reference.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

/// Returns the receipts matching `filter`, newest first.
pub fn filter_purchases<'a>(
    receipts: &'a [PurchaseReceipt],
    filter: &PurchaseFilter,
) -> Vec<&'a PurchaseReceipt> {
    let mut found: Vec<_> = receipts.iter().filter(|r| filter.matches(r)).collect();
    found.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    found
}

/// Sum of the submitted totals, at currency precision.
pub fn total_spent<'a>(receipts: impl IntoIterator<Item = &'a PurchaseReceipt>) -> Money {
    receipts
        .into_iter()
        .map(|r| Money::from_amount(r.purchase.total))
        .sum()
}

/// One submitted purchase with its line and unit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    pub receipt: PurchaseReceipt,
    /// Distinct products across the lines.
    pub line_count: usize,
    /// Sum of line quantities.
    pub unit_count: f64,
}

impl From<PurchaseReceipt> for PurchaseDetail {
    fn from(receipt: PurchaseReceipt) -> Self {
        let lines = &receipt.purchase.lines;
        let line_count = lines.iter().map(|l| l.product_id).collect::<HashSet<_>>().len();
        let unit_count = lines.iter().map(|l| l.quantity).sum();
        PurchaseDetail {
            receipt,
            line_count,
            unit_count,
        }
    }
}
