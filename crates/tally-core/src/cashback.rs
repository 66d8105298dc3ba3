//! Cashback calculation by category for a target month

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::round_cents;
use crate::error::{Error, Result};
use crate::models::{CategoryTotals, Transaction};

/// Default flat cashback rate (5%)
pub const DEFAULT_FLAT_RATE: f64 = 0.05;

/// How cashback is earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CashbackPolicy {
    /// Every category earns the same rate
    Flat { rate: f64 },
    /// Per-category rates; unlisted categories earn nothing
    Rules { rates: BTreeMap<String, f64> },
}

impl Default for CashbackPolicy {
    fn default() -> Self {
        Self::Flat {
            rate: DEFAULT_FLAT_RATE,
        }
    }
}

impl CashbackPolicy {
    pub fn rate_for(&self, category: &str) -> f64 {
        match self {
            Self::Flat { rate } => *rate,
            Self::Rules { rates } => rates.get(category).copied().unwrap_or(0.0),
        }
    }
}

/// Cashback earned per category by transactions in `year`-`month`.
///
/// Values are unrounded; use [`analyze_cashback`] for presentation.
pub fn cashback_by_category(
    transactions: &[Transaction],
    policy: &CashbackPolicy,
    year: i32,
    month: u32,
) -> Result<CategoryTotals> {
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidPeriod(format!("month {} out of range", month)));
    }

    let mut result = CategoryTotals::new();
    for tx in transactions.iter().filter(|tx| tx.in_month(year, month)) {
        *result.entry(tx.category.clone()).or_insert(0.0) +=
            tx.amount * policy.rate_for(&tx.category);
    }

    debug!(
        year,
        month,
        categories = result.len(),
        "Computed cashback by category"
    );
    Ok(result)
}

/// Cashback per category rounded to cents
pub fn analyze_cashback(
    transactions: &[Transaction],
    policy: &CashbackPolicy,
    year: i32,
    month: u32,
) -> Result<CategoryTotals> {
    Ok(cashback_by_category(transactions, policy, year, month)?
        .into_iter()
        .map(|(category, value)| (category, round_cents(value)))
        .collect())
}
