//! "Investment round-up": spare change from rounding spending up to a fixed step

use tracing::debug;

use crate::aggregate::round_cents;
use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::window::parse_month;

/// Default rounding step
pub const DEFAULT_ROUND_UP_LIMIT: f64 = 50.0;

/// Round `amount` up to the next multiple of `limit` (unchanged when already a multiple)
pub fn round_up(amount: f64, limit: f64) -> f64 {
    if amount % limit == 0.0 {
        amount
    } else {
        ((amount / limit).floor() + 1.0) * limit
    }
}

/// Spare change collected over `month` (YYYY-MM) when every spending
/// transaction (strictly positive amount) is rounded up to `limit`.
pub fn investment_bank(month: &str, transactions: &[Transaction], limit: f64) -> Result<f64> {
    if !limit.is_finite() || limit <= 0.0 {
        return Err(Error::InvalidLimit(limit));
    }
    let (year, month_num) = parse_month(month)?;

    let mut rounded_total = 0.0;
    let mut actual_total = 0.0;
    let mut count = 0usize;
    for tx in transactions
        .iter()
        .filter(|tx| tx.in_month(year, month_num) && tx.amount > 0.0)
    {
        rounded_total += round_up(tx.amount, limit);
        actual_total += tx.amount;
        count += 1;
    }

    let saved = round_cents(rounded_total - actual_total);
    debug!(month, limit, transactions = count, saved, "Computed round-up savings");
    Ok(saved)
}
