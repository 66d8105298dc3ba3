//! Filter, group and reduce helpers shared by every report
//!
//! Groups only exist for keys that occur in the input: a key with no
//! matching transactions is never emitted with a zero value.

use std::collections::BTreeMap;

use crate::models::{CardSummary, CategoryAmount, CategoryTotals, Transaction};

/// Label used for categories folded out of a ranked list
pub const OTHER_CATEGORY: &str = "Other";

/// Round half to even at `decimals` places. Presentation only.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    // Avoid "-0" in JSON output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to whole currency units
pub fn round_money(value: f64) -> f64 {
    round_half_even(value, 0)
}

/// Round to cents
pub fn round_cents(value: f64) -> f64 {
    round_half_even(value, 2)
}

/// Sum amounts per key
pub fn sum_by<'a, K, I, F>(transactions: I, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> K,
{
    let mut totals = BTreeMap::new();
    for tx in transactions {
        *totals.entry(key(tx)).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Mean amount per key
pub fn mean_by<'a, K, I, F>(transactions: I, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> K,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for tx in transactions {
        let entry = acc.entry(key(tx)).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

/// Category totals as owned strings
pub fn sum_by_category<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    sum_by(transactions, |tx| tx.category.clone())
}

/// Group by key, keeping groups in order of first appearance
pub fn group_ordered<'a, I, F>(transactions: I, key: F) -> Vec<(String, Vec<&'a Transaction>)>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> Option<String>,
{
    let mut groups: Vec<(String, Vec<&'a Transaction>)> = Vec::new();
    for tx in transactions {
        let Some(k) = key(tx) else { continue };
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(tx),
            None => groups.push((k, vec![tx])),
        }
    }
    groups
}

/// The `n` largest transactions by absolute amount. Ties keep input order.
pub fn top_n<'a, I>(transactions: I, n: usize) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.amount.abs().total_cmp(&a.amount.abs()));
    sorted.truncate(n);
    sorted
}

/// Spending and cashback per card, in order of first appearance
pub fn card_summaries<'a, I>(transactions: I, card_rate: f64) -> Vec<CardSummary>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_ordered(transactions, |tx| tx.card_id.clone())
        .into_iter()
        .map(|(card, txs)| {
            let spent: f64 = txs
                .iter()
                .filter(|tx| tx.is_spending())
                .map(|tx| tx.amount)
                .sum();
            CardSummary {
                card_last4: last4(&card),
                total_spent: round_cents(spent),
                cashback: round_cents(spent * card_rate),
            }
        })
        .collect()
}

fn last4(card: &str) -> String {
    let digits: Vec<char> = card.chars().filter(|c| !c.is_whitespace()).collect();
    let start = digits.len().saturating_sub(4);
    digits[start..].iter().collect()
}

/// Rank categories by amount, keeping `keep` and folding the rest into "Other"
pub fn rank_categories(totals: &CategoryTotals, keep: usize) -> Vec<CategoryAmount> {
    let mut ranked: Vec<(&String, f64)> = totals.iter().map(|(k, v)| (k, *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut result: Vec<CategoryAmount> = ranked
        .iter()
        .take(keep)
        .map(|(category, amount)| CategoryAmount {
            category: category.to_string(),
            amount: round_money(*amount),
        })
        .collect();

    if ranked.len() > keep {
        let rest: f64 = ranked[keep..].iter().map(|(_, amount)| amount).sum();
        result.push(CategoryAmount {
            category: OTHER_CATEGORY.to_string(),
            amount: round_money(rest),
        });
    }

    result
}
