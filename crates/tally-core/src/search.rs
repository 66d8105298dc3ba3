//! Description matchers and free-text search

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Transaction;

/// Category that personal transfers are booked under by default
pub const DEFAULT_TRANSFER_CATEGORY: &str = "Transfers";

/// Russian mobile number: +7 XXX XXX XX XX with optional separators.
/// The middle group also accepts two digits ("+7 921 112233").
const PHONE_PATTERN: &str = r"\+7\s?\d{3}\s?\d{2,3}[\s-]?\d{2}[\s-]?\d{2}";

/// "Ivan A." / "Валерий А.": capitalized word, space, capital initial, period
const PERSON_PATTERN: &str = r"\p{Lu}\p{Ll}+\s\p{Lu}\.";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

fn person_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PERSON_PATTERN).expect("person pattern is valid"))
}

pub fn contains_phone(text: &str) -> bool {
    phone_regex().is_match(text)
}

pub fn contains_person_name(text: &str) -> bool {
    person_regex().is_match(text)
}

/// Transactions whose description contains a phone number
pub fn find_phone_transactions(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| contains_phone(&tx.description))
        .collect()
}

/// Transfers to private persons: a name-with-initial description booked under
/// `transfer_category`
pub fn find_person_transfers<'a>(
    transactions: &'a [Transaction],
    transfer_category: &str,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.category == transfer_category && contains_person_name(&tx.description))
        .collect()
}

/// Case-insensitive search in description or category
pub fn simple_search<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.to_lowercase();
    transactions
        .iter()
        .filter(|tx| {
            tx.description.to_lowercase().contains(&needle)
                || tx.category.to_lowercase().contains(&needle)
        })
        .collect()
}
