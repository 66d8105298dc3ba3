//! Home and events pages
//!
//! Pages combine a window of transactions with market quotes. Quotes are
//! fetched concurrently and never fail a page: an unavailable provider just
//! leaves its section empty.

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::aggregate::{
    card_summaries, rank_categories, round_cents, round_money, sum_by_category, top_n,
};
use crate::config::Settings;
use crate::market::{currency_rates_or_empty, stock_prices_or_empty, MarketData, Quotes};
use crate::models::{
    CategoryAmount, CategoryTotals, EventsPage, ExpenseSection, HomePage, IncomeSection, Period,
    TopTransaction, Transaction,
};
use crate::window::DateWindow;

/// Transactions listed on the home page
pub const TOP_TRANSACTIONS: usize = 5;
/// Categories listed before the rest is folded into "Other"
pub const MAIN_CATEGORIES: usize = 7;
/// Categories shown separately under "transfers and cash"
pub const TRANSFER_AND_CASH_CATEGORIES: [&str; 2] = ["Cash", "Transfers"];

/// Greeting for the hour of day
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        17..=22 => "Good evening",
        _ => "Good night",
    }
}

async fn quotes(settings: &Settings, market: &dyn MarketData) -> (Quotes, Quotes) {
    let (rates, prices) = tokio::join!(
        currency_rates_or_empty(market, &settings.currencies),
        stock_prices_or_empty(market, &settings.stocks),
    );
    (round_quotes(rates), round_quotes(prices))
}

fn round_quotes(quotes: Quotes) -> Quotes {
    quotes
        .into_iter()
        .map(|(code, price)| (code, round_cents(price)))
        .collect()
}

/// Home page at `reference`: month-to-date cards and top transactions, plus quotes
pub async fn home_page(
    transactions: &[Transaction],
    reference: NaiveDateTime,
    settings: &Settings,
    market: &dyn MarketData,
) -> HomePage {
    let window = DateWindow::select(reference.date(), Period::Month, transactions);
    let in_window = window.filter(transactions);
    debug!(
        from = %window.start,
        to = %window.end,
        transactions = in_window.len(),
        "Building home page"
    );

    let cards = card_summaries(in_window.iter().copied(), settings.card_cashback_rate);
    let top_transactions = top_n(in_window.iter().copied(), TOP_TRANSACTIONS)
        .into_iter()
        .map(TopTransaction::from)
        .collect();

    let (currency_rates, stock_prices) = quotes(settings, market).await;

    HomePage {
        greeting: greeting(reference.hour()).to_string(),
        cards,
        top_transactions,
        currency_rates,
        stock_prices,
    }
}

/// Events page for the `period` window ending at `reference`
pub async fn events_page(
    transactions: &[Transaction],
    reference: NaiveDateTime,
    period: Period,
    settings: &Settings,
    market: &dyn MarketData,
) -> EventsPage {
    let window = DateWindow::select(reference.date(), period, transactions);
    let in_window = window.filter(transactions);
    debug!(
        %period,
        from = %window.start,
        to = %window.end,
        transactions = in_window.len(),
        "Building events page"
    );

    let expense_totals = sum_by_category(in_window.iter().copied().filter(|tx| tx.is_spending()));
    // Income is negative; show it as positive amounts
    let income_totals: CategoryTotals =
        sum_by_category(in_window.iter().copied().filter(|tx| tx.is_income()))
            .into_iter()
            .map(|(category, amount)| (category, -amount))
            .collect();

    let (currency_rates, stock_prices) = quotes(settings, market).await;

    EventsPage {
        period: window.to_report_period(),
        expenses: ExpenseSection {
            total: round_money(expense_totals.values().sum()),
            main_categories: rank_categories(&expense_totals, MAIN_CATEGORIES),
            transfers_and_cash: transfers_and_cash(&expense_totals),
        },
        income: IncomeSection {
            total: round_money(income_totals.values().sum()),
            main_categories: rank_categories(&income_totals, MAIN_CATEGORIES),
        },
        currency_rates,
        stock_prices,
    }
}

fn transfers_and_cash(totals: &CategoryTotals) -> Vec<CategoryAmount> {
    let mut entries: Vec<CategoryAmount> = TRANSFER_AND_CASH_CATEGORIES
        .iter()
        .filter_map(|category| {
            totals.get(*category).map(|amount| CategoryAmount {
                category: category.to_string(),
                amount: round_money(*amount),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    entries
}
