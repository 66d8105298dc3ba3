//! Home and events page commands

use anyhow::Result;
use chrono::NaiveDateTime;
use tally_core::{
    events_page, home_page, CategoryAmount, CategoryTotals, MarketData, Period, Settings,
    Transaction,
};

use super::{print_json, truncate};

pub async fn cmd_home(
    transactions: &[Transaction],
    reference: NaiveDateTime,
    settings: &Settings,
    market: &dyn MarketData,
    json: bool,
) -> Result<()> {
    let page = home_page(transactions, reference, settings, market).await;
    if json {
        return print_json(&page);
    }

    println!();
    println!("👋 {}!", page.greeting);
    println!("   As of {}", reference.format("%Y-%m-%d %H:%M"));

    println!();
    println!("💳 Cards (month to date)");
    if page.cards.is_empty() {
        println!("   No card spending this month.");
    } else {
        println!("   {:8} │ {:>12} │ {:>10}", "Card", "Spent", "Cashback");
        println!("   ─────────┼──────────────┼───────────");
        for card in &page.cards {
            println!(
                "   *{:7} │ {:>12.2} │ {:>10.2}",
                card.card_last4, card.total_spent, card.cashback
            );
        }
    }

    println!();
    println!("🔝 Top transactions");
    if page.top_transactions.is_empty() {
        println!("   No transactions this month.");
    } else {
        for tx in &page.top_transactions {
            println!(
                "   {} │ {:>12.2} │ {:15} │ {}",
                tx.date,
                tx.amount,
                truncate(&tx.category, 15),
                truncate(&tx.description, 30)
            );
        }
    }

    print_quotes(&page.currency_rates, &page.stock_prices);
    Ok(())
}

pub async fn cmd_events(
    transactions: &[Transaction],
    reference: NaiveDateTime,
    period: Period,
    settings: &Settings,
    market: &dyn MarketData,
    json: bool,
) -> Result<()> {
    let page = events_page(transactions, reference, period, settings, market).await;
    if json {
        return print_json(&page);
    }

    println!();
    println!("📅 Events ({})", period);
    println!("   Period: {} to {}", page.period.from, page.period.to);
    println!("   ─────────────────────────────────────────");

    println!();
    println!("💸 Expenses: {:.0}", page.expenses.total);
    print_categories(&page.expenses.main_categories);
    if !page.expenses.transfers_and_cash.is_empty() {
        println!("   Transfers and cash:");
        print_categories(&page.expenses.transfers_and_cash);
    }

    println!();
    println!("💰 Income: {:.0}", page.income.total);
    print_categories(&page.income.main_categories);

    print_quotes(&page.currency_rates, &page.stock_prices);
    Ok(())
}

fn print_categories(categories: &[CategoryAmount]) {
    for entry in categories {
        println!(
            "   {:25} │ {:>12.0}",
            truncate(&entry.category, 25),
            entry.amount
        );
    }
}

fn print_quotes(rates: &CategoryTotals, prices: &CategoryTotals) {
    if !rates.is_empty() {
        println!();
        println!("💱 Currency rates");
        for (code, rate) in rates {
            println!("   {:6} {:>10.2}", code, rate);
        }
    }
    if !prices.is_empty() {
        println!();
        println!("📈 Stock prices");
        for (symbol, price) in prices {
            println!("   {:6} {:>10.2}", symbol, price);
        }
    }
}
