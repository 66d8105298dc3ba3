//! Service commands: cashback, round-up savings, search and matchers

use anyhow::{Context, Result};
use tally_core::export::write_transactions;
use tally_core::{
    analyze_cashback, find_person_transfers, find_phone_transactions, investment_bank,
    simple_search, CashbackPolicy, Transaction,
};

use super::{print_json, truncate};
use crate::cli::OutputArgs;

pub fn cmd_cashback(
    transactions: &[Transaction],
    policy: &CashbackPolicy,
    year: i32,
    month: u32,
    json: bool,
) -> Result<()> {
    let cashback = analyze_cashback(transactions, policy, year, month)?;
    if json {
        return print_json(&cashback);
    }

    println!();
    println!("🎁 Cashback for {}-{:02}", year, month);
    println!("   ─────────────────────────────────────────");
    if cashback.is_empty() {
        println!("   No transactions in this month.");
        return Ok(());
    }

    let mut ranked: Vec<_> = cashback.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, amount) in ranked {
        println!("   {:25} │ {:>10.2}", truncate(category, 25), amount);
    }
    println!("   Total: {:.2}", cashback.values().sum::<f64>());

    Ok(())
}

pub fn cmd_invest(transactions: &[Transaction], month: &str, limit: f64) -> Result<()> {
    let saved = investment_bank(month, transactions, limit)?;

    println!();
    println!("🐷 Round-up savings for {}", month);
    println!("   Step: {}", limit);
    println!("   Saved: {:.2}", saved);

    Ok(())
}

pub fn cmd_search(transactions: &[Transaction], query: &str, output: &OutputArgs) -> Result<()> {
    let found = simple_search(transactions, query);
    emit_transactions(&format!("🔍 Matches for \"{}\"", query), &found, output)
}

pub fn cmd_phones(transactions: &[Transaction], output: &OutputArgs) -> Result<()> {
    let found = find_phone_transactions(transactions);
    emit_transactions("📱 Transactions with phone numbers", &found, output)
}

pub fn cmd_transfers(
    transactions: &[Transaction],
    transfer_category: &str,
    output: &OutputArgs,
) -> Result<()> {
    let found = find_person_transfers(transactions, transfer_category);
    emit_transactions("👤 Transfers to people", &found, output)
}

/// Print (table or JSON) and optionally save a transaction list
fn emit_transactions(title: &str, found: &[&Transaction], output: &OutputArgs) -> Result<()> {
    if output.json {
        print_json(found)?;
    } else {
        print_transactions(title, found);
    }

    if let Some(path) = &output.output {
        let count = write_transactions(found, path)
            .with_context(|| format!("Failed to save transactions to {}", path.display()))?;
        println!("💾 Saved {} transactions to {}", count, path.display());
    }
    Ok(())
}

fn print_transactions(title: &str, found: &[&Transaction]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");
    if found.is_empty() {
        println!("   Nothing found.");
        return;
    }

    println!(
        "   {:10} │ {:>10} │ {:15} │ Description",
        "Date", "Amount", "Category"
    );
    println!("   ───────────┼────────────┼─────────────────┼────────────");
    for tx in found {
        println!(
            "   {:10} │ {:>10.2} │ {:15} │ {}",
            tx.date.to_string(),
            tx.amount,
            truncate(&tx.category, 15),
            truncate(&tx.description, 40)
        );
    }
    println!("   {} transactions", found.len());
}
