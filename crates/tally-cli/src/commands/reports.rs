//! Report command implementations
//!
//! Every report is computed first, then printed (table or JSON), then
//! saved only when `--output` is given.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tally_core::{
    category_spending_report, spending_summary, weekday_spending_report,
    work_weekend_spending_report, Period, Transaction,
};

use super::{print_json, save_report, truncate};
use crate::cli::OutputArgs;

/// Print as JSON or through `table`, then save when asked
fn emit<T, F>(name: &str, report: &T, output: &OutputArgs, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if output.json {
        print_json(report)?;
    } else {
        table(report);
    }

    if let Some(target) = &output.output {
        save_report(name, report, target)?;
    }
    Ok(())
}

pub fn cmd_report_category(
    transactions: &[Transaction],
    category: &str,
    reference: NaiveDate,
    output: &OutputArgs,
) -> Result<()> {
    let report = category_spending_report(transactions, category, reference);

    emit("category", &report, output, |report| {
        println!();
        println!("🏷️  Spending on {}", report.category);
        println!(
            "   Period: {} to {}",
            report.period.from, report.period.to
        );
        println!("   ─────────────────────────────");
        if report.monthly_totals.is_empty() {
            println!("   No spending in this category.");
            return;
        }
        for (month, total) in &report.monthly_totals {
            println!("   {:8} │ {:>12.0}", month, total);
        }
    })
}

pub fn cmd_report_weekdays(
    transactions: &[Transaction],
    reference: NaiveDate,
    output: &OutputArgs,
) -> Result<()> {
    let report = weekday_spending_report(transactions, reference);

    emit("weekdays", &report, output, |report| {
        println!();
        println!("📆 Average spending by weekday");
        println!(
            "   Period: {} to {}",
            report.period.from, report.period.to
        );
        println!("   ─────────────────────────────");
        if report.average_by_weekday.is_empty() {
            println!("   No spending found in this period.");
            return;
        }
        for day in &report.average_by_weekday {
            println!("   {:10} │ {:>10.0}", day.weekday, day.average);
        }
    })
}

pub fn cmd_report_work_weekend(
    transactions: &[Transaction],
    reference: NaiveDate,
    output: &OutputArgs,
) -> Result<()> {
    let report = work_weekend_spending_report(transactions, reference);

    emit("work_weekend", &report, output, |report| {
        println!();
        println!("🏖️  Work days vs. weekends");
        println!(
            "   Period: {} to {}",
            report.period.from, report.period.to
        );
        println!("   ─────────────────────────────");
        println!("   Work-day average: {:>10.0}", report.work_day_avg);
        println!("   Weekend average:  {:>10.0}", report.weekend_avg);
        println!("   Weekend / work:   {:>10.2}", report.ratio);
    })
}

pub fn cmd_report_summary(
    transactions: &[Transaction],
    reference: NaiveDate,
    period: Period,
    output: &OutputArgs,
) -> Result<()> {
    let summary = spending_summary(transactions, reference, period);

    emit("summary", &summary, output, |summary| {
        println!();
        println!("📊 Spending Summary ({})", period);
        println!(
            "   Period: {} to {}",
            summary.period.from, summary.period.to
        );
        println!("   ─────────────────────────────────────────────────────────────");

        if summary.by_category.is_empty() {
            println!("   No spending found in this period.");
            return;
        }

        println!("   Total: {:.0}", summary.total_spent);
        println!();
        println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
        println!("   ──────────────────────────┼────────────┼────────");

        let mut ranked: Vec<_> = summary.by_category.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1));
        for (category, amount) in ranked {
            let share = if summary.total_spent > 0.0 {
                amount / summary.total_spent * 100.0
            } else {
                0.0
            };
            println!(
                "   {:25} │ {:>10.0} │ {:>5.1}%",
                truncate(category, 25),
                amount,
                share
            );
        }

        if summary.monthly.len() > 1 {
            println!();
            println!("   By month:");
            for (month, total) in &summary.monthly {
                println!("   {:8} │ {:>10.0}", month, total);
            }
        }
    })
}
