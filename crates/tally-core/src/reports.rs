//! Spending reports over date windows
//!
//! Every report here looks at spending only (positive amounts) and rounds
//! to whole currency units on the way out.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::aggregate::{mean_by, round_cents, round_money, sum_by, sum_by_category};
use crate::models::{
    weekday_name, CategoryReport, CategoryTotals, Period, SpendingSummary, Transaction,
    WeekdayAverage, WeekdayReport, WorkWeekendReport,
};
use crate::window::DateWindow;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn spending_in<'a>(window: &DateWindow, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
    window
        .filter(transactions)
        .into_iter()
        .filter(|tx| tx.is_spending())
        .collect()
}

fn rounded(totals: CategoryTotals) -> CategoryTotals {
    totals
        .into_iter()
        .map(|(k, v)| (k, round_money(v)))
        .collect()
}

/// Monthly spending in `category` over the trailing ~3 months
pub fn category_spending_report(
    transactions: &[Transaction],
    category: &str,
    reference: NaiveDate,
) -> CategoryReport {
    let window = DateWindow::select(reference, Period::Trailing90Days, transactions);
    let matching: Vec<&Transaction> = spending_in(&window, transactions)
        .into_iter()
        .filter(|tx| tx.category == category)
        .collect();

    debug!(category, matches = matching.len(), "Category spending report");

    CategoryReport {
        category: category.to_string(),
        period: window.to_report_period(),
        monthly_totals: rounded(sum_by(matching, |tx| tx.month_key())),
    }
}

/// Average spending per weekday over the trailing ~3 months.
/// Weekdays without spending are omitted.
pub fn weekday_spending_report(transactions: &[Transaction], reference: NaiveDate) -> WeekdayReport {
    let window = DateWindow::select(reference, Period::Trailing90Days, transactions);
    let spending = spending_in(&window, transactions);

    // Key by days-from-Monday so output is Monday first
    let means = mean_by(spending, |tx| tx.date.weekday().num_days_from_monday());
    let average_by_weekday = means
        .into_iter()
        .filter_map(|(day, avg)| {
            WEEKDAYS.get(day as usize).map(|wd| WeekdayAverage {
                weekday: weekday_name(*wd).to_string(),
                average: round_money(avg),
            })
        })
        .collect();

    WeekdayReport {
        period: window.to_report_period(),
        average_by_weekday,
    }
}

/// Average spending on work days vs. weekends over the trailing ~3 months
pub fn work_weekend_spending_report(
    transactions: &[Transaction],
    reference: NaiveDate,
) -> WorkWeekendReport {
    let window = DateWindow::select(reference, Period::Trailing90Days, transactions);
    let means = mean_by(spending_in(&window, transactions), |tx| tx.is_weekend());

    let work_day_avg = means.get(&false).copied().unwrap_or(0.0);
    let weekend_avg = means.get(&true).copied().unwrap_or(0.0);
    let ratio = if work_day_avg > 0.0 {
        weekend_avg / work_day_avg
    } else {
        0.0
    };

    WorkWeekendReport {
        period: window.to_report_period(),
        work_day_avg: round_money(work_day_avg),
        weekend_avg: round_money(weekend_avg),
        ratio: round_cents(ratio),
    }
}

/// Total, per-category and per-month spending for a period
pub fn spending_summary(
    transactions: &[Transaction],
    reference: NaiveDate,
    period: Period,
) -> SpendingSummary {
    let window = DateWindow::select(reference, period, transactions);
    let spending = spending_in(&window, transactions);
    let total: f64 = spending.iter().map(|tx| tx.amount).sum();

    SpendingSummary {
        period: window.to_report_period(),
        total_spent: round_money(total),
        by_category: rounded(sum_by_category(spending.iter().copied())),
        monthly: rounded(sum_by(spending.iter().copied(), |tx| tx.month_key())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One transaction per day for 2023-01-01..=2023-07-31
    fn daily_transactions() -> Vec<Transaction> {
        let start = date(2023, 1, 1);
        (0..212)
            .map(|i| {
                let category = if i % 3 == 0 { "Transport" } else { "Food" };
                Transaction::new(
                    start + Duration::days(i),
                    100.0 + (i % 30) as f64,
                    category,
                    "",
                )
            })
            .collect()
    }

    #[test]
    fn test_category_report_months() {
        let report = category_spending_report(&daily_transactions(), "Food", date(2023, 7, 15));
        assert_eq!(report.category, "Food");
        assert_eq!(report.period.from, "2023-04-01");
        assert_eq!(report.period.to, "2023-07-15");
        let months: Vec<&str> = report.monthly_totals.keys().map(|s| s.as_str()).collect();
        assert_eq!(months, vec!["2023-04", "2023-05", "2023-06", "2023-07"]);
    }

    #[test]
    fn test_category_report_unknown_category_is_empty() {
        let report = category_spending_report(&daily_transactions(), "Travel", date(2023, 7, 15));
        assert!(report.monthly_totals.is_empty());
    }

    #[test]
    fn test_weekday_report_has_at_most_seven_groups() {
        let report = weekday_spending_report(&daily_transactions(), date(2023, 7, 15));
        assert_eq!(report.average_by_weekday.len(), 7);
        assert_eq!(report.average_by_weekday[0].weekday, "Monday");
        assert_eq!(report.average_by_weekday[6].weekday, "Sunday");
    }

    #[test]
    fn test_weekday_report_omits_absent_days() {
        // 2023-07-10 Monday, 2023-07-12 Wednesday
        let data = vec![
            Transaction::new(date(2023, 7, 10), 100.0, "Food", ""),
            Transaction::new(date(2023, 7, 12), 300.0, "Food", ""),
            Transaction::new(date(2023, 7, 12), 100.0, "Food", ""),
            Transaction::new(date(2023, 7, 13), -500.0, "Salary", ""),
        ];
        let report = weekday_spending_report(&data, date(2023, 7, 15));
        assert_eq!(
            report.average_by_weekday,
            vec![
                WeekdayAverage {
                    weekday: "Monday".into(),
                    average: 100.0
                },
                WeekdayAverage {
                    weekday: "Wednesday".into(),
                    average: 200.0
                },
            ]
        );
    }

    #[test]
    fn test_work_weekend_report() {
        let report = work_weekend_spending_report(&daily_transactions(), date(2023, 7, 15));
        assert!(report.work_day_avg > 0.0);
        assert!(report.weekend_avg > 0.0);
        assert!(report.ratio >= 0.0 && report.ratio <= 2.0);
    }

    #[test]
    fn test_work_weekend_report_without_work_days() {
        // 2023-07-08 and 2023-07-09 are a weekend
        let data = vec![
            Transaction::new(date(2023, 7, 8), 100.0, "Food", ""),
            Transaction::new(date(2023, 7, 9), 300.0, "Food", ""),
        ];
        let report = work_weekend_spending_report(&data, date(2023, 7, 15));
        assert_eq!(report.work_day_avg, 0.0);
        assert_eq!(report.weekend_avg, 200.0);
        assert_eq!(report.ratio, 0.0);
    }

    #[test]
    fn test_spending_summary_excludes_income() {
        let data = vec![
            Transaction::new(date(2023, 5, 1), -1000.0, "Salary", ""),
            Transaction::new(date(2023, 5, 15), 5000.0, "Food", ""),
            Transaction::new(date(2023, 5, 20), 3000.0, "Transport", ""),
            Transaction::new(date(2023, 6, 1), 2000.0, "Transfers", ""),
        ];
        let summary = spending_summary(&data, date(2023, 5, 25), Period::Month);
        assert_eq!(summary.total_spent, 8000.0);
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.monthly["2023-05"], 8000.0);
    }
}
