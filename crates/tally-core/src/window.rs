//! Date windows relative to a reference date

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Period, ReportPeriod, Transaction};

/// Inclusive date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Select the window for `period` ending at `reference`.
    ///
    /// `transactions` is only consulted for `Period::All`, whose start is the
    /// earliest date present in the data.
    pub fn select(reference: NaiveDate, period: Period, transactions: &[Transaction]) -> Self {
        let start = match period {
            Period::Day => reference,
            Period::Week => {
                reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()))
            }
            Period::Month => first_of_month(reference),
            Period::Year => first_of_year(reference),
            Period::All => transactions
                .iter()
                .map(|tx| tx.date)
                .min()
                .unwrap_or(reference),
            Period::Trailing90Days => {
                first_of_month(first_of_month(reference) - Duration::days(90))
            }
        };

        Self {
            start: start.min(reference),
            end: reference,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Transactions dated inside the window, in input order
    pub fn filter<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|tx| self.contains(tx.date))
            .collect()
    }

    pub fn to_report_period(&self) -> ReportPeriod {
        ReportPeriod {
            from: self.start.to_string(),
            to: self.end.to_string(),
        }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    date.with_day(1).and_then(|d| d.with_month(1)).unwrap_or(date)
}

/// Parse a `YYYY-MM` month into (year, month)
pub fn parse_month(s: &str) -> crate::Result<(i32, u32)> {
    let s = s.trim();
    let invalid = || crate::Error::InvalidPeriod(format!("{} (expected YYYY-MM)", s));

    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(d: NaiveDate) -> Transaction {
        Transaction::new(d, 100.0, "Food", "")
    }

    #[test]
    fn test_day_window() {
        let w = DateWindow::select(date(2023, 5, 25), Period::Day, &[]);
        assert_eq!(w.start, date(2023, 5, 25));
        assert_eq!(w.end, date(2023, 5, 25));
    }

    #[test]
    fn test_week_window_starts_monday() {
        // 2023-05-25 is a Thursday
        let w = DateWindow::select(date(2023, 5, 25), Period::Week, &[]);
        assert_eq!(w.start, date(2023, 5, 22));

        // A Monday starts its own week
        let w = DateWindow::select(date(2023, 5, 22), Period::Week, &[]);
        assert_eq!(w.start, date(2023, 5, 22));
    }

    #[test]
    fn test_month_and_year_windows() {
        let w = DateWindow::select(date(2023, 5, 25), Period::Month, &[]);
        assert_eq!(w.start, date(2023, 5, 1));
        let w = DateWindow::select(date(2023, 5, 25), Period::Year, &[]);
        assert_eq!(w.start, date(2023, 1, 1));
    }

    #[test]
    fn test_all_window_uses_earliest_date() {
        let data = vec![tx(date(2022, 3, 4)), tx(date(2021, 11, 30)), tx(date(2023, 1, 1))];
        let w = DateWindow::select(date(2023, 5, 25), Period::All, &data);
        assert_eq!(w.start, date(2021, 11, 30));
        assert_eq!(w.end, date(2023, 5, 25));
    }

    #[test]
    fn test_all_window_never_inverts() {
        let w = DateWindow::select(date(2023, 5, 25), Period::All, &[]);
        assert_eq!(w.start, w.end);

        let data = vec![tx(date(2024, 1, 1))];
        let w = DateWindow::select(date(2023, 5, 25), Period::All, &data);
        assert!(w.start <= w.end);
    }

    #[test]
    fn test_trailing_90_days() {
        // 2023-07-01 - 90 days = 2023-04-02 -> 2023-04-01
        let w = DateWindow::select(date(2023, 7, 15), Period::Trailing90Days, &[]);
        assert_eq!(w.start, date(2023, 4, 1));
        assert_eq!(w.end, date(2023, 7, 15));

        // Crosses a year boundary
        let w = DateWindow::select(date(2024, 2, 10), Period::Trailing90Days, &[]);
        assert_eq!(w.start, date(2023, 11, 1));
    }

    #[test]
    fn test_filter_is_inclusive() {
        let data = vec![
            tx(date(2023, 4, 30)),
            tx(date(2023, 5, 1)),
            tx(date(2023, 5, 25)),
            tx(date(2023, 5, 26)),
        ];
        let w = DateWindow::select(date(2023, 5, 25), Period::Month, &data);
        let filtered = w.filter(&data);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|t| w.contains(t.date)));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2023-06").unwrap(), (2023, 6));
        assert!(parse_month("2023-13").is_err());
        assert!(parse_month("June").is_err());
    }
}
