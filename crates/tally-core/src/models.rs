//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A bank transaction
///
/// Amount convention: positive = money spent, negative = money received
/// (income, refunds, inbound transfers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    /// Card the payment was made with (card summaries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64, category: &str, description: &str) -> Self {
        Self {
            date,
            amount,
            category: category.to_string(),
            card_id: None,
            description: description.to_string(),
        }
    }

    pub fn with_card(mut self, card_id: &str) -> Self {
        self.card_id = Some(card_id.to_string());
        self
    }

    /// Money spent
    pub fn is_spending(&self) -> bool {
        self.amount > 0.0
    }

    /// Money received
    pub fn is_income(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Full English weekday name (Monday..Sunday)
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.date.weekday())
    }

    /// Month key in YYYY-MM form
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), self.date.month())
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Amount as it appears in a raw record: a JSON number or a spreadsheet string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// A transaction record before validation, as delivered by a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, alias = "Date", alias = "Дата")]
    pub date: Option<String>,
    #[serde(default, alias = "Amount", alias = "Сумма")]
    pub amount: Option<RawAmount>,
    #[serde(default, alias = "Category", alias = "Категория")]
    pub category: Option<String>,
    #[serde(default, alias = "card", alias = "Card", alias = "Номер карты")]
    pub card_id: Option<String>,
    #[serde(default, alias = "Description", alias = "Описание")]
    pub description: Option<String>,
}

impl RawTransaction {
    /// Validate required fields and parse the date and amount
    pub fn validate(&self) -> Result<Transaction> {
        let date_str = non_empty(self.date.as_deref())
            .ok_or_else(|| Error::MalformedInput("missing date".into()))?;
        let date = parse_date(date_str)?;

        let amount = match &self.amount {
            Some(RawAmount::Number(n)) => *n,
            Some(RawAmount::Text(s)) => parse_amount(s)?,
            None => return Err(Error::MalformedInput("missing amount".into())),
        };
        if !amount.is_finite() {
            return Err(Error::MalformedInput(format!("amount is not finite: {}", amount)));
        }

        let category = non_empty(self.category.as_deref())
            .ok_or_else(|| Error::MalformedInput("missing category".into()))?;

        Ok(Transaction {
            date,
            amount,
            category: category.to_string(),
            card_id: non_empty(self.card_id.as_deref()).map(|s| s.to_string()),
            description: self.description.clone().unwrap_or_default().trim().to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a transaction date in any of the accepted spreadsheet formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let date_formats = [
        "%Y-%m-%d", // 2023-05-15
        "%d.%m.%Y", // 15.05.2023
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S", // 2023-05-15 12:30:00
        "%Y-%m-%dT%H:%M:%S", // 2023-05-15T12:30:00
        "%d.%m.%Y %H:%M:%S", // 15.05.2023 12:30:00
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(Error::InvalidTransactionDate(s.to_string()))
}

/// Parse an amount string, tolerating spaces, thousands commas and decimal commas
///
/// A comma is a thousands separator when a `.` is also present, when there
/// are several commas, or when a lone comma is followed by exactly three
/// digits (`"12,500"` is 12500). Otherwise a lone comma is a decimal comma
/// (`"1712,50"`).
pub fn parse_amount(s: &str) -> Result<f64> {
    let malformed = || Error::MalformedInput(format!("Unable to parse amount: {}", s));
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '₽' && *c != '$')
        .collect();

    let normalized = match cleaned.matches(',').count() {
        0 => cleaned,
        1 if !cleaned.contains('.') && !is_thousands_grouping(&cleaned) => {
            cleaned.replace(',', ".")
        }
        _ => {
            let integer_part = cleaned.split('.').next().unwrap_or_default();
            if !is_thousands_grouping(integer_part) {
                return Err(malformed());
            }
            cleaned.replace(',', "")
        }
    };

    normalized.parse::<f64>().map_err(|_| malformed())
}

/// `"1,234,567"`: every group after the first has exactly three digits
fn is_thousands_grouping(integer_part: &str) -> bool {
    let mut groups = integer_part.split(',');
    let lead_ok = groups.next().is_some_and(|lead| {
        let digits = lead.trim_start_matches(['-', '+']);
        (1..=3).contains(&digits.len())
            && !digits.starts_with('0')
            && digits.chars().all(|c| c.is_ascii_digit())
    });
    lead_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Window policy for selecting transactions relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    All,
    /// From the first day of the month ~3 months back up to the reference date
    Trailing90Days,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
            Self::Year => "Y",
            Self::All => "ALL",
            Self::Trailing90Days => "90D",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "D" => Ok(Self::Day),
            "W" => Ok(Self::Week),
            "M" => Ok(Self::Month),
            "Y" => Ok(Self::Year),
            "ALL" => Ok(Self::All),
            "90D" => Ok(Self::Trailing90Days),
            _ => Err(Error::InvalidPeriod(format!(
                "{} (valid: D, W, M, Y, ALL)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report period info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: String,
    pub to: String,
}

/// Mapping of category (or other label) to an amount
pub type CategoryTotals = BTreeMap<String, f64>;

/// Monthly spending in one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub period: ReportPeriod,
    /// YYYY-MM -> total spent
    pub monthly_totals: CategoryTotals,
}

/// Average spend on one weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAverage {
    pub weekday: String,
    pub average: f64,
}

/// Average spending per weekday
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayReport {
    pub period: ReportPeriod,
    /// Monday first; weekdays without spending are omitted
    pub average_by_weekday: Vec<WeekdayAverage>,
}

/// Work-day vs. weekend spending comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkWeekendReport {
    pub period: ReportPeriod,
    pub work_day_avg: f64,
    pub weekend_avg: f64,
    pub ratio: f64,
}

/// Spending totals for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub period: ReportPeriod,
    pub total_spent: f64,
    pub by_category: CategoryTotals,
    /// YYYY-MM -> total spent
    pub monthly: CategoryTotals,
}

/// Per-card spending on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSummary {
    pub card_last4: String,
    pub total_spent: f64,
    pub cashback: f64,
}

/// A transaction as listed in "top transactions"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTransaction {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl From<&Transaction> for TopTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date.format("%d.%m.%Y").to_string(),
            amount: tx.amount,
            category: tx.category.clone(),
            description: tx.description.clone(),
        }
    }
}

/// Home page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub greeting: String,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: CategoryTotals,
    pub stock_prices: CategoryTotals,
}

/// A category with its (rounded) amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Expenses block of the events page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSection {
    pub total: f64,
    pub main_categories: Vec<CategoryAmount>,
    pub transfers_and_cash: Vec<CategoryAmount>,
}

/// Income block of the events page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSection {
    pub total: f64,
    pub main_categories: Vec<CategoryAmount>,
}

/// Events page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsPage {
    pub period: ReportPeriod,
    pub expenses: ExpenseSection,
    pub income: IncomeSection,
    pub currency_rates: CategoryTotals,
    pub stock_prices: CategoryTotals,
}
