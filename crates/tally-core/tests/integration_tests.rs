//! Integration tests for tally-core
//!
//! These tests exercise the full load → analyze → persist workflow.

use chrono::NaiveDate;
use tally_core::{
    analyze_cashback, category_spending_report, default_report_filename, events_page,
    find_person_transfers, find_phone_transactions, home_page, import::parse_csv,
    investment_bank, simple_search, spending_summary, weekday_spending_report, write_json,
    CashbackPolicy, Error, MemorySource, Period, Settings, StaticMarketData, TransactionSource,
};

/// Helper to create a spreadsheet export covering May-July 2023
/// - Two cards, salary, a refund
/// - One mobile top-up with a phone number
/// - Two transfers to people, one company transfer
fn operations_csv() -> &'static str {
    r#"Date,Amount,Category,Card,Description
2023-05-15,1000,Food,*5814,Покупка в Пятерочке
2023-05-20,5000,Tech,*7197,Покупка ноутбука
2023-05-25,-60000,Salary,,Зарплата
2023-06-01,1712,Supermarkets,*5814,Лента
2023-06-01,300,Mobile,*7197,Я МТС +7 921 112233
2023-06-02,2000,Transfers,,Валерий А.
2023-06-03,4500,Transfers,,ООО Ромашка
2023-06-10,"1 250,40",Restaurants,*7197,Coffee House
2023-06-12,-250.4,Restaurants,*7197,Refund Coffee House
2023-06-17,999,Transport,*5814,Такси
2023-07-01,1200,Transfers,,Ivan A.
2023-07-08,640,Food,*5814,Пятёрочка
2023-07-09,160,Food,*5814,Пятёрочка"#
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Services
// =============================================================================

#[test]
fn test_services_over_csv() {
    let transactions = parse_csv(operations_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(transactions.len(), 13);

    // Flat 5% over May
    let cashback = analyze_cashback(&transactions, &CashbackPolicy::default(), 2023, 5).unwrap();
    assert_eq!(cashback["Food"], 50.0);
    assert_eq!(cashback["Tech"], 250.0);
    assert_eq!(cashback["Salary"], -3000.0);

    // 1712 -> 1750, 300 -> 300, 2000 -> 2000, 4500 -> 4500, 1250.40 -> 1300, 999 -> 1000
    let saved = investment_bank("2023-06", &transactions, 50.0).unwrap();
    assert_eq!(saved, 88.6);

    let phones = find_phone_transactions(&transactions);
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].category, "Mobile");

    let people = find_person_transfers(&transactions, "Transfers");
    let names: Vec<&str> = people.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Валерий А.", "Ivan A."]);

    let found = simple_search(&transactions, "coffee");
    assert_eq!(found.len(), 2);
}

#[test]
fn test_malformed_csv_aborts() {
    let bad = "Date,Amount,Category\n2023-06-01,10,Food\n31/02/2023,10,Food\n";
    assert!(matches!(
        parse_csv(bad.as_bytes()).unwrap_err(),
        Error::InvalidTransactionDate(_)
    ));
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_reports_over_csv() {
    let transactions = parse_csv(operations_csv().as_bytes()).unwrap();
    let reference = date(2023, 7, 15);

    let food = category_spending_report(&transactions, "Food", reference);
    assert_eq!(food.period.from, "2023-04-01");
    assert_eq!(food.monthly_totals["2023-05"], 1000.0);
    assert_eq!(food.monthly_totals["2023-07"], 800.0);
    assert!(!food.monthly_totals.contains_key("2023-06"));

    let weekdays = weekday_spending_report(&transactions, reference);
    assert!(weekdays.average_by_weekday.len() <= 7);

    let summary = spending_summary(&transactions, reference, Period::Year);
    assert_eq!(summary.period.from, "2023-01-01");
    // Spending only; salary and the refund are excluded
    assert_eq!(summary.total_spent, 18761.0);
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_pages_with_static_market() {
    let source = MemorySource::new(parse_csv(operations_csv().as_bytes()).unwrap());
    let transactions = source.load().unwrap();
    let settings = Settings {
        currencies: vec!["USD".into(), "EUR".into()],
        stocks: vec!["AAPL".into()],
        ..Settings::default()
    };
    let market = StaticMarketData::new(
        [("USD".to_string(), 80.0)].into(),
        [("AAPL".to_string(), 150.12)].into(),
    );
    let reference = date(2023, 6, 30).and_hms_opt(18, 30, 0).unwrap();

    let home = home_page(&transactions, reference, &settings, &market).await;
    assert_eq!(home.greeting, "Good evening");
    assert_eq!(home.top_transactions[0].amount, 4500.0);
    assert_eq!(home.cards.len(), 2);
    // EUR was not available: omitted, not zero
    assert_eq!(home.currency_rates.len(), 1);

    let events = events_page(&transactions, reference, Period::Month, &settings, &market).await;
    assert_eq!(events.expenses.transfers_and_cash.len(), 1);
    assert_eq!(events.expenses.transfers_and_cash[0].amount, 6500.0);
    assert_eq!(events.income.total, 250.0);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_report_saved_only_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let transactions = parse_csv(operations_csv().as_bytes()).unwrap();

    let report = weekday_spending_report(&transactions, date(2023, 7, 15));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let now = date(2023, 7, 15).and_hms_opt(10, 0, 0).unwrap();
    let path = dir.path().join(default_report_filename("weekdays", now));
    write_json(&report, &path).unwrap();

    assert!(path.ends_with("report_weekdays_20230715_100000.json"));
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["period"]["to"], "2023-07-15");
}
