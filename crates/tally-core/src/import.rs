//! Transaction sources: spreadsheet exports, JSON dumps and in-memory lists
//!
//! Every source validates all records up front. The first malformed record
//! aborts the load; nothing downstream ever sees a half-valid dataset.

use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{RawAmount, RawTransaction, Transaction};

/// Anything that can produce the full list of transactions
pub trait TransactionSource: Send + Sync {
    fn load(&self) -> Result<Vec<Transaction>>;
}

/// Columns we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Amount,
    Category,
    Card,
    Description,
}

/// Match a header cell, case-insensitively, in English or Russian
fn column_for(header: &str) -> Option<Column> {
    match header.trim().to_lowercase().as_str() {
        "date" | "дата" | "дата операции" => Some(Column::Date),
        "amount" | "сумма" | "сумма операции" => Some(Column::Amount),
        "category" | "категория" => Some(Column::Category),
        "card" | "card_id" | "номер карты" => Some(Column::Card),
        "description" | "описание" => Some(Column::Description),
        _ => None,
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Default)]
struct ColumnMap {
    date: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    card: Option<usize>,
    description: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut map = Self::default();
        for (i, header) in headers.iter().enumerate() {
            let slot = match column_for(header) {
                Some(Column::Date) => &mut map.date,
                Some(Column::Amount) => &mut map.amount,
                Some(Column::Category) => &mut map.category,
                Some(Column::Card) => &mut map.card,
                Some(Column::Description) => &mut map.description,
                None => continue,
            };
            // First matching column wins
            slot.get_or_insert(i);
        }

        let mut missing = Vec::new();
        if map.date.is_none() {
            missing.push("date");
        }
        if map.amount.is_none() {
            missing.push("amount");
        }
        if map.category.is_none() {
            missing.push("category");
        }
        if !missing.is_empty() {
            return Err(Error::MalformedInput(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(map)
    }

    fn read(&self, record: &StringRecord) -> RawTransaction {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        RawTransaction {
            date: cell(self.date),
            amount: cell(self.amount).map(RawAmount::Text),
            category: cell(self.category),
            card_id: cell(self.card),
            description: cell(self.description),
        }
    }
}

/// Spreadsheet exports use either commas or semicolons
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Parse CSV rows into raw records without validating them
pub fn parse_csv_raw<R: Read>(mut reader: R) -> Result<Vec<RawTransaction>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let content = content.trim_start_matches('\u{feff}');

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(sniff_delimiter(content))
        .from_reader(content.as_bytes());

    let columns = ColumnMap::from_headers(rdr.headers()?)?;
    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(columns.read(&record));
    }
    Ok(records)
}

/// Parse and validate CSV data
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    validate_all(parse_csv_raw(reader)?)
}

/// Parse and validate a JSON array of transaction objects
pub fn parse_json(content: &str) -> Result<Vec<Transaction>> {
    let records: Vec<RawTransaction> = serde_json::from_str(content)?;
    validate_all(records)
}

/// Validate every record, stopping at the first bad one
pub fn validate_all(records: Vec<RawTransaction>) -> Result<Vec<Transaction>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record.validate().map_err(|e| {
                // Row numbers are 1-based, after the header
                warn!(row = i + 1, error = %e, "Rejecting transaction record");
                e
            })
        })
        .collect()
}

/// Transactions from a CSV file
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for CsvSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        let file = fs::File::open(&self.path)?;
        let transactions = parse_csv(file)?;
        debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "Loaded CSV transactions"
        );
        Ok(transactions)
    }
}

/// Transactions from a JSON file holding an array of records
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for JsonSource {
    fn load(&self) -> Result<Vec<Transaction>> {
        let content = fs::read_to_string(&self.path)?;
        let transactions = parse_json(&content)?;
        debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "Loaded JSON transactions"
        );
        Ok(transactions)
    }
}

/// Transactions held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    transactions: Vec<Transaction>,
}

impl MemorySource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl TransactionSource for MemorySource {
    fn load(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }
}

/// Pick a file source from the extension (`.csv` or `.json`)
pub fn source_for_path(path: &Path) -> Result<Box<dyn TransactionSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("csv") => Ok(Box::new(CsvSource::new(path))),
        Some("json") => Ok(Box::new(JsonSource::new(path))),
        _ => Err(Error::MalformedInput(format!(
            "unsupported transaction file {} (expected .csv or .json)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SAMPLE_CSV;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn test_parse_sample_csv() {
        let txs = parse_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(txs.len(), 5);

        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2023, 5, 3).unwrap());
        assert_eq!(txs[0].amount, 1262.0);
        assert_eq!(txs[0].card_id.as_deref(), Some("4276 1234 5678 5814"));
        assert_eq!(txs[0].description, "Магнит");

        assert_eq!(txs[3].amount, -50000.0);
        assert!(txs[3].card_id.is_none());
    }

    #[test]
    fn test_headers_are_case_insensitive_and_reorderable() {
        let csv = "DESCRIPTION,category,AMOUNT,card_id,date\nLaptop,Tech,5000,1111222233334444,2023-05-20\n";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].category, "Tech");
        assert_eq!(txs[0].amount, 5000.0);
        assert_eq!(txs[0].description, "Laptop");
    }

    #[test]
    fn test_semicolon_export_with_russian_headers() {
        let csv = "\u{feff}Дата операции;Сумма операции;Категория;Номер карты;Описание\n\
                   01.06.2023 10:15:00;1712,50;Супермаркеты;*5814;Лента\n\
                   ;;;;\n";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, 1712.5);
        assert_eq!(txs[0].category, "Супермаркеты");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,description\n2023-05-20,Laptop\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        match err {
            Error::MalformedInput(msg) => {
                assert!(msg.contains("amount"));
                assert!(msg.contains("category"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_aborts_load() {
        let csv = "date,amount,category\n2023-05-20,10,Food\n2023-13-45,10,Food\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransactionDate(_)));
    }

    #[test]
    fn test_parse_json_with_russian_keys() {
        let json = r#"[
            {"Дата": "2023-05-15", "Сумма": 1000, "Категория": "Еда", "Описание": "Покупка в Пятерочке"},
            {"date": "2023-06-02", "amount": "2 000,00", "category": "Переводы", "card": "1234"}
        ]"#;
        let txs = parse_json(json).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].category, "Еда");
        assert_eq!(txs[1].amount, 2000.0);
        assert_eq!(txs[1].card_id.as_deref(), Some("1234"));
    }

    #[test]
    fn test_parse_json_not_an_array() {
        assert!(matches!(
            parse_json(r#"{"date": "2023-05-15"}"#).unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_file_sources() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("ops.csv");
        fs::write(&csv_path, SAMPLE_CSV).unwrap();
        let txs = source_for_path(&csv_path).unwrap().load().unwrap();
        assert_eq!(txs.len(), 5);

        let json_path = dir.path().join("ops.json");
        let mut file = fs::File::create(&json_path).unwrap();
        write!(file, r#"[{{"date": "2023-06-01", "amount": 1712, "category": "Food"}}]"#).unwrap();
        let txs = source_for_path(&json_path).unwrap().load().unwrap();
        assert_eq!(txs.len(), 1);

        assert!(source_for_path(&dir.path().join("ops.xlsx")).is_err());
        assert!(matches!(
            CsvSource::new(dir.path().join("missing.csv")).load().unwrap_err(),
            Error::Io(_)
        ));
    }

    #[test]
    fn test_memory_source() {
        let tx = Transaction::new(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), 10.0, "Food", "");
        let source = MemorySource::new(vec![tx.clone()]);
        assert_eq!(source.load().unwrap(), vec![tx]);
    }
}
