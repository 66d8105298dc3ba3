//! Report and transaction persistence
//!
//! Computing a report never writes anything. Callers that want a copy on
//! disk pass the finished value here as a separate step.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::MalformedInput(format!(
                "cannot tell export format of {} (use .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// `report_<name>_<YYYYmmdd_HHMMSS>.json`
pub fn default_report_filename(name: &str, now: NaiveDateTime) -> String {
    format!("report_{}_{}.json", name, now.format("%Y%m%d_%H%M%S"))
}

/// Write any serializable value as pretty JSON (UTF-8, non-ASCII kept as is)
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    info!(path = %path.display(), "Saved report");
    Ok(())
}

/// Write transactions as CSV with a `date,amount,category,card_id,description` header
pub fn write_transactions_csv<'a, I>(transactions: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "amount", "category", "card_id", "description"])?;

    let mut count = 0;
    for tx in transactions {
        writer.write_record([
            tx.date.to_string(),
            tx.amount.to_string(),
            tx.category.clone(),
            tx.card_id.clone().unwrap_or_default(),
            tx.description.clone(),
        ])?;
        count += 1;
    }
    writer.flush()?;

    info!(path = %path.display(), count, "Exported transactions");
    Ok(count)
}

/// Write transactions in the format implied by `path`
pub fn write_transactions(transactions: &[&Transaction], path: &Path) -> Result<usize> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => write_transactions_csv(transactions.iter().copied(), path),
        ExportFormat::Json => {
            write_json(transactions, path)?;
            Ok(transactions.len())
        }
    }
}
