//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod health;
pub mod pages;
pub mod reports;
pub mod services;

// Re-export all handlers for use in router
pub use health::*;
pub use pages::*;
pub use reports::*;
pub use services::*;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tally_core::Period;

use crate::AppError;

/// Parse a `datetime` query value; defaults to now
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date (midnight).
pub(crate) fn parse_datetime_param(value: Option<&str>) -> Result<NaiveDateTime, AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(Local::now().naive_local());
    };

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            AppError::bad_request("Invalid datetime format (use YYYY-MM-DD HH:MM:SS)")
        })
}

/// Parse a `date` query value; defaults to today
pub(crate) fn parse_date_param(value: Option<&str>) -> Result<NaiveDate, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("Invalid date format (use YYYY-MM-DD)")),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse a period tag (`D`, `W`, `M`, `Y`, `ALL`), falling back to `default`
pub(crate) fn parse_period_param(value: Option<&str>, default: Period) -> Result<Period, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(tag) => Ok(tag.parse::<Period>()?),
        None => Ok(default),
    }
}
