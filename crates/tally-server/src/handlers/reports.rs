//! Spending report handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use tally_core::models::{CategoryReport, SpendingSummary, WeekdayReport, WorkWeekendReport};
use tally_core::{
    category_spending_report, spending_summary, weekday_spending_report,
    work_weekend_spending_report, Period,
};

use super::{parse_date_param, parse_period_param};

#[derive(Debug, Deserialize)]
pub struct CategoryReportQuery {
    pub category: Option<String>,
    /// Reference date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

/// GET /api/reports/category - Monthly spending in one category over ~3 months
pub async fn report_category(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CategoryReportQuery>, QueryRejection>,
) -> Result<Json<CategoryReport>, AppError> {
    let Query(params) = query?;
    let category = params
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("category is required"))?;
    let reference = parse_date_param(params.date.as_deref())?;
    let transactions = state.load_transactions().await?;

    Ok(Json(category_spending_report(
        &transactions,
        category.trim(),
        reference,
    )))
}

#[derive(Debug, Deserialize)]
pub struct ReportDateQuery {
    /// Reference date (YYYY-MM-DD, default today)
    pub date: Option<String>,
}

/// GET /api/reports/weekdays - Average spending per weekday over ~3 months
pub async fn report_weekdays(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportDateQuery>, QueryRejection>,
) -> Result<Json<WeekdayReport>, AppError> {
    let Query(params) = query?;
    let reference = parse_date_param(params.date.as_deref())?;
    let transactions = state.load_transactions().await?;

    Ok(Json(weekday_spending_report(&transactions, reference)))
}

/// GET /api/reports/work-weekend - Work-day vs. weekend spending over ~3 months
pub async fn report_work_weekend(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportDateQuery>, QueryRejection>,
) -> Result<Json<WorkWeekendReport>, AppError> {
    let Query(params) = query?;
    let reference = parse_date_param(params.date.as_deref())?;
    let transactions = state.load_transactions().await?;

    Ok(Json(work_weekend_spending_report(&transactions, reference)))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Reference date (YYYY-MM-DD, default today)
    pub date: Option<String>,
    /// Period tag: D, W, M (default), Y, ALL
    pub range: Option<String>,
}

/// GET /api/reports/summary - Spending totals for a period
pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SpendingSummary>, AppError> {
    let Query(params) = query?;
    let reference = parse_date_param(params.date.as_deref())?;
    let period = parse_period_param(params.range.as_deref(), Period::Month)?;
    let transactions = state.load_transactions().await?;

    Ok(Json(spending_summary(&transactions, reference, period)))
}
