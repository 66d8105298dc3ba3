//! Service handlers: cashback, round-up savings, search and matchers

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use tally_core::savings::DEFAULT_ROUND_UP_LIMIT;
use tally_core::{
    analyze_cashback, find_person_transfers, find_phone_transactions, investment_bank,
    simple_search, CategoryTotals, Transaction,
};

fn owned(found: Vec<&Transaction>) -> Vec<Transaction> {
    found.into_iter().cloned().collect()
}

#[derive(Debug, Deserialize)]
pub struct CashbackQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// GET /api/services/cashback - Cashback per category for one month
pub async fn cashback(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CashbackQuery>, QueryRejection>,
) -> Result<Json<CategoryTotals>, AppError> {
    let Query(params) = query?;
    let (Some(year), Some(month)) = (params.year, params.month) else {
        return Err(AppError::bad_request("year and month are required"));
    };
    let transactions = state.load_transactions().await?;

    let result = analyze_cashback(&transactions, &state.settings.cashback, year, month)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct InvestmentQuery {
    /// Target month (YYYY-MM)
    pub month: Option<String>,
    /// Rounding step (default 50)
    pub limit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct InvestmentResponse {
    pub investment: f64,
}

/// GET /api/services/investment - Round-up savings for one month
pub async fn investment(
    State(state): State<Arc<AppState>>,
    query: Result<Query<InvestmentQuery>, QueryRejection>,
) -> Result<Json<InvestmentResponse>, AppError> {
    let Query(params) = query?;
    let month = params
        .month
        .ok_or_else(|| AppError::bad_request("month is required (YYYY-MM)"))?;
    let limit = params.limit.unwrap_or(DEFAULT_ROUND_UP_LIMIT);
    let transactions = state.load_transactions().await?;

    let investment = investment_bank(&month, &transactions, limit)?;
    Ok(Json(InvestmentResponse { investment }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /api/services/search - Case-insensitive search in description or category
pub async fn search(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let Query(params) = query?;
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("query is required"))?;
    let transactions = state.load_transactions().await?;

    Ok(Json(owned(simple_search(&transactions, &query))))
}

/// GET /api/services/phones - Transactions mentioning a phone number
pub async fn phones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.load_transactions().await?;
    Ok(Json(owned(find_phone_transactions(&transactions))))
}

/// GET /api/services/transfers - Transfers to private persons
pub async fn transfers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.load_transactions().await?;
    Ok(Json(owned(find_person_transfers(
        &transactions,
        &state.settings.transfer_category,
    ))))
}
