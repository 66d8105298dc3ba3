//! Home and events page handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use tally_core::{events_page, home_page, EventsPage, HomePage, Period};

use super::{parse_datetime_param, parse_period_param};

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Reference moment (YYYY-MM-DD HH:MM:SS, default now)
    pub datetime: Option<String>,
}

/// GET /api/home - Greeting, cards, top transactions and quotes
pub async fn home(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HomeQuery>, QueryRejection>,
) -> Result<Json<HomePage>, AppError> {
    let Query(params) = query?;
    let reference = parse_datetime_param(params.datetime.as_deref())?;
    let transactions = state.load_transactions().await?;

    let page = home_page(
        &transactions,
        reference,
        &state.settings,
        state.market.as_ref(),
    )
    .await;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Reference moment (YYYY-MM-DD HH:MM:SS, default now)
    pub datetime: Option<String>,
    /// Period tag: D, W, M (default), Y, ALL
    pub range: Option<String>,
}

/// GET /api/events - Expenses and income for a period, plus quotes
pub async fn events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsPage>, AppError> {
    let Query(params) = query?;
    let reference = parse_datetime_param(params.datetime.as_deref())?;
    let period = parse_period_param(params.range.as_deref(), Period::Month)?;
    let transactions = state.load_transactions().await?;

    let page = events_page(
        &transactions,
        reference,
        period,
        &state.settings,
        state.market.as_ref(),
    )
    .await;
    Ok(Json(page))
}
