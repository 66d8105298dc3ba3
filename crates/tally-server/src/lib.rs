//! Tally Web Server
//!
//! Axum-based REST API for the Tally transaction analyzer.
//!
//! Every request loads its own copy of the transactions from the configured
//! source; no mutable state is shared between requests. The only shared
//! piece is the market-data provider, which may cache quotes internally.
//!
//! Security features:
//! - Read-only API (GET only)
//! - Restrictive CORS policy
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::rejection::QueryRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::{
    CachedMarketData, HttpMarketData, MarketData, Settings, Transaction, TransactionSource,
};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub source: Arc<dyn TransactionSource>,
    pub market: Arc<dyn MarketData>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        market: Arc<dyn MarketData>,
        settings: Settings,
    ) -> Self {
        Self {
            source,
            market,
            settings,
        }
    }

    /// State backed by the HTTP market-data provider with a TTL cache
    pub fn with_http_market(
        source: Arc<dyn TransactionSource>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        let http = HttpMarketData::new(&settings.market)?;
        let market = Arc::new(CachedMarketData::new(http, settings.market.cache_ttl));
        Ok(Self::new(source, market, settings))
    }

    /// Load this request's copy of the transactions
    pub async fn load_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        let source = self.source.clone();
        let transactions = tokio::task::spawn_blocking(move || source.load()).await??;
        Ok(transactions)
    }
}

/// Create the application router
pub fn create_router(state: AppState, config: ServerConfig) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Pages
        .route("/home", get(handlers::home))
        .route("/events", get(handlers::events))
        // Services
        .route("/services/cashback", get(handlers::cashback))
        .route("/services/investment", get(handlers::investment))
        .route("/services/search", get(handlers::search))
        .route("/services/phones", get(handlers::phones))
        .route("/services/transfers", get(handlers::transfers))
        // Reports
        .route("/reports/category", get(handlers::report_category))
        .route("/reports/weekdays", get(handlers::report_weekdays))
        .route("/reports/work-weekend", get(handlers::report_work_weekend))
        .route("/reports/summary", get(handlers::report_summary));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(state, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    state: AppState,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    // Surface an unreadable source at startup; requests retry the load
    match state.load_transactions().await {
        Ok(transactions) => info!("Loaded {} transactions", transactions.len()),
        Err(e) => {
            warn!("⚠️  Transaction source not readable at startup: {}", e.message);
        }
    }

    let app = create_router(state, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn with_status(status: StatusCode, msg: String) -> Self {
        Self {
            status,
            message: msg,
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<tally_core::Error> for AppError {
    fn from(err: tally_core::Error) -> Self {
        use tally_core::Error;

        match err {
            Error::InvalidPeriod(_) | Error::InvalidLimit(_) | Error::MalformedInput(_) => {
                Self::with_status(StatusCode::BAD_REQUEST, err.to_string())
            }
            Error::InvalidTransactionDate(_) => {
                Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            Error::ExternalServiceUnavailable(_) => {
                Self::with_status(StatusCode::BAD_GATEWAY, err.to_string())
            }
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}
