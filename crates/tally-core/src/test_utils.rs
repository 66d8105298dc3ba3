//! Test utilities for tally-core
//!
//! A mock market-data server plus a small transaction fixture, used by unit
//! tests here and by the server and CLI tests (via the `test-utils` feature).

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::models::Transaction;

/// Mock currency-rate and stock-quote server
///
/// - `GET /latest?base=RUB` returns USD at 80 RUB and EUR at 100 RUB
/// - `GET /chart/{symbol}` knows AAPL, MSFT and GOOGL; anything else is 404
///   except `SLOW*` symbols, which answer 1.0 after 300ms
pub struct MockMarketServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockMarketServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/latest", get(handle_latest))
            .route("/chart/:symbol", get(handle_chart));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Value for `[market] currency_url`
    pub fn currency_url(&self) -> String {
        format!("{}/latest", self.url())
    }

    /// Value for `[market] stock_url`
    pub fn stock_url(&self) -> String {
        format!("{}/chart", self.url())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockMarketServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    base: Option<String>,
}

async fn handle_latest(Query(query): Query<LatestQuery>) -> (StatusCode, Json<Value>) {
    if query.base.as_deref() != Some("RUB") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported base" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "base": "RUB",
            "rates": { "USD": 0.0125, "EUR": 0.01, "CNY": 0.09 }
        })),
    )
}

async fn handle_chart(Path(symbol): Path<String>) -> (StatusCode, Json<Value>) {
    let price = match symbol.as_str() {
        "AAPL" => 150.12,
        "MSFT" => 410.5,
        "GOOGL" => 140.0,
        s if s.starts_with("SLOW") => {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            1.0
        }
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "chart": { "result": null, "error": "not found" } })),
            )
        }
    };
    (
        StatusCode::OK,
        Json(json!({
            "chart": {
                "result": [{ "meta": { "symbol": symbol, "regularMarketPrice": price } }],
                "error": null
            }
        })),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A few months of card activity: spending, refunds, salary, transfers
/// to people, mobile top-ups and cash withdrawals
pub fn sample_transactions() -> Vec<Transaction> {
    const CARD_A: &str = "4276 1234 5678 5814";
    const CARD_B: &str = "5536 9137 0000 7197";
    vec![
        Transaction::new(date(2023, 5, 3), 1262.0, "Supermarkets", "Магнит").with_card(CARD_A),
        Transaction::new(date(2023, 5, 15), 1000.0, "Food", "Пятёрочка").with_card(CARD_A),
        Transaction::new(date(2023, 5, 20), 5000.0, "Tech", "DNS").with_card(CARD_B),
        Transaction::new(date(2023, 5, 25), -50000.0, "Salary", "Зарплата"),
        Transaction::new(date(2023, 6, 1), 1712.0, "Supermarkets", "Лента").with_card(CARD_A),
        Transaction::new(date(2023, 6, 3), 300.0, "Mobile", "МТС +7 921 112233").with_card(CARD_B),
        Transaction::new(date(2023, 6, 4), 2500.0, "Transfers", "Валерий А."),
        Transaction::new(date(2023, 6, 10), 640.5, "Restaurants", "Coffee House").with_card(CARD_B),
        Transaction::new(date(2023, 6, 11), 3000.0, "Cash", "ATM withdrawal").with_card(CARD_A),
        Transaction::new(date(2023, 6, 12), -640.5, "Restaurants", "Refund Coffee House")
            .with_card(CARD_B),
        Transaction::new(date(2023, 6, 17), 870.0, "Transport", "Яндекс Такси").with_card(CARD_A),
        Transaction::new(date(2023, 6, 20), 1200.0, "Transfers", "Ivan A."),
        Transaction::new(date(2023, 6, 24), 4300.0, "Clothes", "Zara").with_card(CARD_B),
        Transaction::new(date(2023, 6, 25), -50000.0, "Salary", "Зарплата"),
        Transaction::new(date(2023, 6, 28), 199.0, "Digital", "Яндекс Плюс").with_card(CARD_B),
        Transaction::new(date(2023, 7, 2), 455.0, "Supermarkets", "Магнит").with_card(CARD_A),
        Transaction::new(date(2023, 7, 5), 500.0, "Mobile", "Билайн +7 903 123-45-67")
            .with_card(CARD_A),
    ]
}

/// `sample_transactions` as a spreadsheet export
pub const SAMPLE_CSV: &str = "\
Date,Amount,Category,Card,Description
03.05.2023 12:49:53,\"1 262,00\",Supermarkets,4276 1234 5678 5814,Магнит
15.05.2023,1000,Food,4276 1234 5678 5814,Пятёрочка
2023-05-20,5000,Tech,5536 9137 0000 7197,DNS
2023-05-25,-50000,Salary,,Зарплата
2023-06-01,1712,Supermarkets,4276 1234 5678 5814,Лента
";
