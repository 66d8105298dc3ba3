//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tally_core::{source_for_path, Settings, StaticMarketData, TransactionSource};
use tally_server::AppState;

pub async fn cmd_serve(
    data: Option<&Path>,
    settings: Settings,
    host: &str,
    port: u16,
    offline: bool,
) -> Result<()> {
    let path = data.context(
        "No transaction file. Pass --data FILE, set TALLY_DATA, or set [data] path in the config",
    )?;

    println!("🚀 Starting Tally web server...");
    println!("   Data: {}", path.display());
    println!("   Listening: http://{}:{}", host, port);
    if offline {
        println!("   ⚠️  Market data DISABLED (--offline)");
    } else {
        println!(
            "   Market data cached for {}s",
            settings.market.cache_ttl.as_secs()
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let source: Arc<dyn TransactionSource> = Arc::from(source_for_path(path)?);
    let state = if offline {
        AppState::new(source, Arc::new(StaticMarketData::empty()), settings)
    } else {
        AppState::with_http_market(source, settings)?
    };

    tally_server::serve(state, host, port).await?;

    Ok(())
}
