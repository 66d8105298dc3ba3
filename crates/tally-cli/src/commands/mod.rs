//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (settings, loading, argument parsing, output)
//! - `pages` - Home and events pages
//! - `reports` - Spending report commands
//! - `serve` - Web server command
//! - `services` - Cashback, round-up savings, search and matchers

pub mod core;
pub mod pages;
pub mod reports;
pub mod serve;
pub mod services;

// Re-export command functions for main.rs
pub use core::*;
pub use pages::*;
pub use reports::*;
pub use serve::*;
pub use services::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
