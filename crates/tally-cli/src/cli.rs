//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Analyze bank card transactions
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance transaction analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction file (.csv or .json)
    ///
    /// Overrides `[data] path` from the config file and the TALLY_DATA
    /// environment variable.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file layered over the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip currency and stock lookups (pages show no quotes)
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the home page: greeting, cards, top transactions, quotes
    Home {
        /// Reference moment (YYYY-MM-DD HH:MM:SS, default now)
        #[arg(long)]
        datetime: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show expenses and income for a period
    Events {
        /// Reference moment (YYYY-MM-DD HH:MM:SS, default now)
        #[arg(long)]
        datetime: Option<String>,

        /// Period: D, W, M, Y, ALL
        #[arg(long, default_value = "M")]
        range: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Cashback per category for one month
    Cashback {
        /// Year (e.g. 2023)
        #[arg(long)]
        year: i32,

        /// Month number (1-12)
        #[arg(long)]
        month: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Spare change from rounding each purchase up
    Invest {
        /// Target month (YYYY-MM)
        #[arg(long)]
        month: String,

        /// Rounding step
        #[arg(long, default_value = "50")]
        limit: f64,
    },

    /// Search descriptions and categories
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Transactions mentioning a phone number
    Phones {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Transfers to private persons
    Transfers {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate spending reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

/// Output options shared by listing and report commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also save the result to FILE (a directory gets a timestamped name)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Monthly spending in one category over the last three months
    Category {
        /// Category name
        category: String,

        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Average spending per weekday over the last three months
    Weekdays {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Work-day vs. weekend spending over the last three months
    WorkWeekend {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Spending totals by category and month
    Summary {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Period: D, W, M, Y, ALL
        #[arg(long, default_value = "M")]
        range: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}
