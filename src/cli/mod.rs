//! CLI interface for presale-admin

pub mod commands;
mod output;
pub mod prompt;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::DEFAULT_PAGE_SIZE;
use crate::presale::CountdownPreset;

#[derive(Parser)]
#[command(name = "presale-admin")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Manage a token presale from the terminal", long_about = None)]
pub struct Cli {
    /// Backend base URL, overrides the config file
    #[arg(long, global = true, env = "PRESALE_ADMIN_URL")]
    pub url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a presale-admin.toml configuration file
    Init,

    /// Log in as an operator
    Login {
        /// Operator email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "PRESALE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged in operator
    Whoami,

    /// Show participant and payment totals
    Dashboard {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Countdown timer settings
    Countdown {
        #[command(subcommand)]
        action: CountdownAction,
    },

    /// Live statistics shown on the presale page
    LiveStats {
        #[command(subcommand)]
        action: LiveStatsAction,
    },

    /// Supply, stage pricing and allocation
    Tokenomics {
        #[command(subcommand)]
        action: TokenomicsAction,
    },

    /// Presale stage and status
    Presale {
        #[command(subcommand)]
        action: PresaleAction,
    },

    /// Browse presale participants
    Participants {
        #[command(subcommand)]
        action: ParticipantsAction,
    },

    /// Browse recorded purchases
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Analytics overview
    Analytics {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Newsletter subscribers
    Newsletter {
        #[command(subcommand)]
        action: NewsletterAction,
    },

    /// Operator accounts
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
}

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Show the current countdown
    Show {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Update the countdown
    Set {
        /// Target as YYYY-MM-DD HH:MM:SS or YYYY-MM-DDTHH:MM (local time)
        #[arg(short, long, conflicts_with = "preset")]
        target: Option<String>,

        /// Target relative to now
        #[arg(long)]
        preset: Option<CountdownPreset>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Whether the countdown is displayed
        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum LiveStatsAction {
    /// Show the current figures
    Show {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Update the figures
    Set {
        #[arg(long)]
        participants: Option<u64>,

        /// Amount raised in USD
        #[arg(long)]
        raised: Option<f64>,

        /// Free-form allocation text, e.g. "45.2M"
        #[arg(long)]
        tokens_allocated: Option<String>,

        #[arg(long)]
        days_to_launch: Option<u32>,

        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum TokenomicsAction {
    /// Show supply, prices and allocation
    Show {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Update supply and prices
    Set {
        #[arg(long)]
        total_supply: Option<u64>,

        /// Stage price as STAGE=PRICE, e.g. --stage 2=0.0025 (repeatable)
        #[arg(long = "stage", value_parser = parse_stage_price)]
        stages: Vec<(usize, f64)>,

        #[arg(long)]
        public_price: Option<f64>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Preview the allocation for a supply without saving
    Preview {
        /// Total supply to split
        total_supply: u64,
    },
}

#[derive(Subcommand)]
pub enum PresaleAction {
    /// Public presale status
    Status,

    /// Switch the active presale stage
    Stage {
        /// Stage number, 1 to 5
        stage: u8,
    },

    /// Set the token price of one stage
    Price {
        /// Stage number, 1 to 5
        stage: u8,

        /// Price per token in USD
        price: f64,
    },

    /// Update purchase limits, hard cap and sale window
    Settings {
        #[arg(long)]
        min_purchase: Option<f64>,

        #[arg(long)]
        max_purchase: Option<f64>,

        #[arg(long)]
        hard_cap: Option<f64>,

        /// YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or YYYY-MM-DDTHH:MM
        #[arg(long)]
        start_date: Option<String>,

        /// Same formats as --start-date
        #[arg(long)]
        end_date: Option<String>,
    },

    /// Open the presale
    Open,

    /// Close the presale
    Close {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ParticipantsAction {
    /// List participants page by page
    List {
        #[command(flatten)]
        paging: PageArgs,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Search participants by wallet
    Search {
        query: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one participant
    Show { wallet: String },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List the transaction log page by page
    List {
        #[command(flatten)]
        paging: PageArgs,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Search transactions
    Search { query: String },

    /// Show one transaction
    Show { hash: String },
}

#[derive(Subcommand)]
pub enum NewsletterAction {
    /// List subscribers page by page
    List {
        #[command(flatten)]
        paging: PageArgs,

        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Export every subscriber
    Export {
        /// Write the export to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum AdminsAction {
    /// List operator accounts
    List,

    /// Create an operator account
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        role: Option<String>,

        /// Permission to grant (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Parse `STAGE=PRICE`
fn parse_stage_price(value: &str) -> Result<(usize, f64), String> {
    let (stage, price) = value
        .split_once('=')
        .ok_or_else(|| format!("expected STAGE=PRICE, got '{}'", value))?;
    let stage: usize = stage
        .trim()
        .parse()
        .map_err(|_| format!("invalid stage '{}'", stage))?;
    if !(1..=5).contains(&stage) {
        return Err(format!("stage must be between 1 and 5, got {}", stage));
    }
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| format!("invalid price '{}'", price))?;
    Ok((stage, price))
}
