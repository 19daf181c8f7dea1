//! Command-line surface.
//!
//! # Data Flow
//! ```text
//! argv
//!     → Cli (clap: subcommand + two positionals)
//!     → dispatch.rs (chain token → Chain, capability trait call)
//!     → rendered summary on stdout
//! ```

pub mod dispatch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use dispatch::{execute, DispatchError, Explorers};

#[derive(Debug, Parser)]
#[command(name = "chain-analytics", version)]
#[command(
    about = "Query address balances, transactions and blocks from public block explorers",
    long_about = "Query address balances, transactions and blocks from public block explorers.\n\n\
                  Supported chains: btc|bitcoin, eth|ethereum.\n\
                  Set ETHERSCAN_API_KEY for Ethereum; without it the public placeholder key is \
                  used, which is heavily rate-limited."
)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Query an address balance
    Balance {
        /// btc|bitcoin|eth|ethereum
        chain: String,
        address: String,
    },
    /// Query transaction details
    Tx {
        /// btc|bitcoin|eth|ethereum
        chain: String,
        txid: String,
    },
    /// Query block information
    Block {
        /// btc|bitcoin|eth|ethereum
        chain: String,
        /// Block height (Bitcoin), block number (Ethereum) or block hash (Bitcoin)
        height_or_hash: String,
    },
}
