//! Chain analytics: block explorer query library.
//!
//! # Architecture Overview
//!
//! ```text
//!     argv ──▶ cli (clap) ──▶ cli::dispatch ──▶ Chain enum
//!                                   │
//!                 ┌─────────────────┴──────────────────┐
//!                 ▼                                    ▼
//!        explorer::bitcoin                    explorer::ethereum
//!     (Blockstream REST API)              (Etherscan API + JSON-RPC proxy)
//!                 │                                    │
//!                 └──────────── explorer::http ────────┘
//!                          (timeouts, status, JSON)
//!
//!     Cross-cutting: config (TOML + env), observability (tracing)
//! ```

pub mod cli;
pub mod config;
pub mod explorer;
pub mod observability;

pub use config::schema::AppConfig;
pub use explorer::{BitcoinExplorer, Chain, EthereumExplorer, ExplorerError};
