//! Block explorer clients.
//!
//! # Data Flow
//! ```text
//! AppConfig section (base URL, timeout, API key)
//!     → http.rs (client with timeouts, status mapping, JSON decoding)
//!     → bitcoin.rs / ethereum.rs (endpoint shapes, response models)
//!     → units.rs (minor units → display amounts)
//!     → Balance / chain-specific transaction and block records
//! ```
//!
//! # Design Decisions
//! - One request per lookup, two for a Bitcoin lookup by height
//! - No retries, no caching: every error surfaces immediately
//! - Each chain implements the capability traits in types.rs, so adding a
//!   chain means adding one implementation
//! - API keys are never logged

pub mod bitcoin;
pub mod ethereum;
pub mod http;
pub mod types;
pub mod units;

pub use bitcoin::BitcoinExplorer;
pub use ethereum::EthereumExplorer;
pub use types::{
    AddressBalance, Balance, BlockLookup, Chain, ExplorerError, ExplorerResult, LookupStage,
    TransactionLookup, UnsupportedChain,
};
pub use units::Amount;
