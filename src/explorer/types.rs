//! Chain identifiers, capability traits and error definitions.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use thiserror::Error;

use crate::explorer::units::Amount;

/// Supported chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Bitcoin,
    Ethereum,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Bitcoin => f.write_str("bitcoin"),
            Chain::Ethereum => f.write_str("ethereum"),
        }
    }
}

/// Chain token that matched none of the supported chains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported chain: {0}")]
pub struct UnsupportedChain(pub String);

impl FromStr for Chain {
    type Err = UnsupportedChain;

    /// Case-sensitive: `btc`/`bitcoin` and `eth`/`ethereum` only.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "btc" | "bitcoin" => Ok(Chain::Bitcoin),
            "eth" | "ethereum" => Ok(Chain::Ethereum),
            other => Err(UnsupportedChain(other.to_string())),
        }
    }
}

/// Stage of a height lookup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    /// Height to hash resolution.
    ResolveHash,
    /// Block fetch by the resolved hash.
    FetchBlock,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStage::ResolveHash => f.write_str("resolve-hash"),
            LookupStage::FetchBlock => f.write_str("fetch-block"),
        }
    }
}

/// Errors that can occur while querying an explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with a non-success HTTP status.
    #[error("explorer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Amount field that is not a decimal integer.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// Explorer reported a logical failure in its envelope.
    #[error("explorer error: {0}")]
    Upstream(String),

    /// The requested object does not exist upstream.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Two-stage height lookup failed.
    #[error("block lookup by height {height} failed at {stage}: {source}")]
    BlockByHeight {
        height: u64,
        stage: LookupStage,
        #[source]
        source: Box<ExplorerError>,
    },

    /// Configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Result type for explorer operations.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Balance of one address, in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub chain: Chain,
    pub address: String,
    pub amount: Amount,
}

impl Balance {
    /// Major-unit rendering, e.g. `0.00012345 BTC`.
    pub fn display_amount(&self) -> String {
        self.amount.to_string()
    }
}

/// Address balance lookup.
pub trait AddressBalance {
    fn balance(&self, address: &str) -> impl Future<Output = ExplorerResult<Balance>> + Send;
}

/// Transaction lookup by id or hash.
pub trait TransactionLookup {
    /// Chain-specific transaction record; `Display` renders the summary.
    type Transaction: fmt::Display;

    fn transaction(
        &self,
        id: &str,
    ) -> impl Future<Output = ExplorerResult<Self::Transaction>> + Send;
}

/// Block lookup by height, number or hash.
pub trait BlockLookup {
    /// Chain-specific block record; `Display` renders the summary.
    type Block: fmt::Display;

    fn block(
        &self,
        height_or_hash: &str,
    ) -> impl Future<Output = ExplorerResult<Self::Block>> + Send;
}
