//! Bitcoin explorer client (Blockstream-compatible REST API).
//!
//! # Endpoints
//! - `GET /address/{addr}`: funded/spent totals, chain and mempool
//! - `GET /tx/{txid}`: full transaction
//! - `GET /block/{hash}`: block header metadata
//! - `GET /block-height/{height}`: block hash as plain text
//!
//! All monetary fields are integer satoshis.

use std::fmt;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::BitcoinConfig;
use crate::explorer::http;
use crate::explorer::types::{
    AddressBalance, Balance, BlockLookup, Chain, ExplorerError, ExplorerResult, LookupStage,
    TransactionLookup,
};
use crate::explorer::units::Amount;

/// Funded/spent totals for one set of transactions (confirmed or mempool).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressStats {
    #[serde(alias = "funded")]
    pub funded_txo_sum: i64,
    #[serde(alias = "spent")]
    pub spent_txo_sum: i64,
    pub tx_count: u64,
}

/// `GET /address/{addr}` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressInfo {
    pub address: String,
    pub chain_stats: AddressStats,
    pub mempool_stats: AddressStats,
}

impl AddressInfo {
    /// Confirmed plus pending funded, minus confirmed plus pending spent.
    ///
    /// Totals that do not fit in an `i64` are reported as `InvalidAmount`.
    pub fn balance_sats(&self) -> ExplorerResult<i64> {
        let funded = self
            .chain_stats
            .funded_txo_sum
            .checked_add(self.mempool_stats.funded_txo_sum);
        let spent = self
            .chain_stats
            .spent_txo_sum
            .checked_add(self.mempool_stats.spent_txo_sum);

        funded
            .zip(spent)
            .and_then(|(funded, spent)| funded.checked_sub(spent))
            .ok_or_else(|| {
                ExplorerError::InvalidAmount(format!(
                    "funded {} + {}, spent {} + {}",
                    self.chain_stats.funded_txo_sum,
                    self.mempool_stats.funded_txo_sum,
                    self.chain_stats.spent_txo_sum,
                    self.mempool_stats.spent_txo_sum,
                ))
            })
    }
}

/// Output being spent by an input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrevOut {
    #[serde(default)]
    pub scriptpubkey: String,
    #[serde(default)]
    pub scriptpubkey_type: String,
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxInput {
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub vout: u32,
    /// Absent for coinbase inputs.
    #[serde(default)]
    pub prevout: Option<PrevOut>,
    #[serde(default)]
    pub scriptsig: String,
    #[serde(default)]
    pub witness: Vec<String>,
    #[serde(default)]
    pub is_coinbase: bool,
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxOutput {
    #[serde(default)]
    pub scriptpubkey: String,
    #[serde(default)]
    pub scriptpubkey_type: String,
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

/// Confirmation status of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TxStatus {
    pub confirmed: bool,
    pub block_height: Option<u64>,
    pub block_hash: Option<String>,
    pub block_time: Option<u64>,
}

/// `GET /tx/{txid}` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BitcoinTransaction {
    pub txid: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub weight: u64,
    #[serde(default)]
    pub fee: u64,
    #[serde(default, rename = "vin")]
    pub inputs: Vec<TxInput>,
    #[serde(default, rename = "vout")]
    pub outputs: Vec<TxOutput>,
    #[serde(default)]
    pub status: TxStatus,
}

impl fmt::Display for BitcoinTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction:")?;
        writeln!(f, "  TxID: {}", self.txid)?;
        writeln!(f, "  Size: {} bytes", self.size)?;
        writeln!(f, "  Fee: {} satoshis", self.fee)?;
        writeln!(f, "  Inputs: {}", self.inputs.len())?;
        writeln!(f, "  Outputs: {}", self.outputs.len())?;
        writeln!(f, "  Confirmed: {}", self.status.confirmed)?;
        if self.status.confirmed {
            match self.status.block_height {
                Some(height) => writeln!(f, "  Block Height: {}", height)?,
                None => writeln!(f, "  Block Height: n/a")?,
            }
        }
        Ok(())
    }
}

/// `GET /block/{hash}` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BitcoinBlock {
    pub id: String,
    pub height: u64,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub tx_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub weight: u64,
    #[serde(default)]
    pub merkle_root: String,
    #[serde(default)]
    pub previousblockhash: Option<String>,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub bits: u64,
}

impl fmt::Display for BitcoinBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block:")?;
        writeln!(f, "  Hash: {}", self.id)?;
        writeln!(f, "  Height: {}", self.height)?;
        writeln!(f, "  Timestamp: {}", self.timestamp)?;
        writeln!(f, "  Size: {} bytes", self.size)?;
        writeln!(f, "  Weight: {}", self.weight)?;
        writeln!(f, "  Tx Count: {}", self.tx_count)
    }
}

/// Bitcoin explorer client.
#[derive(Clone)]
pub struct BitcoinExplorer {
    http: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl BitcoinExplorer {
    /// Create a client from its configuration section.
    pub fn new(config: &BitcoinConfig) -> ExplorerResult<Self> {
        Ok(Self {
            http: http::build_client(config.timeout_secs)?,
            base_url: http::parse_base_url(&config.base_url)?,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Fetch block header metadata by hash.
    pub async fn block_by_hash(&self, hash: &str) -> ExplorerResult<BitcoinBlock> {
        self.get_json(&["block", hash], "block").await
    }

    /// Resolve `height` to a hash, then fetch that block.
    ///
    /// Issues exactly two requests on success. Failures are tagged with the
    /// stage that failed.
    pub async fn block_by_height(&self, height: u64) -> ExplorerResult<BitcoinBlock> {
        let hash = self
            .resolve_height(height)
            .await
            .map_err(|e| stage_error(height, LookupStage::ResolveHash, e))?;

        tracing::debug!(height, hash = %hash, "Resolved block height");

        self.block_by_hash(&hash)
            .await
            .map_err(|e| stage_error(height, LookupStage::FetchBlock, e))
    }

    /// `GET /block-height/{height}`. The body is an opaque hash string.
    async fn resolve_height(&self, height: u64) -> ExplorerResult<String> {
        let height = height.to_string();
        let url = http::endpoint(&self.base_url, &["block-height", &height])?;
        tracing::debug!(chain = "bitcoin", endpoint = "block-height", "Explorer request");

        let body = http::fetch_text(self.http.get(url), self.timeout_secs, "block").await?;
        let hash = body.trim();
        if hash.is_empty() {
            return Err(ExplorerError::NotFound("block"));
        }
        Ok(hash.to_string())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &'static str,
    ) -> ExplorerResult<T> {
        let url = http::endpoint(&self.base_url, segments)?;
        tracing::debug!(chain = "bitcoin", endpoint = segments[0], "Explorer request");

        http::fetch_json(self.http.get(url), self.timeout_secs, what).await
    }
}

fn stage_error(height: u64, stage: LookupStage, source: ExplorerError) -> ExplorerError {
    ExplorerError::BlockByHeight {
        height,
        stage,
        source: Box::new(source),
    }
}

/// Heights are all-digit tokens; anything else is treated as a hash.
fn parse_height(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl AddressBalance for BitcoinExplorer {
    async fn balance(&self, address: &str) -> ExplorerResult<Balance> {
        let info: AddressInfo = self.get_json(&["address", address], "address").await?;
        Ok(Balance {
            chain: Chain::Bitcoin,
            address: address.to_string(),
            amount: Amount::Satoshis(info.balance_sats()?),
        })
    }
}

impl TransactionLookup for BitcoinExplorer {
    type Transaction = BitcoinTransaction;

    async fn transaction(&self, txid: &str) -> ExplorerResult<BitcoinTransaction> {
        self.get_json(&["tx", txid], "transaction").await
    }
}

impl BlockLookup for BitcoinExplorer {
    type Block = BitcoinBlock;

    async fn block(&self, height_or_hash: &str) -> ExplorerResult<BitcoinBlock> {
        match parse_height(height_or_hash) {
            Some(height) => self.block_by_height(height).await,
            None => self.block_by_hash(height_or_hash).await,
        }
    }
}

impl fmt::Debug for BitcoinExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitcoinExplorer")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
