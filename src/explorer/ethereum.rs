//! Ethereum explorer client (Etherscan-compatible API).
//!
//! Every request is a GET against the base URL with `module`/`action`
//! query parameters and the API key. Two response shapes are handled:
//!
//! ```text
//! account/block modules:  {"status": "1", "message": "OK", "result": ...}
//! proxy module (JSON-RPC): {"jsonrpc": "2.0", "id": 1, "result": {...} | null}
//! ```
//!
//! The API key travels in the query string, so request URLs are never
//! logged.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::EthereumConfig;
use crate::explorer::http;
use crate::explorer::types::{
    AddressBalance, Balance, BlockLookup, Chain, ExplorerError, ExplorerResult, TransactionLookup,
};
use crate::explorer::units::Amount;

/// Public placeholder key accepted by Etherscan. Heavily rate-limited and
/// unsuitable for production use.
pub const PLACEHOLDER_API_KEY: &str = "YourApiKeyToken";

/// Status-carrying envelope of the account and block modules.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

impl ApiEnvelope {
    /// The `result` payload, or the upstream message when `status != "1"`.
    fn into_result(self) -> ExplorerResult<Value> {
        if self.status == "1" {
            return Ok(self.result);
        }
        let message = match self.result.as_str() {
            Some(detail) if !detail.is_empty() && detail != self.message => {
                format!("{}: {}", self.message, detail)
            }
            _ => self.message,
        };
        Err(ExplorerError::Upstream(message))
    }
}

/// JSON-RPC error object returned by the proxy module.
#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Envelope of the proxy module.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
    /// Present when the explorer rejects the call before proxying it.
    #[serde(default)]
    message: Option<String>,
}

/// Transaction as returned by `eth_getTransactionByHash`.
///
/// Numeric fields are kept exactly as returned (hex quantities).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumTransaction {
    pub hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub from: String,
    /// `None` for contract creation.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas: String,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub confirmations: Option<String>,
}

impl fmt::Display for EthereumTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction:")?;
        writeln!(f, "  Hash: {}", self.hash)?;
        writeln!(f, "  From: {}", self.from)?;
        writeln!(f, "  To: {}", self.to.as_deref().unwrap_or("(contract creation)"))?;
        writeln!(f, "  Value: {} wei", self.value)?;
        writeln!(f, "  Gas: {}", self.gas)?;
        writeln!(f, "  Gas Price: {}", or_na(&self.gas_price))?;
        writeln!(f, "  Gas Used: {}", or_na(&self.gas_used))?;
        writeln!(f, "  Confirmations: {}", or_na(&self.confirmations))
    }
}

/// Block reward record from `getblockreward`. The reward is in wei, as
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumBlock {
    pub block_number: String,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub block_miner: String,
    #[serde(default)]
    pub block_reward: String,
    #[serde(default)]
    pub transaction_count: Option<String>,
    #[serde(default)]
    pub uncle_inclusion_reward: Option<String>,
}

impl fmt::Display for EthereumBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block:")?;
        writeln!(f, "  Block Number: {}", self.block_number)?;
        writeln!(f, "  Miner: {}", self.block_miner)?;
        writeln!(f, "  Block Reward: {}", self.block_reward)?;
        writeln!(f, "  Transaction Count: {}", or_na(&self.transaction_count))
    }
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("n/a")
}

/// Ethereum explorer client.
#[derive(Clone)]
pub struct EthereumExplorer {
    http: Client,
    base_url: Url,
    api_key: String,
    chain_id: Option<String>,
    timeout_secs: u64,
    /// Shared with clones so the placeholder warning fires once per client.
    placeholder_warned: Arc<AtomicBool>,
}

impl EthereumExplorer {
    /// Create a client from its configuration section and a resolved key.
    ///
    /// `api_key` is taken as given; `config.api_key` is not consulted.
    pub fn new(config: &EthereumConfig, api_key: impl Into<String>) -> ExplorerResult<Self> {
        Ok(Self {
            http: http::build_client(config.timeout_secs)?,
            base_url: http::parse_base_url(&config.base_url)?,
            api_key: api_key.into(),
            chain_id: config.chain_id.map(|id| id.to_string()),
            timeout_secs: config.timeout_secs,
            placeholder_warned: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether this client runs on the public placeholder key.
    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }

    /// True the first time it is asked on a placeholder-key client.
    fn placeholder_warning_due(&self) -> bool {
        self.uses_placeholder_key() && !self.placeholder_warned.swap(true, Ordering::Relaxed)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        module: &str,
        action: &str,
        params: &[(&str, &str)],
        what: &'static str,
    ) -> ExplorerResult<T> {
        let mut query: Vec<(&str, &str)> = vec![("module", module), ("action", action)];
        query.extend_from_slice(params);
        if let Some(chain_id) = &self.chain_id {
            query.push(("chainid", chain_id.as_str()));
        }
        query.push(("apikey", self.api_key.as_str()));

        tracing::debug!(chain = "ethereum", module, action, "Explorer request");
        if self.placeholder_warning_due() {
            tracing::warn!("ETHERSCAN_API_KEY not set, using the public placeholder key (heavily rate-limited)");
        }

        let request = self.http.get(self.base_url.clone()).query(&query);
        http::fetch_json(request, self.timeout_secs, what).await
    }
}

impl AddressBalance for EthereumExplorer {
    async fn balance(&self, address: &str) -> ExplorerResult<Balance> {
        let envelope: ApiEnvelope = self
            .call(
                "account",
                "balance",
                &[("address", address), ("tag", "latest")],
                "address",
            )
            .await?;

        let result = envelope.into_result()?;
        let wei = result
            .as_str()
            .ok_or_else(|| ExplorerError::InvalidAmount(result.to_string()))?;
        let amount = if wei == "0" {
            Amount::Wei(Default::default())
        } else {
            Amount::parse_wei(wei)?
        };

        Ok(Balance {
            chain: Chain::Ethereum,
            address: address.to_string(),
            amount,
        })
    }
}

impl TransactionLookup for EthereumExplorer {
    type Transaction = EthereumTransaction;

    async fn transaction(&self, hash: &str) -> ExplorerResult<EthereumTransaction> {
        let envelope: RpcEnvelope = self
            .call(
                "proxy",
                "eth_getTransactionByHash",
                &[("txhash", hash)],
                "transaction",
            )
            .await?;

        if let Some(error) = envelope.error {
            return Err(ExplorerError::Upstream(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        match envelope.result {
            Value::Null => Err(ExplorerError::NotFound("transaction")),
            Value::String(detail) => Err(ExplorerError::Upstream(match envelope.message {
                Some(message) if !message.is_empty() => format!("{message}: {detail}"),
                _ => detail,
            })),
            result => Ok(serde_json::from_value(result)?),
        }
    }
}

impl BlockLookup for EthereumExplorer {
    type Block = EthereumBlock;

    async fn block(&self, number: &str) -> ExplorerResult<EthereumBlock> {
        let envelope: ApiEnvelope = self
            .call("block", "getblockreward", &[("blockno", number)], "block")
            .await?;

        match envelope.into_result()? {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => Ok(serde_json::from_value(first)?),
                None => Err(ExplorerError::NotFound("block")),
            },
            Value::Null => Err(ExplorerError::NotFound("block")),
            Value::String(detail) => Err(ExplorerError::Upstream(detail)),
            single => Ok(serde_json::from_value(single)?),
        }
    }
}

impl fmt::Debug for EthereumExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthereumExplorer")
            .field("base_url", &self.base_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("placeholder_key", &self.uses_placeholder_key())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
