//! Minor-unit amounts and their major-unit rendering.
//!
//! Rendering is done with integer arithmetic so no precision is lost on
//! large balances.

use std::fmt;

use alloy::primitives::U256;

use crate::explorer::types::{ExplorerError, ExplorerResult};

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: i64 = 100_000_000;

/// Decimal places shown for ether amounts.
const ETH_DISPLAY_DECIMALS: u32 = 6;

/// Amount in the smallest unit of its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Satoshis(i64),
    Wei(U256),
}

impl Amount {
    /// Parse a decimal wei string as returned by the explorer.
    pub fn parse_wei(raw: &str) -> ExplorerResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ExplorerError::InvalidAmount(raw.to_string()));
        }
        U256::from_str_radix(trimmed, 10)
            .map(Amount::Wei)
            .map_err(|_| ExplorerError::InvalidAmount(raw.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Amount::Satoshis(sats) => {
                let sign = if sats < 0 { "-" } else { "" };
                let abs = sats.unsigned_abs();
                let per = SATS_PER_BTC as u64;
                write!(f, "{sign}{}.{:08} BTC", abs / per, abs % per)
            }
            Amount::Wei(wei) if wei.is_zero() => f.write_str("0 ETH"),
            Amount::Wei(wei) => {
                // Round half-up to the displayed precision.
                let step = U256::from(10u64).pow(U256::from(18 - ETH_DISPLAY_DECIMALS));
                let scaled = wei.saturating_add(step / U256::from(2u64)) / step;
                let per_eth = U256::from(10u64).pow(U256::from(ETH_DISPLAY_DECIMALS));
                let whole = scaled / per_eth;
                let frac = (scaled % per_eth).to::<u64>();
                write!(f, "{whole}.{frac:06} ETH")
            }
        }
    }
}
