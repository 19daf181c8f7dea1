//! Chain routing and output rendering.
//!
//! The chain token is parsed before any client is touched, so an
//! unsupported chain never reaches the network.

use std::io::Write;

use thiserror::Error;

use crate::cli::Command;
use crate::explorer::{
    AddressBalance, BitcoinExplorer, BlockLookup, Chain, EthereumExplorer, ExplorerError,
    TransactionLookup, UnsupportedChain,
};

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnsupportedChain(#[from] UnsupportedChain),

    #[error("query failed: {0}")]
    Explorer(#[from] ExplorerError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// One client per supported chain.
#[derive(Debug, Clone)]
pub struct Explorers {
    pub bitcoin: BitcoinExplorer,
    pub ethereum: EthereumExplorer,
}

/// Run `command` and write its summary to `out`.
pub async fn execute<W: Write>(
    command: &Command,
    explorers: &Explorers,
    out: &mut W,
) -> Result<(), DispatchError> {
    match command {
        Command::Balance { chain, address } => {
            let chain: Chain = chain.parse()?;
            tracing::info!(%chain, command = "balance", "Dispatching");
            writeln!(out, "Querying {chain} balance: {address}")?;
            match chain {
                Chain::Bitcoin => write_balance(&explorers.bitcoin, address, out).await,
                Chain::Ethereum => write_balance(&explorers.ethereum, address, out).await,
            }
        }
        Command::Tx { chain, txid } => {
            let chain: Chain = chain.parse()?;
            tracing::info!(%chain, command = "tx", "Dispatching");
            writeln!(out, "Querying {chain} transaction: {txid}")?;
            match chain {
                Chain::Bitcoin => write_transaction(&explorers.bitcoin, txid, out).await,
                Chain::Ethereum => write_transaction(&explorers.ethereum, txid, out).await,
            }
        }
        Command::Block { chain, height_or_hash } => {
            let chain: Chain = chain.parse()?;
            tracing::info!(%chain, command = "block", "Dispatching");
            writeln!(out, "Querying {chain} block: {height_or_hash}")?;
            match chain {
                Chain::Bitcoin => write_block(&explorers.bitcoin, height_or_hash, out).await,
                Chain::Ethereum => write_block(&explorers.ethereum, height_or_hash, out).await,
            }
        }
    }
}

async fn write_balance<E, W>(explorer: &E, address: &str, out: &mut W) -> Result<(), DispatchError>
where
    E: AddressBalance,
    W: Write,
{
    let balance = explorer.balance(address).await?;
    writeln!(out, "Balance: {}", balance.display_amount())?;
    Ok(())
}

async fn write_transaction<E, W>(explorer: &E, id: &str, out: &mut W) -> Result<(), DispatchError>
where
    E: TransactionLookup,
    W: Write,
{
    let tx = explorer.transaction(id).await?;
    write!(out, "{tx}")?;
    Ok(())
}

async fn write_block<E, W>(explorer: &E, id: &str, out: &mut W) -> Result<(), DispatchError>
where
    E: BlockLookup,
    W: Write,
{
    let block = explorer.block(id).await?;
    write!(out, "{block}")?;
    Ok(())
}
