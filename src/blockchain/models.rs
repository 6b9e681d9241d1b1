// src/blockchain/models.rs
//! Typed payloads returned by the Esplora-style block explorer API.
//!
//! Every amount is expressed in satoshis. Loosely shaped upstream fields
//! (confirmation status, transaction inputs) are converted into enums while
//! decoding, so a payload that violates their invariants never reaches the
//! formatter.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("confirmed status is missing '{0}'")]
    MissingBlockField(&'static str),
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
    #[error("input with prevout is missing '{0}'")]
    MissingInputField(&'static str),
}

// --- Address Models ---

/// Aggregate funded/spent counters for one address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxoStats {
    pub funded_txo_count: u64,
    pub funded_txo_sum: u64,
    pub spent_txo_count: u64,
    pub spent_txo_sum: u64,
    pub tx_count: u64,
}

/// `GET /address/:address`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressStats {
    pub address: String,
    pub chain_stats: TxoStats,
    pub mempool_stats: TxoStats,
}

// --- Confirmation Status ---

/// Whether a transaction (or the output it created) is in a block yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTxStatus")]
pub enum TxStatus {
    Confirmed {
        block_height: u64,
        block_hash: String,
        block_time: DateTime<Utc>,
    },
    Unconfirmed,
}

impl TxStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxStatus::Confirmed { .. })
    }
}

#[derive(Deserialize)]
struct RawTxStatus {
    confirmed: bool,
    block_height: Option<u64>,
    block_hash: Option<String>,
    block_time: Option<i64>,
}

impl TryFrom<RawTxStatus> for TxStatus {
    type Error = ModelError;

    fn try_from(raw: RawTxStatus) -> Result<Self, Self::Error> {
        if !raw.confirmed {
            return Ok(TxStatus::Unconfirmed);
        }
        let block_height = raw
            .block_height
            .ok_or(ModelError::MissingBlockField("block_height"))?;
        let block_hash = raw
            .block_hash
            .ok_or(ModelError::MissingBlockField("block_hash"))?;
        let seconds = raw
            .block_time
            .ok_or(ModelError::MissingBlockField("block_time"))?;
        let block_time = DateTime::from_timestamp(seconds, 0)
            .ok_or(ModelError::TimestampOutOfRange(seconds))?;
        Ok(TxStatus::Confirmed {
            block_height,
            block_hash,
            block_time,
        })
    }
}

// --- Transaction Models ---

/// The output being spent by an input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Prevout {
    pub value: u64,
    pub scriptpubkey: String,
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
}

/// A transaction input. Inputs without a prevout are coinbase inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawInput")]
pub enum Input {
    Coinbase,
    Spend {
        txid: String,
        vout: u32,
        prevout: Prevout,
    },
}

#[derive(Deserialize)]
struct RawInput {
    txid: Option<String>,
    vout: Option<u32>,
    prevout: Option<Prevout>,
}

impl TryFrom<RawInput> for Input {
    type Error = ModelError;

    fn try_from(raw: RawInput) -> Result<Self, Self::Error> {
        match raw.prevout {
            None => Ok(Input::Coinbase),
            Some(prevout) => Ok(Input::Spend {
                txid: raw.txid.ok_or(ModelError::MissingInputField("txid"))?,
                vout: raw.vout.ok_or(ModelError::MissingInputField("vout"))?,
                prevout,
            }),
        }
    }
}

/// A transaction output. Non-standard scripts have no address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Output {
    pub value: u64,
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
}

/// `GET /tx/:txid`, also the element type of `GET /address/:address/txs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub version: i32,
    pub locktime: u32,
    pub vin: Vec<Input>,
    pub vout: Vec<Output>,
    /// Serialized size in bytes
    pub size: u64,
    /// Weight units
    pub weight: u64,
    /// Fee in satoshis
    pub fee: u64,
    pub status: TxStatus,
}

/// Element of `GET /address/:address/utxo`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub status: TxStatus,
    pub value: u64,
}

// --- Block Models ---

/// `GET /block/:height`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Block {
    pub id: String,
    pub version: u32,
    pub merkle_root: String,
    /// Absent for the genesis block
    #[serde(default)]
    pub previousblockhash: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub bits: u32,
    pub nonce: u32,
    pub size: u64,
    pub weight: u64,
    pub tx_count: u64,
    /// sats/vB, lowest to highest
    #[serde(default)]
    pub fee_range: Option<Vec<f64>>,
    #[serde(default)]
    pub median_fee: Option<f64>,
}
