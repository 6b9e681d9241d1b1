// src/blockchain/format.rs
//! Plain-text reports for the block explorer payloads.
//!
//! Everything here is pure: the same payload always renders to the same
//! bytes. Amounts arrive in satoshis and are shown in BTC with eight
//! decimals; timestamps are shown as ISO-8601 instants or dates.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::blockchain::models::{AddressStats, Block, Input, Transaction, TxStatus, Utxo};

const SATS_PER_BTC: u64 = 100_000_000;
const SHORT_TXID_LEN: usize = 16;

/// Render satoshis as BTC with exactly eight fractional digits.
pub fn format_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// `2009-01-03T18:15:05.000Z`
pub fn format_instant(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `2009-01-03`
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// First 16 characters of a txid followed by `...`, for listings.
pub fn short_txid(txid: &str) -> String {
    let prefix: String = txid.chars().take(SHORT_TXID_LEN).collect();
    format!("{}...", prefix)
}

fn status_label(status: &TxStatus) -> String {
    match status {
        TxStatus::Confirmed { block_height, .. } => format!("Confirmed (Block {})", block_height),
        TxStatus::Unconfirmed => "Unconfirmed".to_string(),
    }
}

fn date_label(status: &TxStatus) -> String {
    match status {
        TxStatus::Confirmed { block_time, .. } => format_date(block_time),
        TxStatus::Unconfirmed => "Pending".to_string(),
    }
}

pub fn format_address_stats(stats: &AddressStats) -> String {
    let chain = &stats.chain_stats;
    let mempool = &stats.mempool_stats;

    let mut out = format!("**Address: {}**\n\n", stats.address);
    out.push_str("**Chain Stats:**\n");
    out.push_str(&format!("- Funded TXOs: {}\n", chain.funded_txo_count));
    out.push_str(&format!("- Funded Sum: {} BTC\n", format_btc(chain.funded_txo_sum)));
    out.push_str(&format!("- Spent TXOs: {}\n", chain.spent_txo_count));
    out.push_str(&format!("- Spent Sum: {} BTC\n", format_btc(chain.spent_txo_sum)));
    out.push_str(&format!("- Total Transactions: {}\n\n", chain.tx_count));

    out.push_str("**Mempool Stats:**\n");
    out.push_str(&format!("- Pending TXOs: {}\n", mempool.funded_txo_count));
    out.push_str(&format!("- Pending Sum: {} BTC\n", format_btc(mempool.funded_txo_sum)));
    out.push_str(&format!("- Pending Transactions: {}\n", mempool.tx_count));
    out
}

/// Reports the full upstream count but lists only the first `limit` entries,
/// in upstream order.
pub fn format_address_transactions(address: &str, txs: &[Transaction], limit: usize) -> String {
    let mut out = format!("**Transaction History for {}**\n\n", address);
    out.push_str(&format!("Found {} total transactions\n\n", txs.len()));

    for (index, tx) in txs.iter().take(limit).enumerate() {
        out.push_str(&format!("{}. **{}**\n", index + 1, short_txid(&tx.txid)));
        out.push_str(&format!("   Status: {}\n", status_label(&tx.status)));
        out.push_str(&format!("   Date: {}\n", date_label(&tx.status)));
        out.push_str(&format!("   Fee: {} sats\n", tx.fee));
        out.push_str(&format!("   Size: {} bytes\n\n", tx.size));
    }
    out
}

pub fn format_address_utxos(address: &str, utxos: &[Utxo], limit: usize) -> String {
    let mut out = format!("**Current UTXOs for {}**\n\n", address);
    out.push_str(&format!("Found {} total UTXOs\n\n", utxos.len()));

    for (index, utxo) in utxos.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "{}. **{}:{}**\n",
            index + 1,
            short_txid(&utxo.txid),
            utxo.vout
        ));
        out.push_str(&format!("   Amount: {} BTC\n", format_btc(utxo.value)));
        out.push_str(&format!("   Status: {}\n", status_label(&utxo.status)));
        out.push_str(&format!("   Date: {}\n\n", date_label(&utxo.status)));
    }
    out
}

pub fn format_transaction(tx: &Transaction) -> String {
    let mut out = format!("**Transaction: {}**\n\n", tx.txid);
    out.push_str("**Basic Info:**\n");
    out.push_str(&format!("- Version: {}\n", tx.version));
    out.push_str(&format!("- Size: {} bytes\n", tx.size));
    out.push_str(&format!("- Weight: {} WU\n", tx.weight));
    out.push_str(&format!("- Fee: {} sats\n", tx.fee));
    out.push_str(&format!("- Locktime: {}\n\n", tx.locktime));

    out.push_str("**Status:**\n");
    match &tx.status {
        TxStatus::Confirmed {
            block_height,
            block_hash,
            block_time,
        } => {
            out.push_str(&format!("- Confirmed in block {}\n", block_height));
            out.push_str(&format!("- Block hash: {}\n", block_hash));
            out.push_str(&format!("- Block time: {}\n", format_instant(block_time)));
        }
        TxStatus::Unconfirmed => out.push_str("- Unconfirmed (in mempool)\n"),
    }
    out.push('\n');

    out.push_str(&format!("**Inputs ({}):**\n", tx.vin.len()));
    for (index, input) in tx.vin.iter().enumerate() {
        match input {
            Input::Spend {
                txid,
                vout,
                prevout,
            } => out.push_str(&format!(
                "{}. {}:{} - {} BTC\n",
                index + 1,
                short_txid(txid),
                vout,
                format_btc(prevout.value)
            )),
            Input::Coinbase => out.push_str(&format!("{}. Coinbase transaction\n", index + 1)),
        }
    }
    out.push('\n');

    out.push_str(&format!("**Outputs ({}):**\n", tx.vout.len()));
    for (index, output) in tx.vout.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} BTC to {}\n",
            index + 1,
            format_btc(output.value),
            output.scriptpubkey_address.as_deref().unwrap_or("Unknown address")
        ));
    }
    out
}

/// `height` is the height the caller asked for.
pub fn format_block(height: u64, block: &Block) -> String {
    let fee_range = match block.fee_range.as_deref() {
        Some(range) if !range.is_empty() => range
            .iter()
            .map(|fee| fee.to_string())
            .collect::<Vec<_>>()
            .join(" - "),
        _ => "N/A".to_string(),
    };
    let median_fee = block
        .median_fee
        .map(|fee| fee.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut out = format!("**Block {}**\n\n", height);
    out.push_str("**Basic Info:**\n");
    out.push_str(&format!("- Hash: {}\n", block.id));
    out.push_str(&format!("- Version: {}\n", block.version));
    out.push_str(&format!("- Merkle Root: {}\n", block.merkle_root));
    out.push_str(&format!(
        "- Previous Block: {}\n",
        block.previousblockhash.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!("- Timestamp: {}\n", format_instant(&block.timestamp)));
    out.push_str(&format!("- Bits: {}\n", block.bits));
    out.push_str(&format!("- Nonce: {}\n\n", block.nonce));

    out.push_str("**Stats:**\n");
    out.push_str(&format!("- Size: {} bytes\n", block.size));
    out.push_str(&format!("- Weight: {} WU\n", block.weight));
    out.push_str(&format!("- Transaction Count: {}\n", block.tx_count));
    out.push_str(&format!("- Fee Range: {} sats/vB\n", fee_range));
    out.push_str(&format!("- Median Fee: {} sats/vB\n", median_fee));
    out
}
