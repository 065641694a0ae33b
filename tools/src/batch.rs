//! Batch file loading — the headless stand-in for the upload surface.
//!
//! CSV loading is strict: a bad header or row aborts the whole load with
//! the offending 1-based row named. There is no per-row recovery; the
//! engine expects its upstream collaborator to hand it clean batches.

use anyhow::{anyhow, bail, Result};
use fraudlens_core::engine::parse_timestamp_ms;
use fraudlens_core::Transaction;
use serde::Deserialize;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

const MAX_ROWS: usize = 10_000;

/// Load a batch by extension: `.csv` goes through the strict CSV parser,
/// anything else through the JSON loader.
pub fn load(path: &Path) -> Result<Vec<Transaction>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("reading {}: {e}", path.display()))?;
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        parse_csv(&raw)
    } else {
        parse_json(&raw)
    }
}

/// Trim a field and strip one pair of surrounding double quotes.
fn clean(field: &str) -> &str {
    let t = field.trim();
    t.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(t)
}

pub fn parse_csv(text: &str) -> Result<Vec<Transaction>> {
    let mut lines = text.trim().lines();
    let header_line = lines.next().ok_or_else(|| anyhow!("empty CSV file"))?;

    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| clean(h).to_lowercase())
        .collect();
    let locate = |name: &str| headers.iter().position(|h| h.as_str() == name);
    let (c_id, c_from, c_to, c_amount, c_ts) = match (
        locate("transaction_id"),
        locate("sender_id"),
        locate("receiver_id"),
        locate("amount"),
        locate("timestamp"),
    ) {
        (Some(id), Some(from), Some(to), Some(amount), Some(ts)) => (id, from, to, amount, ts),
        _ => {
            let missing: Vec<&str> = REQUIRED_COLUMNS
                .into_iter()
                .filter(|c| locate(c).is_none())
                .collect();
            bail!("missing required columns: {}", missing.join(", "));
        }
    };

    let mut transactions = Vec::new();
    for (i, line) in lines.enumerate() {
        let row = i + 2; // 1-based, after the header
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(clean).collect();
        if fields.len() != headers.len() {
            bail!(
                "row {row} has {} columns, expected {}",
                fields.len(),
                headers.len()
            );
        }

        let amount: f64 = fields[c_amount]
            .parse()
            .map_err(|_| anyhow!("row {row}: amount \"{}\" is not a valid number", fields[c_amount]))?;
        if parse_timestamp_ms(fields[c_ts]).is_none() {
            bail!("row {row}: timestamp \"{}\" is not a valid date", fields[c_ts]);
        }

        transactions.push(Transaction {
            transaction_id: fields[c_id].to_string(),
            sender_id: fields[c_from].to_string(),
            receiver_id: fields[c_to].to_string(),
            amount,
            timestamp: fields[c_ts].to_string(),
        });
    }

    check_cap(transactions)
}

#[derive(Deserialize)]
struct WrappedBatch {
    transactions: Vec<Transaction>,
}

/// A JSON batch: either a bare array of transactions or an object with a
/// `transactions` field.
pub fn parse_json(text: &str) -> Result<Vec<Transaction>> {
    let transactions = match serde_json::from_str::<Vec<Transaction>>(text) {
        Ok(list) => list,
        Err(_) => {
            serde_json::from_str::<WrappedBatch>(text)
                .map_err(|e| anyhow!("not a transaction array or {{\"transactions\": [...]}}: {e}"))?
                .transactions
        }
    };
    check_cap(transactions)
}

fn check_cap(transactions: Vec<Transaction>) -> Result<Vec<Transaction>> {
    if transactions.len() > MAX_ROWS {
        bail!("maximum {MAX_ROWS} transactions allowed per batch");
    }
    Ok(transactions)
}

/// Render a batch back to loader-compatible CSV (header + rows).
pub fn to_csv(transactions: &[Transaction]) -> String {
    let mut out = String::from("transaction_id,sender_id,receiver_id,amount,timestamp\n");
    for tx in transactions {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            tx.transaction_id, tx.sender_id, tx.receiver_id, tx.amount, tx.timestamp
        ));
    }
    out
}
