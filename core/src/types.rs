//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// A stable account identifier. Opaque to the engine; ordered bytewise.
pub type AccountId = String;

/// One transaction as it arrives on the wire.
/// Self-transfers (`sender_id == receiver_id`) are legal input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: f64,
    pub timestamp: String,
}

/// A transaction whose timestamp has been resolved to epoch milliseconds.
/// Produced once at the engine boundary; every detector works on these.
#[derive(Debug, Clone)]
pub struct ParsedTransaction {
    pub transaction_id: String,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: f64,
    pub timestamp: String,
    pub ts_ms: i64,
}

/// Milliseconds in one hour, for window arithmetic.
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
