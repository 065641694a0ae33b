//! Smurfing detection: fan-in / fan-out bursts inside a sliding window.
//!
//! Works on the raw transaction list, not the graph. Each account's
//! transactions are grouped and sorted by timestamp; every transaction
//! anchors an inclusive 72-hour window `[t, t + 72h]`, and the first
//! anchor whose window holds >= 10 distinct counterparties yields that
//! account's one cluster. Timestamp ties earlier in the sorted group
//! still land in the window, by the inclusive lower bound.

use crate::config::EngineConfig;
use crate::types::{AccountId, ParsedTransaction, MS_PER_HOUR};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanInCluster {
    pub receiver: AccountId,
    /// Distinct senders in the qualifying window, first-appearance order.
    pub senders: Vec<AccountId>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanOutCluster {
    pub sender: AccountId,
    pub receivers: Vec<AccountId>,
    pub count: usize,
}

/// Both scans' findings; serializes with the wire contract's camelCase keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmurfingReport {
    #[serde(rename = "fanIn")]
    pub fan_in: Vec<FanInCluster>,
    #[serde(rename = "fanOut")]
    pub fan_out: Vec<FanOutCluster>,
}

pub fn detect_smurfing(transactions: &[ParsedTransaction], cfg: &EngineConfig) -> SmurfingReport {
    let window_ms = cfg.smurfing_window_hours * MS_PER_HOUR;

    let fan_in = scan(
        transactions,
        cfg,
        window_ms,
        |tx| &tx.receiver_id,
        |tx| &tx.sender_id,
    )
    .into_iter()
    .map(|(receiver, senders)| FanInCluster {
        receiver,
        count: senders.len(),
        senders,
    })
    .collect::<Vec<_>>();

    let fan_out = scan(
        transactions,
        cfg,
        window_ms,
        |tx| &tx.sender_id,
        |tx| &tx.receiver_id,
    )
    .into_iter()
    .map(|(sender, receivers)| FanOutCluster {
        sender,
        count: receivers.len(),
        receivers,
    })
    .collect::<Vec<_>>();

    log::debug!(
        "smurfing: {} fan-in, {} fan-out clusters",
        fan_in.len(),
        fan_out.len()
    );
    SmurfingReport { fan_in, fan_out }
}

/// One directional scan. Groups transactions by `group_key`, and for the
/// first window holding enough distinct `counterpart_key` ids, emits
/// `(group id, counterparts)`. At most one cluster per group id; groups
/// emit in first-appearance order over the batch.
fn scan<'a>(
    transactions: &'a [ParsedTransaction],
    cfg: &EngineConfig,
    window_ms: i64,
    group_key: impl Fn(&'a ParsedTransaction) -> &'a AccountId,
    counterpart_key: impl Fn(&'a ParsedTransaction) -> &'a AccountId,
) -> Vec<(AccountId, Vec<AccountId>)> {
    let mut groups: HashMap<&AccountId, Vec<&ParsedTransaction>> = HashMap::new();
    let mut group_order: Vec<&AccountId> = Vec::new();
    for tx in transactions {
        let key = group_key(tx);
        groups
            .entry(key)
            .or_insert_with(|| {
                group_order.push(key);
                Vec::new()
            })
            .push(tx);
    }

    let mut clusters = Vec::new();
    for id in group_order {
        let mut txs = match groups.remove(id) {
            Some(t) => t,
            None => continue,
        };
        txs.sort_by_key(|t| t.ts_ms);

        for anchor in &txs {
            let lo = anchor.ts_ms;
            let hi = anchor.ts_ms + window_ms;

            let mut distinct: Vec<AccountId> = Vec::new();
            let mut seen: HashSet<&AccountId> = HashSet::new();
            for &t in &txs {
                if t.ts_ms >= lo && t.ts_ms <= hi && seen.insert(counterpart_key(t)) {
                    distinct.push(counterpart_key(t).clone());
                }
            }

            if distinct.len() >= cfg.smurfing_fan_threshold {
                clusters.push((id.clone(), distinct));
                break; // first qualifying anchor wins
            }
        }
    }
    clusters
}
