//! Composite suspicion scoring.
//!
//! Accumulates integer points and reason tags per account, then keeps
//! accounts whose raw total exceeds the retention floor, caps scores at
//! 100, and sorts descending. The board is insertion-ordered and the
//! sort stable, so equal scores keep encounter order — which makes the
//! rule order below load-bearing for output ORDER (never for totals;
//! addition commutes).
//!
//! Weights are output contract, not tuning; they stay here as constants
//! rather than in `EngineConfig`.

use crate::config::EngineConfig;
use crate::shell_chains::ActivityCensus;
use crate::smurfing::SmurfingReport;
use crate::types::{AccountId, ParsedTransaction, MS_PER_HOUR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CYCLE_POINTS: u32 = 30;
const FAN_IN_RECEIVER_POINTS: u32 = 25;
const FAN_IN_SENDER_POINTS: u32 = 10;
const FAN_OUT_SENDER_POINTS: u32 = 25;
const SHELL_CHAIN_POINTS: u32 = 20;
const LOW_ACTIVITY_POINTS: u32 = 15;
const VELOCITY_BONUS_CAP: u32 = 20;
const VELOCITY_FLOOR_TX_PER_HOUR: f64 = 5.0;
const SCORE_CAP: u32 = 100;
const RETENTION_FLOOR: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: AccountId,
    pub score: u32,
    pub reasons: Vec<String>,
}

pub fn score_accounts(
    transactions: &[ParsedTransaction],
    cycles: &[Vec<AccountId>],
    smurfing: &SmurfingReport,
    shell_chains: &[Vec<AccountId>],
    census: &ActivityCensus,
    cfg: &EngineConfig,
) -> Vec<SuspiciousAccount> {
    let mut board = ScoreBoard::default();

    for cycle in cycles {
        for id in cycle {
            board.add(id, CYCLE_POINTS);
            board.tag(id, "Cycle participant");
        }
    }

    for cluster in &smurfing.fan_in {
        board.add(&cluster.receiver, FAN_IN_RECEIVER_POINTS);
        board.tag(
            &cluster.receiver,
            &format!("Fan-in receiver ({} senders)", cluster.count),
        );
        for sender in &cluster.senders {
            board.add(sender, FAN_IN_SENDER_POINTS);
            board.tag(sender, "Fan-in participant");
        }
    }

    for cluster in &smurfing.fan_out {
        board.add(&cluster.sender, FAN_OUT_SENDER_POINTS);
        board.tag(
            &cluster.sender,
            &format!("Fan-out sender ({} receivers)", cluster.count),
        );
    }

    for chain in shell_chains {
        for id in chain {
            board.add(id, SHELL_CHAIN_POINTS);
            board.tag(id, "Shell chain node");
        }
    }

    // Velocity: outgoing transactions only, per sender in first-appearance
    // order. Span of zero (all at one instant) never scores.
    for (sender, ts) in outgoing_timestamps(transactions) {
        if ts.len() < 2 {
            continue;
        }
        let lo = ts.iter().copied().min().unwrap_or(0);
        let hi = ts.iter().copied().max().unwrap_or(0);
        let span_hours = (hi - lo) as f64 / MS_PER_HOUR as f64;
        if span_hours > 0.0 {
            let velocity = ts.len() as f64 / span_hours;
            if velocity > VELOCITY_FLOOR_TX_PER_HOUR {
                let bonus = VELOCITY_BONUS_CAP.min((velocity * 2.0).floor() as u32);
                board.add(&sender, bonus);
                board.tag(&sender, &format!("High velocity ({velocity:.1} tx/hr)"));
            }
        }
    }

    for (id, count) in census.iter() {
        if count >= cfg.shell_tx_min && count <= cfg.shell_tx_max {
            board.add(id, LOW_ACTIVITY_POINTS);
            board.tag(id, "Shell account (low tx count)");
        }
    }

    let scored = board.finish();
    log::debug!("scoring: {} accounts above retention floor", scored.len());
    scored
}

/// Outgoing-transaction timestamps per sender, senders in the order
/// they first appear as a sender in the batch.
fn outgoing_timestamps(transactions: &[ParsedTransaction]) -> Vec<(AccountId, Vec<i64>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut per_sender: Vec<(AccountId, Vec<i64>)> = Vec::new();
    for tx in transactions {
        let i = *index.entry(tx.sender_id.as_str()).or_insert_with(|| {
            per_sender.push((tx.sender_id.clone(), Vec::new()));
            per_sender.len() - 1
        });
        per_sender[i].1.push(tx.ts_ms);
    }
    per_sender
}

/// Insertion-ordered accumulator: accounts enter the board the first time
/// any rule touches them. Reason lists are ordered sets.
#[derive(Default)]
struct ScoreBoard {
    entries: Vec<(AccountId, u32, Vec<String>)>,
    index: HashMap<AccountId, usize>,
}

impl ScoreBoard {
    fn slot(&mut self, id: &str) -> usize {
        if let Some(&i) = self.index.get(id) {
            return i;
        }
        let i = self.entries.len();
        self.index.insert(id.to_string(), i);
        self.entries.push((id.to_string(), 0, Vec::new()));
        i
    }

    fn add(&mut self, id: &str, points: u32) {
        let i = self.slot(id);
        self.entries[i].1 += points;
    }

    fn tag(&mut self, id: &str, reason: &str) {
        let i = self.slot(id);
        let reasons = &mut self.entries[i].2;
        if !reasons.iter().any(|r| r == reason) {
            reasons.push(reason.to_string());
        }
    }

    fn finish(self) -> Vec<SuspiciousAccount> {
        let mut out: Vec<SuspiciousAccount> = self
            .entries
            .into_iter()
            .filter(|(_, score, _)| *score > RETENTION_FLOOR)
            .map(|(account_id, score, reasons)| SuspiciousAccount {
                account_id,
                score: score.min(SCORE_CAP),
                reasons,
            })
            .collect();
        out.sort_by(|a, b| b.score.cmp(&a.score)); // stable: ties keep encounter order
        out
    }
}
