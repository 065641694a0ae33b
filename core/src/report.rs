//! The analysis report and its JSON wire contract.
//!
//! Field names here ARE the external contract; renames are expressed
//! with serde attributes, everything else serializes as written.

use crate::config::EngineConfig;
use crate::scoring::SuspiciousAccount;
use crate::smurfing::SmurfingReport;
use crate::graph::TxGraph;
use crate::types::{AccountId, ParsedTransaction};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const RING_TYPE_CIRCULAR_ROUTING: &str = "circular_routing";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    /// `RING-###`, 1-based in detection order.
    pub ring_id: String,
    pub accounts: Vec<AccountId>,
    pub cycle_length: usize,
    #[serde(rename = "type")]
    pub ring_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNodeView {
    pub id: AccountId,
    pub suspicious: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdgeView {
    pub source: AccountId,
    pub target: AccountId,
    pub amount: f64,
    pub transaction_id: String,
}

/// Size-capped visualization graph: every account, the first
/// `max_graph_edges` transactions verbatim (parallel edges included).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNodeView>,
    pub edges: Vec<GraphEdgeView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_transactions: usize,
    pub total_accounts: usize,
    pub suspicious_accounts_count: usize,
    pub fraud_rings_detected: usize,
    pub smurfing_fan_in_detected: usize,
    pub smurfing_fan_out_detected: usize,
    /// Counts the tracer's full (<=100) list, not the truncated output.
    pub shell_chains_detected: usize,
    pub analysis_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReport {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub smurfing: SmurfingReport,
    pub shell_chains: Vec<Vec<AccountId>>,
    pub graph: GraphView,
    pub summary: ScanSummary,
}

pub fn assemble(
    transactions: &[ParsedTransaction],
    graph: &TxGraph,
    cycles: Vec<Vec<AccountId>>,
    smurfing: SmurfingReport,
    shell_chains: Vec<Vec<AccountId>>,
    suspicious_accounts: Vec<SuspiciousAccount>,
    cfg: &EngineConfig,
) -> FraudReport {
    let fraud_rings: Vec<FraudRing> = cycles
        .into_iter()
        .enumerate()
        .map(|(i, cycle)| FraudRing {
            ring_id: format!("RING-{:03}", i + 1),
            cycle_length: cycle.len(),
            accounts: cycle,
            ring_type: RING_TYPE_CIRCULAR_ROUTING.to_string(),
        })
        .collect();

    let score_by_id: HashMap<&str, u32> = suspicious_accounts
        .iter()
        .map(|s| (s.account_id.as_str(), s.score))
        .collect();

    let nodes = graph
        .nodes()
        .iter()
        .map(|n| GraphNodeView {
            id: n.id.clone(),
            suspicious: score_by_id.contains_key(n.id.as_str()),
            score: score_by_id.get(n.id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let edges = transactions
        .iter()
        .take(cfg.max_graph_edges)
        .map(|tx| GraphEdgeView {
            source: tx.sender_id.clone(),
            target: tx.receiver_id.clone(),
            amount: tx.amount,
            transaction_id: tx.transaction_id.clone(),
        })
        .collect();

    let summary = ScanSummary {
        total_transactions: transactions.len(),
        total_accounts: graph.len(),
        suspicious_accounts_count: suspicious_accounts.len(),
        fraud_rings_detected: fraud_rings.len(),
        smurfing_fan_in_detected: smurfing.fan_in.len(),
        smurfing_fan_out_detected: smurfing.fan_out.len(),
        shell_chains_detected: shell_chains.len(),
        analysis_timestamp: Utc::now().to_rfc3339(),
    };

    let mut shell_chains = shell_chains;
    shell_chains.truncate(cfg.max_chains_report);

    FraudReport {
        suspicious_accounts,
        fraud_rings,
        smurfing,
        shell_chains,
        graph: GraphView { nodes, edges },
        summary,
    }
}
