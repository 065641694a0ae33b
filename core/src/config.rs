//! Engine thresholds and output caps.
//!
//! Defaults are the analysis contract; a runner may override them from a
//! JSON file. Scoring weights are NOT here: they live as named constants
//! in `scoring.rs` because they are part of the output contract, not
//! tuning knobs.

use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Boundary cap: batches above this are rejected before any work.
    pub max_transactions: usize,
    /// Shortest circular route reported as a ring (edges == accounts).
    pub min_cycle_len: usize,
    /// Longest circular route explored by the DFS.
    pub max_cycle_len: usize,
    /// Sliding-window size for fan-in/fan-out scans.
    pub smurfing_window_hours: i64,
    /// Distinct counterparties inside one window to qualify as smurfing.
    pub smurfing_fan_threshold: usize,
    /// Low edge of the shell-account activity band (total tx count).
    pub shell_tx_min: u32,
    /// High edge of the shell-account activity band.
    pub shell_tx_max: u32,
    /// Maximum accounts on a traced chain.
    pub max_chain_len: usize,
    /// Chains kept by the tracer after dedup.
    pub max_chains_internal: usize,
    /// Chains surfaced in the report.
    pub max_chains_report: usize,
    /// Edges kept in the visualization graph.
    pub max_graph_edges: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_transactions: 10_000,
            min_cycle_len: 3,
            max_cycle_len: 5,
            smurfing_window_hours: 72,
            smurfing_fan_threshold: 10,
            shell_tx_min: 2,
            shell_tx_max: 3,
            max_chain_len: 6,
            max_chains_internal: 100,
            max_chains_report: 50,
            max_graph_edges: 2_000,
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file. Missing fields take their defaults,
    /// so a file may override a single threshold.
    pub fn from_file(path: &Path) -> AnalysisResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_transactions, 10_000);
        assert_eq!(cfg.min_cycle_len, 3);
        assert_eq!(cfg.max_cycle_len, 5);
        assert_eq!(cfg.smurfing_window_hours, 72);
        assert_eq!(cfg.smurfing_fan_threshold, 10);
        assert_eq!(cfg.shell_tx_min, 2);
        assert_eq!(cfg.shell_tx_max, 3);
        assert_eq!(cfg.max_chain_len, 6);
        assert_eq!(cfg.max_chains_internal, 100);
        assert_eq!(cfg.max_chains_report, 50);
        assert_eq!(cfg.max_graph_edges, 2_000);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    #[test]
    fn partial_json_keeps_defaults_elsewhere() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"smurfing_fan_threshold": 5}"#).unwrap();
        assert_eq!(cfg.smurfing_fan_threshold, 5);
        assert_eq!(cfg.max_transactions, 10_000);
    }
}
