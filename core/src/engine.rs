//! The analysis engine — boundary validation plus the detection pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Boundary: batch-size check, then timestamp parsing
//!   2. Graph construction
//!   3. Cycle detection          (graph)
//!   4. Smurfing detection       (raw transactions)
//!   5. Shell-chain tracing      (graph + activity census)
//!   6. Suspicion scoring        (all detector outputs)
//!   7. Report assembly
//!
//! RULES:
//!   - No stage mutates another stage's output.
//!   - No partial results: any error aborts the whole analysis.
//!   - The pipeline is deterministic for a given batch; only the
//!     report's analysis_timestamp reads the clock.

use crate::config::EngineConfig;
use crate::cycles::detect_cycles;
use crate::error::{AnalysisError, AnalysisResult};
use crate::graph::TxGraph;
use crate::report::{assemble, FraudReport};
use crate::scoring::score_accounts;
use crate::shell_chains::{trace_shell_chains, ActivityCensus};
use crate::smurfing::detect_smurfing;
use crate::types::{ParsedTransaction, Transaction};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over one batch. The single public entry
    /// point: one synchronous call, a complete report or an error.
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisResult<FraudReport> {
        if transactions.len() > self.config.max_transactions {
            log::warn!(
                "rejecting batch: {} transactions over the {} cap",
                transactions.len(),
                self.config.max_transactions
            );
            return Err(AnalysisError::BatchTooLarge {
                len: transactions.len(),
                max: self.config.max_transactions,
            });
        }
        log::info!("analyzing batch of {} transactions", transactions.len());

        let parsed = parse_batch(transactions)?;
        let graph = TxGraph::build(&parsed);

        let cycles = detect_cycles(&graph, &self.config);
        let smurfing = detect_smurfing(&parsed, &self.config);
        let census = ActivityCensus::tally(&parsed);
        let shell_chains = trace_shell_chains(&graph, &census, &self.config);

        let suspicious =
            score_accounts(&parsed, &cycles, &smurfing, &shell_chains, &census, &self.config);

        Ok(assemble(
            &parsed,
            &graph,
            cycles,
            smurfing,
            shell_chains,
            suspicious,
            &self.config,
        ))
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Analyze one batch under the default config.
pub fn analyze_batch(transactions: &[Transaction]) -> AnalysisResult<FraudReport> {
    AnalysisEngine::default().analyze(transactions)
}

fn parse_batch(transactions: &[Transaction]) -> AnalysisResult<Vec<ParsedTransaction>> {
    transactions
        .iter()
        .map(|tx| {
            let ts_ms = parse_timestamp_ms(&tx.timestamp).ok_or_else(|| {
                AnalysisError::InvalidTimestamp {
                    transaction_id: tx.transaction_id.clone(),
                    raw: tx.timestamp.clone(),
                }
            })?;
            Ok(ParsedTransaction {
                transaction_id: tx.transaction_id.clone(),
                sender_id: tx.sender_id.clone(),
                receiver_id: tx.receiver_id.clone(),
                amount: tx.amount,
                timestamp: tx.timestamp.clone(),
                ts_ms,
            })
        })
        .collect()
}

/// Resolve a timestamp string to epoch milliseconds. RFC-3339 first
/// (offset honored); offset-less ISO forms and bare dates assume UTC.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_offset_is_honored() {
        let utc = parse_timestamp_ms("2024-01-01T12:00:00Z").unwrap();
        let plus2 = parse_timestamp_ms("2024-01-01T14:00:00+02:00").unwrap();
        assert_eq!(utc, plus2);
    }

    #[test]
    fn offsetless_forms_assume_utc() {
        let canonical = parse_timestamp_ms("2024-01-01T12:00:00Z").unwrap();
        assert_eq!(parse_timestamp_ms("2024-01-01T12:00:00"), Some(canonical));
        assert_eq!(parse_timestamp_ms("2024-01-01 12:00:00"), Some(canonical));
        assert_eq!(
            parse_timestamp_ms("2024-01-01T12:00:00.250"),
            Some(canonical + 250)
        );
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        assert_eq!(
            parse_timestamp_ms("2024-01-01"),
            parse_timestamp_ms("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_timestamp_ms("yesterday"), None);
        assert_eq!(parse_timestamp_ms(""), None);
    }
}
