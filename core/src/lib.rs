//! fraudlens-core: forensic analysis of transaction batches.
//!
//! One synchronous call takes a batch of at most 10,000 transactions and
//! returns a report: accounts scored for suspicious behavior, circular
//! "fraud rings" (3–5 accounts), smurfing fan-in/fan-out clusters, and
//! shell-account chains. Everything is recomputed from scratch per
//! batch; the engine holds no state between calls and is fully
//! deterministic for a given input.
//!
//! ```no_run
//! use fraudlens_core::{analyze_batch, Transaction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let batch: Vec<Transaction> = serde_json::from_str("[]")?;
//! let report = analyze_batch(&batch)?;
//! println!("{} suspicious accounts", report.summary.suspicious_accounts_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cycles;
pub mod engine;
pub mod error;
pub mod generator;
pub mod graph;
pub mod report;
pub mod scoring;
pub mod shell_chains;
pub mod smurfing;
pub mod types;

pub use config::EngineConfig;
pub use engine::{analyze_batch, AnalysisEngine};
pub use error::{AnalysisError, AnalysisResult};
pub use report::FraudReport;
pub use types::Transaction;
