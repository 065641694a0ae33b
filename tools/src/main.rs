//! scan-runner: headless driver for the fraudlens analysis engine.
//!
//! Usage:
//!   scan-runner --input batch.csv [--output report.json] [--config cfg.json]
//!   scan-runner --gen mixed --seed 42 --accounts 120 --out batch.csv
//!   scan-runner --ipc-mode

mod batch;

use anyhow::{anyhow, bail, Result};
use fraudlens_core::generator::{generate, Scenario};
use fraudlens_core::{AnalysisEngine, EngineConfig, FraudReport, Transaction};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Analyze { transactions: Vec<Transaction> },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let config = match arg_str(&args, "--config") {
        Some(path) => EngineConfig::from_file(Path::new(&path))
            .map_err(|e| anyhow!("loading config {path}: {e}"))?,
        None => EngineConfig::default(),
    };
    let engine = AnalysisEngine::new(config);

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    if let Some(scenario_name) = arg_str(&args, "--gen") {
        let scenario = Scenario::parse(&scenario_name)
            .ok_or_else(|| anyhow!("unknown scenario '{scenario_name}' (background, ring, fan_in, fan_out, shell_chain, mixed)"))?;
        let seed = parse_arg(&args, "--seed", 42u64);
        let accounts = parse_arg(&args, "--accounts", 100usize);
        let batch = generate(scenario, seed, accounts);
        let csv = batch::to_csv(&batch);
        match arg_str(&args, "--out") {
            Some(path) => {
                std::fs::write(&path, csv)?;
                println!("wrote {} transactions to {path}", batch.len());
            }
            None => print!("{csv}"),
        }
        return Ok(());
    }

    let input = arg_str(&args, "--input")
        .ok_or_else(|| anyhow!("usage: scan-runner --input batch.csv [--output report.json] [--config cfg.json]"))?;

    let scan_id = uuid::Uuid::new_v4();
    log::info!("scan {scan_id}: loading {input}");
    let transactions = batch::load(Path::new(&input))?;

    let report = match engine.analyze(&transactions) {
        Ok(r) => r,
        Err(e) => bail!("scan {scan_id} failed: {e}"),
    };
    log::info!(
        "scan {scan_id}: {} suspicious accounts, {} rings",
        report.summary.suspicious_accounts_count,
        report.summary.fraud_rings_detected
    );

    let json = serde_json::to_string_pretty(&report)?;
    match arg_str(&args, "--output") {
        Some(path) => {
            std::fs::write(&path, &json)?;
            println!("report written to {path}");
        }
        None => println!("{json}"),
    }
    print_summary(&report);
    Ok(())
}

/// JSON-lines loop for an external UI. Validation errors and analysis
/// failures are answered in-band; the loop only ends on EOF or `quit`.
fn run_ipc_loop(engine: &AnalysisEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        match answer_frame(engine, &buffer) {
            Some(reply) => {
                writeln!(stdout, "{reply}")?;
                stdout.flush()?;
            }
            None => break,
        }
    }
    Ok(())
}

/// One request/reply exchange. Unparseable frames and failed analyses
/// answer as `{"error": ...}` so the peer keeps its loop; `None` means
/// the peer asked to quit.
fn answer_frame(engine: &AnalysisEngine, line: &str) -> Option<String> {
    let error_frame = |msg: String| serde_json::json!({ "error": msg }).to_string();

    let cmd: IpcCommand = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => return Some(error_frame(e.to_string())),
    };
    match cmd {
        IpcCommand::Quit => None,
        IpcCommand::Analyze { transactions } => Some(match engine.analyze(&transactions) {
            Ok(report) => serde_json::to_string(&report)
                .unwrap_or_else(|e| error_frame(e.to_string())),
            Err(e) => error_frame(e.to_string()),
        }),
    }
}

fn print_summary(report: &FraudReport) {
    let s = &report.summary;
    println!();
    println!("=== SCAN SUMMARY ===");
    println!("  transactions:   {}", s.total_transactions);
    println!("  accounts:       {}", s.total_accounts);
    println!("  suspicious:     {}", s.suspicious_accounts_count);
    println!("  fraud rings:    {}", s.fraud_rings_detected);
    println!("  fan-in bursts:  {}", s.smurfing_fan_in_detected);
    println!("  fan-out bursts: {}", s.smurfing_fan_out_detected);
    println!("  shell chains:   {}", s.shell_chains_detected);
    println!("  analyzed at:    {}", s.analysis_timestamp);

    if !report.suspicious_accounts.is_empty() {
        println!();
        println!("=== TOP SUSPICIOUS ACCOUNTS ===");
        for acct in report.suspicious_accounts.iter().take(10) {
            println!(
                "  {:<16} {:>3}  {}",
                acct.account_id,
                acct.score,
                acct.reasons.join("; ")
            );
        }
    }
}

fn arg_str(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
