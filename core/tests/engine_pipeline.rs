//! End-to-end pipeline properties: the boundary cap, idempotence, the
//! wire contract's shape, and whole scenarios through the public API.

use chrono::{DateTime, Duration};
use fraudlens_core::generator::{generate, Scenario};
use fraudlens_core::{analyze_batch, AnalysisEngine, AnalysisError, Transaction};

fn ts(minutes: i64) -> String {
    (DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z").unwrap() + Duration::minutes(minutes))
        .to_rfc3339()
}

fn tx(id: &str, from: &str, to: &str, minutes: i64) -> Transaction {
    Transaction {
        transaction_id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        amount: 250.0,
        timestamp: ts(minutes),
    }
}

#[test]
fn three_account_ring_end_to_end() {
    let batch = vec![
        tx("t1", "A", "B", 0),
        tx("t2", "B", "C", 1),
        tx("t3", "C", "A", 2),
    ];
    let report = analyze_batch(&batch).expect("analysis");

    assert_eq!(report.fraud_rings.len(), 1);
    let ring = &report.fraud_rings[0];
    assert_eq!(ring.ring_id, "RING-001");
    assert_eq!(ring.cycle_length, 3);
    assert_eq!(ring.ring_type, "circular_routing");
    let mut members = ring.accounts.clone();
    members.sort();
    assert_eq!(members, vec!["A", "B", "C"]);

    for id in ["A", "B", "C"] {
        let entry = report
            .suspicious_accounts
            .iter()
            .find(|s| s.account_id == id)
            .unwrap_or_else(|| panic!("{id} missing from suspicious accounts"));
        assert!(entry.score >= 30, "{id} scored {}", entry.score);
        assert!(entry.reasons.iter().any(|r| r == "Cycle participant"));
    }
}

#[test]
fn identical_batches_produce_identical_reports() {
    let batch = generate(Scenario::Mixed, 0xFEED_5EED, 60);

    let mut a = serde_json::to_value(analyze_batch(&batch).expect("run a")).unwrap();
    let mut b = serde_json::to_value(analyze_batch(&batch).expect("run b")).unwrap();

    // Only the analysis timestamp reads the clock.
    a["summary"]["analysis_timestamp"] = serde_json::Value::Null;
    b["summary"]["analysis_timestamp"] = serde_json::Value::Null;
    assert_eq!(a, b, "pipeline must be deterministic for a given batch");
}

#[test]
fn boundary_accepts_exactly_ten_thousand() {
    // Disjoint account pairs keep every detector's work trivial.
    let batch: Vec<Transaction> = (0..10_000)
        .map(|i| tx(&format!("t{i}"), &format!("S{i}"), &format!("R{i}"), i % 600))
        .collect();
    let report = analyze_batch(&batch).expect("10,000 is within the cap");
    assert_eq!(report.summary.total_transactions, 10_000);
    assert_eq!(report.summary.total_accounts, 20_000);
    assert_eq!(report.graph.edges.len(), 2_000, "edge list is capped");
}

#[test]
fn boundary_rejects_ten_thousand_and_one() {
    let batch: Vec<Transaction> = (0..10_001)
        .map(|i| tx(&format!("t{i}"), &format!("S{i}"), &format!("R{i}"), 0))
        .collect();
    let err = analyze_batch(&batch).expect_err("over the cap");
    assert!(
        matches!(&err, AnalysisError::BatchTooLarge { len: 10_001, max: 10_000 }),
        "{err}"
    );
    assert!(err.is_validation(), "size rejection is a validation error");
}

#[test]
fn unparseable_timestamp_fails_the_whole_batch() {
    let mut batch = vec![tx("t1", "A", "B", 0)];
    batch.push(Transaction {
        transaction_id: "t2".to_string(),
        sender_id: "B".to_string(),
        receiver_id: "C".to_string(),
        amount: 10.0,
        timestamp: "not-a-time".to_string(),
    });
    let err = analyze_batch(&batch).expect_err("bad timestamp");
    match err {
        AnalysisError::InvalidTimestamp { transaction_id, raw } => {
            assert_eq!(transaction_id, "t2");
            assert_eq!(raw, "not-a-time");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_batch_yields_an_empty_report() {
    let report = analyze_batch(&[]).expect("empty batch is legal");
    assert!(report.suspicious_accounts.is_empty());
    assert!(report.fraud_rings.is_empty());
    assert!(report.shell_chains.is_empty());
    assert_eq!(report.summary.total_accounts, 0);
}

#[test]
fn self_transfers_do_not_crash_any_detector() {
    let batch = vec![
        tx("t1", "A", "A", 0),
        tx("t2", "A", "A", 1),
        tx("t3", "A", "B", 2),
    ];
    let report = analyze_batch(&batch).expect("self-transfers are legal input");
    assert!(report.fraud_rings.is_empty());
    assert_eq!(report.summary.total_accounts, 2);
}

#[test]
fn report_serializes_with_contract_field_names() {
    let batch = generate(Scenario::Mixed, 17, 40);
    let report = analyze_batch(&batch).expect("analysis");
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "suspicious_accounts",
        "fraud_rings",
        "smurfing",
        "shell_chains",
        "graph",
        "summary",
    ] {
        assert!(json.get(key).is_some(), "missing top-level key {key}");
    }
    assert!(json["smurfing"].get("fanIn").is_some());
    assert!(json["smurfing"].get("fanOut").is_some());
    let summary = &json["summary"];
    for key in [
        "total_transactions",
        "total_accounts",
        "suspicious_accounts_count",
        "fraud_rings_detected",
        "smurfing_fan_in_detected",
        "smurfing_fan_out_detected",
        "shell_chains_detected",
        "analysis_timestamp",
    ] {
        assert!(summary.get(key).is_some(), "missing summary key {key}");
    }
    if let Some(ring) = json["fraud_rings"].as_array().and_then(|r| r.first()) {
        assert!(ring.get("type").is_some(), "ring type key is 'type'");
    }
}

#[test]
fn generated_scenarios_trip_their_detectors() {
    let ring = analyze_batch(&generate(Scenario::Ring, 3, 0)).unwrap();
    assert!(!ring.fraud_rings.is_empty(), "ring scenario yields a ring");

    let fan_in = analyze_batch(&generate(Scenario::FanIn, 4, 0)).unwrap();
    assert_eq!(fan_in.smurfing.fan_in.len(), 1);
    assert!(fan_in.smurfing.fan_out.is_empty());

    let fan_out = analyze_batch(&generate(Scenario::FanOut, 5, 0)).unwrap();
    assert_eq!(fan_out.smurfing.fan_out.len(), 1);

    // The shell_chain scenario mints its path members sequentially, so
    // the injected chain is ACC-0000..ACC-000N with N+1 = batch len + 1.
    let batch = generate(Scenario::ShellChain, 6, 0);
    let injected: Vec<String> = (0..=batch.len()).map(|i| format!("ACC-{i:04}")).collect();
    let chains = analyze_batch(&batch).unwrap();
    assert!(
        chains.shell_chains.contains(&injected),
        "injected chain {injected:?} missing from {:?}",
        chains.shell_chains
    );
}

#[test]
fn background_scenario_is_clean() {
    let report = analyze_batch(&generate(Scenario::Background, 11, 45)).unwrap();
    assert!(report.fraud_rings.is_empty());
    assert!(report.smurfing.fan_in.is_empty());
    assert!(report.smurfing.fan_out.is_empty());
    assert!(report.shell_chains.is_empty());
}

#[test]
fn custom_config_flows_through_the_engine() {
    let mut cfg = fraudlens_core::EngineConfig::default();
    cfg.max_transactions = 2;
    let engine = AnalysisEngine::new(cfg);
    let batch = vec![tx("t1", "A", "B", 0), tx("t2", "B", "C", 1), tx("t3", "C", "A", 2)];
    assert!(engine.analyze(&batch).is_err());
    assert!(engine.analyze(&batch[..2]).is_ok());
}
