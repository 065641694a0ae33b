//! Ring detection properties through the public API.

use fraudlens_core::{analyze_batch, Transaction};

fn tx(id: &str, from: &str, to: &str, minute: u32) -> Transaction {
    Transaction {
        transaction_id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        amount: 1_500.0,
        timestamp: format!("2024-05-01T10:{minute:02}:00Z"),
    }
}

/// Build the edge list of one directed loop over `ids`.
fn loop_of(ids: &[&str]) -> Vec<Transaction> {
    (0..ids.len())
        .map(|i| {
            tx(
                &format!("t{i}"),
                ids[i],
                ids[(i + 1) % ids.len()],
                i as u32,
            )
        })
        .collect()
}

#[test]
fn rotations_of_one_ring_collapse_to_one_entry() {
    // The same triangle, entered at three different points. Detection
    // must still report exactly one ring.
    let mut batch = loop_of(&["A", "B", "C"]);
    let mut shifted: Vec<Transaction> = loop_of(&["B", "C", "A"]);
    for (i, t) in shifted.iter_mut().enumerate() {
        t.transaction_id = format!("s{i}");
    }
    batch.extend(shifted);

    let report = analyze_batch(&batch).expect("analysis");
    assert_eq!(report.fraud_rings.len(), 1, "{:?}", report.fraud_rings);
    assert_eq!(report.fraud_rings[0].accounts[0], "A", "smallest id leads");
}

#[test]
fn ring_lengths_three_to_five_are_reported() {
    for len in 3..=5 {
        let ids: Vec<String> = (0..len).map(|i| format!("N{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let report = analyze_batch(&loop_of(&refs)).expect("analysis");
        assert_eq!(report.fraud_rings.len(), 1, "loop of {len}");
        assert_eq!(report.fraud_rings[0].cycle_length, len);
    }
}

#[test]
fn loops_outside_the_band_are_ignored() {
    for len in [2usize, 6, 7] {
        let ids: Vec<String> = (0..len).map(|i| format!("N{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let report = analyze_batch(&loop_of(&refs)).expect("analysis");
        assert!(report.fraud_rings.is_empty(), "loop of {len} is not a ring");
    }
}

#[test]
fn disjoint_rings_number_in_detection_order() {
    // Two triangles; node insertion order puts the A-ring first.
    let mut batch = loop_of(&["A1", "A2", "A3"]);
    let mut second = loop_of(&["B1", "B2", "B3"]);
    for (i, t) in second.iter_mut().enumerate() {
        t.transaction_id = format!("b{i}");
    }
    batch.extend(second);

    let report = analyze_batch(&batch).expect("analysis");
    assert_eq!(report.fraud_rings.len(), 2);
    assert_eq!(report.fraud_rings[0].ring_id, "RING-001");
    assert_eq!(report.fraud_rings[0].accounts[0], "A1");
    assert_eq!(report.fraud_rings[1].ring_id, "RING-002");
    assert_eq!(report.fraud_rings[1].accounts[0], "B1");
}

#[test]
fn shared_account_in_two_rings_scores_per_ring() {
    // HUB sits on two triangles: 2 x 30 cycle points.
    let batch = vec![
        tx("t1", "HUB", "X1", 0),
        tx("t2", "X1", "X2", 1),
        tx("t3", "X2", "HUB", 2),
        tx("t4", "HUB", "Y1", 3),
        tx("t5", "Y1", "Y2", 4),
        tx("t6", "Y2", "HUB", 5),
    ];
    let report = analyze_batch(&batch).expect("analysis");
    assert_eq!(report.fraud_rings.len(), 2);

    let hub = report
        .suspicious_accounts
        .iter()
        .find(|s| s.account_id == "HUB")
        .expect("HUB is suspicious");
    assert!(hub.score >= 60, "two rings: {}", hub.score);
    let cycle_tags = hub
        .reasons
        .iter()
        .filter(|r| *r == "Cycle participant")
        .count();
    assert_eq!(cycle_tags, 1, "tag appears once despite two rings");
}
