//! Circular-routing detection: simple directed cycles of 3–5 accounts.
//!
//! A bounded DFS runs from every node in graph order. Descent is pruned
//! to neighbors whose id is bytewise >= the start node's id, which caps
//! each distinct cycle to being discovered from its smallest member only
//! — a dedup heuristic, load-bearing for output cardinality and order.
//! Candidates are rotated so the smallest id leads, then deduplicated by
//! exact sequence equality. A cycle and its reverse stay distinct.

use crate::config::EngineConfig;
use crate::graph::TxGraph;
use crate::types::AccountId;
use std::collections::HashSet;

pub fn detect_cycles(graph: &TxGraph, cfg: &EngineConfig) -> Vec<Vec<AccountId>> {
    let mut cycles: Vec<Vec<AccountId>> = Vec::new();
    let mut seen: HashSet<Vec<AccountId>> = HashSet::new();

    for start in graph.nodes() {
        let mut path = vec![start.id.clone()];
        let mut visited: HashSet<AccountId> = HashSet::new();
        visited.insert(start.id.clone());
        walk(graph, &start.id, &mut path, &mut visited, cfg, &mut cycles, &mut seen);
    }

    log::debug!("cycle detection: {} distinct rings", cycles.len());
    cycles
}

fn walk(
    graph: &TxGraph,
    start: &str,
    path: &mut Vec<AccountId>,
    visited: &mut HashSet<AccountId>,
    cfg: &EngineConfig,
    cycles: &mut Vec<Vec<AccountId>>,
    seen: &mut HashSet<Vec<AccountId>>,
) {
    if path.len() > cfg.max_cycle_len {
        return;
    }
    let node = match graph.node(path.last().map(String::as_str).unwrap_or(start)) {
        Some(n) => n,
        None => return,
    };

    // Walk edges, not distinct neighbors: parallel edges re-test closure
    // but dedup collapses them.
    for neighbor in &node.out_edges {
        if neighbor.as_str() == start && path.len() >= cfg.min_cycle_len {
            let normalized = rotate_min_first(path);
            if seen.insert(normalized.clone()) {
                cycles.push(normalized);
            }
            continue;
        }
        if !visited.contains(neighbor) && neighbor.as_str() >= start {
            visited.insert(neighbor.clone());
            path.push(neighbor.clone());
            walk(graph, start, path, visited, cfg, cycles, seen);
            path.pop();
            visited.remove(neighbor);
        }
    }
}

/// Rotate a cycle so its bytewise-smallest id comes first. Rotations of
/// the same ring all normalize to the same sequence; reversals do not.
fn rotate_min_first(cycle: &[AccountId]) -> Vec<AccountId> {
    let min_idx = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&cycle[min_idx..]);
    normalized.extend_from_slice(&cycle[..min_idx]);
    normalized
}
