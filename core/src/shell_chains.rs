//! Shell-chain tracing: multi-hop paths through low-activity accounts.
//!
//! An account with 2–3 total appearances in the batch (sender and
//! receiver both counted; a self-transfer counts twice) is a shell
//! candidate. The tracer DFSes from every node along outgoing edges,
//! recording any path of 3+ distinct accounts whose interior is all
//! shells, up to 6 accounts per path. Recording happens in preorder,
//! the moment a path qualifies, before it is extended further.

use crate::config::EngineConfig;
use crate::graph::TxGraph;
use crate::types::{AccountId, ParsedTransaction};
use std::collections::{HashMap, HashSet};

/// Per-account total transaction counts for one batch, iterable in
/// first-appearance order.
pub struct ActivityCensus {
    counts: HashMap<AccountId, u32>,
    order: Vec<AccountId>,
}

impl ActivityCensus {
    pub fn tally(transactions: &[ParsedTransaction]) -> Self {
        let mut census = ActivityCensus {
            counts: HashMap::new(),
            order: Vec::new(),
        };
        for tx in transactions {
            census.bump(&tx.sender_id);
            census.bump(&tx.receiver_id);
        }
        census
    }

    fn bump(&mut self, id: &str) {
        match self.counts.get_mut(id) {
            Some(n) => *n += 1,
            None => {
                self.counts.insert(id.to_string(), 1);
                self.order.push(id.to_string());
            }
        }
    }

    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn is_shell(&self, id: &str, cfg: &EngineConfig) -> bool {
        let n = self.count(id);
        n >= cfg.shell_tx_min && n <= cfg.shell_tx_max
    }

    /// Accounts in first-appearance order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, u32)> {
        self.order.iter().map(move |id| (id, self.counts[id]))
    }
}

pub fn trace_shell_chains(
    graph: &TxGraph,
    census: &ActivityCensus,
    cfg: &EngineConfig,
) -> Vec<Vec<AccountId>> {
    let mut recorded: Vec<Vec<AccountId>> = Vec::new();

    for start in graph.nodes() {
        let mut path = vec![start.id.clone()];
        let mut visited: HashSet<AccountId> = HashSet::new();
        visited.insert(start.id.clone());
        walk(graph, census, cfg, &mut path, &mut visited, &mut recorded);
    }

    let kept = dedup_contained(recorded, cfg.max_chains_internal);
    log::debug!("shell chains: {} kept after dedup", kept.len());
    kept
}

fn walk(
    graph: &TxGraph,
    census: &ActivityCensus,
    cfg: &EngineConfig,
    path: &mut Vec<AccountId>,
    visited: &mut HashSet<AccountId>,
    recorded: &mut Vec<Vec<AccountId>>,
) {
    if path.len() >= 3 {
        let interior = &path[1..path.len() - 1];
        if interior.iter().all(|id| census.is_shell(id, cfg)) {
            recorded.push(path.clone());
        }
    }
    if path.len() >= cfg.max_chain_len {
        return;
    }

    let node = match graph.node(path.last().map(String::as_str).unwrap_or_default()) {
        Some(n) => n,
        None => return,
    };
    for neighbor in &node.out_edges {
        if !visited.contains(neighbor) {
            visited.insert(neighbor.clone());
            path.push(neighbor.clone());
            walk(graph, census, cfg, path, visited, recorded);
            path.pop();
            visited.remove(neighbor);
        }
    }
}

/// Forward-only containment dedup: a chain is dropped iff its id sequence
/// is a contiguous subsequence of a chain kept earlier. Compared as
/// sequences, so ids containing separator characters cannot collide.
fn dedup_contained(chains: Vec<Vec<AccountId>>, cap: usize) -> Vec<Vec<AccountId>> {
    let mut kept: Vec<Vec<AccountId>> = Vec::new();
    for chain in chains {
        let contained = kept.iter().any(|longer| is_contiguous_sub(&chain, longer));
        if !contained {
            kept.push(chain);
        }
    }
    kept.truncate(cap);
    kept
}

fn is_contiguous_sub(needle: &[AccountId], hay: &[AccountId]) -> bool {
    needle.len() <= hay.len() && hay.windows(needle.len()).any(|w| w == needle)
}
