//! The transaction graph — an adjacency-indexed directed multigraph.
//!
//! Nodes are stored in first-reference order (sender before receiver
//! within one transaction) and every traversal in the engine iterates
//! them in that order, so a given batch always yields the same walk.
//! Neighbor lists keep duplicates: one entry per transaction, in batch
//! order. They drive traversal, never counting.

use crate::types::{AccountId, ParsedTransaction};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct AccountNode {
    pub id: AccountId,
    /// Receiver ids of this account's outgoing transactions, in batch order.
    pub out_edges: Vec<AccountId>,
    /// Sender ids of this account's incoming transactions, in batch order.
    pub in_edges: Vec<AccountId>,
    /// Transactions where this account was the sender.
    pub transactions: Vec<ParsedTransaction>,
}

#[derive(Debug, Default)]
pub struct TxGraph {
    nodes: Vec<AccountNode>,
    index: HashMap<AccountId, usize>,
}

impl TxGraph {
    /// Build the graph from a batch. An empty batch yields an empty graph;
    /// a self-transfer produces a self-loop edge on one node.
    pub fn build(transactions: &[ParsedTransaction]) -> Self {
        let mut graph = TxGraph::default();
        for tx in transactions {
            let sender = graph.ensure_node(&tx.sender_id);
            graph.nodes[sender].out_edges.push(tx.receiver_id.clone());
            graph.nodes[sender].transactions.push(tx.clone());

            let receiver = graph.ensure_node(&tx.receiver_id);
            graph.nodes[receiver].in_edges.push(tx.sender_id.clone());
        }
        graph
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&i) = self.index.get(id) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(id.to_string(), i);
        self.nodes.push(AccountNode {
            id: id.to_string(),
            out_edges: Vec::new(),
            in_edges: Vec::new(),
            transactions: Vec::new(),
        });
        i
    }

    pub fn node(&self, id: &str) -> Option<&AccountNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Nodes in first-reference order.
    pub fn nodes(&self) -> &[AccountNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
