//! Program structure wrapping a node sequence.

use crate::node::Node;
use crate::optimizer::{OptimizationStats, Optimizer};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};

/// A complete tokenized (and possibly optimized) program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub nodes: Vec<Node>,
    pub version: u32,
}

impl Program {
    pub fn new() -> Self {
        Self::with_nodes(Vec::new())
    }

    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes, version: 1 }
    }

    /// Tokenize source text into a program
    pub fn from_source(source: &str) -> Self {
        Self::with_nodes(tokenize(source))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count loops still present as `LoopStart` nodes
    pub fn loop_count(&self) -> usize {
        self.count_where(Node::is_loop_start)
    }

    pub fn count_where(&self, predicate: impl Fn(&Node) -> bool) -> usize {
        self.nodes.iter().filter(|&node| predicate(node)).count()
    }

    /// Return a new program with the optimizer's passes applied
    pub fn optimized(&self, optimizer: &Optimizer) -> (Program, OptimizationStats) {
        let (nodes, stats) = optimizer.optimize_with_stats(&self.nodes);
        (
            Program {
                nodes,
                version: self.version,
            },
            stats,
        )
    }

    /// Decompile back to Brainfuck text
    pub fn to_source(&self) -> String {
        self.nodes.iter().map(Node::to_string).collect()
    }

    pub fn to_json(&self) -> Result<String, bft_core::Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, bft_core::Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the program to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, bft_core::Error> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a program from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bft_core::Error> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
