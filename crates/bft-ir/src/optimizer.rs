//! Peephole optimization passes over the IR.
//!
//! Every pass is a single left-to-right scan with constant lookback that
//! reads an immutable sequence and returns a new one. Passes are
//! order-dependent: the zero idiom only recognises `[-]` once runs of `-`
//! have been merged into a single node.

use crate::node::Node;
use bft_core::{OptimizerConfig, Pass};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Node counts around one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub pass: Pass,
    pub nodes_before: usize,
    pub nodes_after: usize,
}

/// Node counts for a whole pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub nodes_before: usize,
    pub nodes_after: usize,
    pub passes: Vec<PassStats>,
}

impl OptimizationStats {
    pub fn nodes_removed(&self) -> usize {
        self.nodes_before.saturating_sub(self.nodes_after)
    }
}

pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Run a single pass
    pub fn run_pass(&self, pass: Pass, nodes: &[Node]) -> Vec<Node> {
        match pass {
            Pass::PointerMoves => self.compress_pointer_moves(nodes),
            Pass::CellAdjusts => self.compress_cell_adjusts(nodes),
            Pass::ZeroIdiom => self.rewrite_zero_idiom(nodes),
        }
    }

    /// Run the configured passes in order
    pub fn optimize(&self, nodes: &[Node]) -> Vec<Node> {
        self.optimize_with_stats(nodes).0
    }

    #[instrument(skip(self, nodes), fields(nodes = nodes.len()))]
    pub fn optimize_with_stats(&self, nodes: &[Node]) -> (Vec<Node>, OptimizationStats) {
        let mut stats = OptimizationStats {
            nodes_before: nodes.len(),
            ..OptimizationStats::default()
        };

        let mut current = nodes.to_vec();
        for &pass in &self.config.passes {
            let next = self.run_pass(pass, &current);
            debug!("Pass {} reduced {} nodes to {}", pass, current.len(), next.len());
            stats.passes.push(PassStats {
                pass,
                nodes_before: current.len(),
                nodes_after: next.len(),
            });
            current = next;
        }

        stats.nodes_after = current.len();
        (current, stats)
    }

    /// Merge each maximal run of pointer moves into one move by their signed sum
    pub fn compress_pointer_moves(&self, nodes: &[Node]) -> Vec<Node> {
        compress_runs(
            nodes,
            |node| match node {
                Node::PointerMove(count) => Some(count),
                _ => None,
            },
            |a, b| Node::pointer_move(a.wrapping_add(b)),
        )
    }

    /// Merge each maximal run of cell adjustments into one adjustment by their signed sum
    pub fn compress_cell_adjusts(&self, nodes: &[Node]) -> Vec<Node> {
        let wrap_cells = self.config.wrap_cells;
        compress_runs(
            nodes,
            |node| match node {
                Node::CellAdjust(count) => Some(count),
                _ => None,
            },
            |a, b| {
                let sum = a.wrapping_add(b);
                Node::cell_adjust(if wrap_cells { wrap_to_cell(sum) } else { sum })
            },
        )
    }

    /// Replace `[-]` with a direct assignment of zero to the current cell
    pub fn rewrite_zero_idiom(&self, nodes: &[Node]) -> Vec<Node> {
        let accepts_increment = self.config.zero_idiom_accepts_increment;
        let is_idiom = |window: (Option<Node>, Option<Node>, Option<Node>)| match window {
            (Some(Node::LoopStart), Some(Node::CellAdjust(step)), Some(Node::LoopEnd)) => {
                step == -1 || (accepts_increment && step == 1)
            }
            _ => false,
        };

        let mut output = Vec::with_capacity(nodes.len());
        let mut oldest: Option<Node> = None;
        let mut middle: Option<Node> = None;

        for now in nodes.iter().copied().map(Some).chain([None, None]) {
            if is_idiom((oldest, middle, now)) {
                output.push(Node::clear());
                oldest = None;
                middle = None;
            } else {
                output.extend(oldest);
                oldest = middle;
                middle = now;
            }
        }

        output
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

/// Fold a sequence, summing adjacent nodes that `count_of` recognises.
///
/// `merge` rebuilds the summed node and returns `None` when the run cancels
/// out, which empties the pending slot so the next run starts fresh.
fn compress_runs(
    nodes: &[Node],
    count_of: impl Fn(Node) -> Option<i32>,
    merge: impl Fn(i32, i32) -> Option<Node>,
) -> Vec<Node> {
    let mut output = Vec::with_capacity(nodes.len());
    let mut pending: Option<Node> = None;

    for now in nodes.iter().copied().map(Some).chain([None]) {
        let counts = (pending.and_then(&count_of), now.and_then(&count_of));
        if let (Some(held), Some(next)) = counts {
            pending = merge(held, next);
            continue;
        }
        output.extend(pending);
        pending = now;
    }

    output
}

/// Reduce a cell delta modulo 256 into `-128..=127`
fn wrap_to_cell(delta: i32) -> i32 {
    delta as i8 as i32
}

/// Pointer-move compression with the default configuration
pub fn compress_pointer_moves(nodes: &[Node]) -> Vec<Node> {
    Optimizer::default().compress_pointer_moves(nodes)
}

/// Cell-adjust compression with the default configuration
pub fn compress_cell_adjusts(nodes: &[Node]) -> Vec<Node> {
    Optimizer::default().compress_cell_adjusts(nodes)
}

/// Zero-idiom rewriting with the default configuration
pub fn rewrite_zero_idiom(nodes: &[Node]) -> Vec<Node> {
    Optimizer::default().rewrite_zero_idiom(nodes)
}

/// The standard three-pass pipeline
pub fn optimize(nodes: &[Node]) -> Vec<Node> {
    Optimizer::default().optimize(nodes)
}
