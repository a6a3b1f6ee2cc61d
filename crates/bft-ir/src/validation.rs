//! Validation for IR sequences.
//!
//! The optimizer and emitter assume balanced loops and never call into this
//! module; drivers run it up front when they want a diagnosable error.

use crate::node::Node;
use bft_core::{Error, Result};

/// Validate that every `LoopEnd` closes an earlier `LoopStart` and nothing is left open
pub fn validate_loops(nodes: &[Node]) -> Result<()> {
    let mut open = 0usize;

    for (position, node) in nodes.iter().enumerate() {
        match node {
            Node::LoopStart => open += 1,
            Node::LoopEnd => {
                open = open
                    .checked_sub(1)
                    .ok_or(Error::UnmatchedLoopEnd { position })?;
            }
            _ => {}
        }
    }

    if open > 0 {
        return Err(Error::UnclosedLoop { count: open });
    }

    Ok(())
}

/// Deepest loop nesting reached, ignoring unmatched loop ends
pub fn max_loop_depth(nodes: &[Node]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;

    for node in nodes {
        match node {
            Node::LoopStart => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Node::LoopEnd => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}
