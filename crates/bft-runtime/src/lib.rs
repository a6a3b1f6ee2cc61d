//! Reference interpreter for the IR.
//!
//! Executes node sequences directly with the same memory model as the
//! emitted C: a fixed tape of 8-bit wrapping cells and a cursor starting at
//! the first cell. Execution is bounded by fuel so runaway loops surface as
//! an error instead of hanging the caller.

pub mod machine;

pub use bft_core::RuntimeConfig;
pub use machine::Machine;

use bft_core::Result;
use bft_ir::Node;

/// Run a node sequence on a fresh machine with the default configuration
pub fn run(nodes: &[Node], input: &[u8]) -> Result<Vec<u8>> {
    Machine::new(RuntimeConfig::default()).run(nodes, input)
}
