//! Intermediate Representation (IR) for Brainfuck programs.
//!
//! Source text is tokenized into a flat sequence of [`Node`]s, rewritten by
//! peephole passes and finally emitted as C:
//! - Tokenizer: one character becomes at most one node
//! - Optimizer: run compression and idiom rewriting, each pass a fresh sequence
//! - Emitter: C text with a fixed prologue and epilogue

pub mod node;
pub mod program;
pub mod tokenizer;
pub mod optimizer;
pub mod emitter;
pub mod validation;

pub use node::Node;
pub use program::Program;
pub use tokenizer::{tokenize, tokenize_char};
pub use optimizer::{
    compress_cell_adjusts, compress_pointer_moves, optimize, rewrite_zero_idiom,
    OptimizationStats, Optimizer, PassStats,
};
pub use emitter::{emit, Emitter};
pub use validation::{max_loop_depth, validate_loops};
