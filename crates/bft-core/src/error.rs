//! Error types for the transpiler.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unmatched ']' at node {position}")]
    UnmatchedLoopEnd { position: usize },

    #[error("{count} loop(s) left unclosed")]
    UnclosedLoop { count: usize },

    #[error("Pointer moved out of bounds to cell {position} (memory has {memory_size} cells)")]
    PointerOutOfBounds { position: i64, memory_size: usize },

    #[error("Fuel exhausted after {executed} nodes")]
    FuelExhausted { executed: u64 },

    #[error("Unknown optimization pass: {0}")]
    UnknownPass(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
