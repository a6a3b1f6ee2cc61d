//! Core types and utilities shared by the bft transpiler crates.

pub mod config;
pub mod error;

pub use config::*;
pub use error::{Error, Result};
