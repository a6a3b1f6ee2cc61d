//! Configuration types for the transpiler pipeline.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells in the emitted and interpreted memory tape.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// A single peephole optimization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    /// Merge runs of pointer moves
    PointerMoves,
    /// Merge runs of cell adjustments
    CellAdjusts,
    /// Rewrite `[-]` into a direct assignment
    ZeroIdiom,
}

impl Pass {
    /// Pointer moves, then cell adjustments, then the zero idiom.
    ///
    /// The zero idiom only matches a single `-` inside a loop, so it has to
    /// run after cell-adjust runs have been merged.
    pub fn standard_pipeline() -> Vec<Pass> {
        vec![Pass::PointerMoves, Pass::CellAdjusts, Pass::ZeroIdiom]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pass::PointerMoves => "pointer-moves",
            Pass::CellAdjusts => "cell-adjusts",
            Pass::ZeroIdiom => "zero-idiom",
        }
    }

    /// Parse a comma separated pass list such as `pointer-moves,zero-idiom`
    pub fn parse_list(list: &str) -> Result<Vec<Pass>, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pointer-moves" => Ok(Pass::PointerMoves),
            "cell-adjusts" => Ok(Pass::CellAdjusts),
            "zero-idiom" => Ok(Pass::ZeroIdiom),
            other => Err(Error::UnknownPass(other.to_string())),
        }
    }
}

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Passes to run, in order
    pub passes: Vec<Pass>,
    /// Wrap merged cell adjustments to the 8-bit range (-128..=127)
    pub wrap_cells: bool,
    /// Also rewrite `[+]` into an assignment (only sound with wrapping cells)
    pub zero_idiom_accepts_increment: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            passes: Pass::standard_pipeline(),
            wrap_cells: true,
            zero_idiom_accepts_increment: false,
        }
    }
}

impl OptimizerConfig {
    /// Configuration that runs no passes at all
    pub fn disabled() -> Self {
        Self {
            passes: Vec::new(),
            ..Self::default()
        }
    }
}

/// C emitter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Size of the `mem` buffer declared in the prologue
    pub memory_size: usize,
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            indent_width: 4,
        }
    }
}

/// Reference interpreter limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of cells on the tape
    pub memory_size: usize,
    /// Maximum number of IR nodes executed before giving up
    pub max_fuel: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_fuel: 100_000_000,
        }
    }
}

/// Full pipeline configuration, loadable from JSON
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspilerConfig {
    pub optimizer: OptimizerConfig,
    pub emitter: EmitterConfig,
    pub runtime: RuntimeConfig,
}

impl TranspilerConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.emitter.memory_size == 0 {
            return Err(Error::InvalidConfig(
                "emitter.memory_size must be positive".to_string(),
            ));
        }
        if self.runtime.memory_size == 0 {
            return Err(Error::InvalidConfig(
                "runtime.memory_size must be positive".to_string(),
            ));
        }
        if self.optimizer.zero_idiom_accepts_increment && !self.optimizer.wrap_cells {
            return Err(Error::InvalidConfig(
                "zero_idiom_accepts_increment requires wrap_cells".to_string(),
            ));
        }
        Ok(())
    }
}
