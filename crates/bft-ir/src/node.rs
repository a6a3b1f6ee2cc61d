//! Node model for the IR.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One translated instruction.
///
/// `PointerMove` and `CellAdjust` always carry a nonzero count. Build them
/// through [`Node::pointer_move`] and [`Node::cell_adjust`], which drop zero
/// counts instead of representing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// Move the cursor; positive is rightward
    PointerMove(i32),
    /// Add to the current cell; positive is an increase
    CellAdjust(i32),
    /// Write the current cell
    Output,
    /// Read into the current cell
    Input,
    /// Loop while the current cell is nonzero
    LoopStart,
    /// Close the innermost open loop
    LoopEnd,
    /// Store a constant; `offset` is relative to the cursor, `None` is the current cell
    Assign { value: i32, offset: Option<i32> },
}

impl Node {
    /// Canonical pointer move for a signed count, `None` when the count is zero
    pub fn pointer_move(count: i32) -> Option<Node> {
        (count != 0).then_some(Node::PointerMove(count))
    }

    /// Canonical cell adjustment for a signed count, `None` when the count is zero
    pub fn cell_adjust(count: i32) -> Option<Node> {
        (count != 0).then_some(Node::CellAdjust(count))
    }

    /// Assignment of zero to the current cell
    pub fn clear() -> Node {
        Node::Assign {
            value: 0,
            offset: None,
        }
    }

    pub fn is_loop_start(&self) -> bool {
        matches!(self, Node::LoopStart)
    }

    pub fn is_loop_end(&self) -> bool {
        matches!(self, Node::LoopEnd)
    }

    /// Returns true if this node opens or closes a loop
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Node::LoopStart | Node::LoopEnd)
    }

    /// Returns true for nodes that only optimization can produce
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Node::Assign { .. })
    }

    /// Short kind name used in logs and stats
    pub fn kind(&self) -> &'static str {
        match self {
            Node::PointerMove(_) => "pointer-move",
            Node::CellAdjust(_) => "cell-adjust",
            Node::Output => "output",
            Node::Input => "input",
            Node::LoopStart => "loop-start",
            Node::LoopEnd => "loop-end",
            Node::Assign { .. } => "assign",
        }
    }
}

fn write_repeated(f: &mut fmt::Formatter<'_>, count: i32, up: char, down: char) -> fmt::Result {
    let symbol = if count >= 0 { up } else { down };
    for _ in 0..count.unsigned_abs() {
        write!(f, "{symbol}")?;
    }
    Ok(())
}

/// Renders the Brainfuck text the node stands for.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Node::PointerMove(count) => write_repeated(f, count, '>', '<'),
            Node::CellAdjust(count) => write_repeated(f, count, '+', '-'),
            Node::Output => f.write_str("."),
            Node::Input => f.write_str(","),
            Node::LoopStart => f.write_str("["),
            Node::LoopEnd => f.write_str("]"),
            Node::Assign { value, offset } => {
                let offset = offset.unwrap_or(0);
                write_repeated(f, offset, '>', '<')?;
                f.write_str("[-]")?;
                write_repeated(f, value, '+', '-')?;
                write_repeated(f, offset.wrapping_neg(), '>', '<')
            }
        }
    }
}
