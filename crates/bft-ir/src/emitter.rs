//! Emitter from IR to C source text.

use crate::node::Node;
use crate::program::Program;
use bft_core::EmitterConfig;
use std::fmt::Write;
use tracing::debug;

pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Emit a complete C translation unit.
    ///
    /// Depth starts at one level inside `main`. Loop ends dedent before they
    /// are written and loop starts indent after, so braces line up. An
    /// unbalanced sequence still emits; indentation clamps at zero.
    pub fn emit(&self, nodes: &[Node]) -> String {
        let mut out = self.prologue();
        let mut depth: isize = 1;

        for node in nodes {
            if node.is_loop_end() {
                depth -= 1;
            }
            self.write_line(&mut out, depth, &statement(node));
            if node.is_loop_start() {
                depth += 1;
            }
        }

        self.write_line(&mut out, 1, "return 0;");
        out.push_str("}\n");

        debug!("Emitted {} nodes as {} lines of C", nodes.len(), out.lines().count());
        out
    }

    pub fn emit_program(&self, program: &Program) -> String {
        self.emit(program.nodes())
    }

    fn prologue(&self) -> String {
        let mut out = String::from("#include <stdio.h>\n\nint main(void)\n{\n");
        self.write_line(
            &mut out,
            1,
            &format!("char mem[{}] = {{0}};", self.config.memory_size),
        );
        self.write_line(&mut out, 1, "char *ptr = mem;");
        out
    }

    fn write_line(&self, out: &mut String, depth: isize, line: &str) {
        let width = depth.max(0).unsigned_abs() * self.config.indent_width;
        // Writing to a String cannot fail
        let _ = writeln!(out, "{:width$}{}", "", line, width = width);
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

/// The C statement for one node, without indentation
fn statement(node: &Node) -> String {
    match *node {
        Node::PointerMove(1) => "ptr++;".to_string(),
        Node::PointerMove(-1) => "ptr--;".to_string(),
        Node::PointerMove(count) => compound("ptr", count),
        Node::CellAdjust(1) => "(*ptr)++;".to_string(),
        Node::CellAdjust(-1) => "(*ptr)--;".to_string(),
        Node::CellAdjust(count) => compound("(*ptr)", count),
        Node::Output => "putchar(*ptr);".to_string(),
        Node::Input => "*ptr = getchar();".to_string(),
        Node::LoopStart => "while (*ptr) {".to_string(),
        Node::LoopEnd => "}".to_string(),
        Node::Assign {
            value,
            offset: None,
        } => format!("*ptr = {value};"),
        Node::Assign {
            value,
            offset: Some(offset),
        } => format!("ptr[{offset}] = {value};"),
    }
}

fn compound(target: &str, count: i32) -> String {
    if count < 0 {
        format!("{target} -= {};", count.unsigned_abs())
    } else {
        format!("{target} += {count};")
    }
}

/// Emit with the default configuration
pub fn emit(nodes: &[Node]) -> String {
    Emitter::default().emit(nodes)
}
