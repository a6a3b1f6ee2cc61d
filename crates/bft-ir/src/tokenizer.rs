//! Character-level tokenizer.

use crate::node::Node;

/// Map one character to its node; anything outside `><+-.,[]` is a comment.
pub fn tokenize_char(c: char) -> Option<Node> {
    match c {
        '>' => Some(Node::PointerMove(1)),
        '<' => Some(Node::PointerMove(-1)),
        '+' => Some(Node::CellAdjust(1)),
        '-' => Some(Node::CellAdjust(-1)),
        '.' => Some(Node::Output),
        ',' => Some(Node::Input),
        '[' => Some(Node::LoopStart),
        ']' => Some(Node::LoopEnd),
        _ => None,
    }
}

/// Tokenize a whole source text, dropping comment characters
pub fn tokenize(source: &str) -> Vec<Node> {
    source.chars().filter_map(tokenize_char).collect()
}
