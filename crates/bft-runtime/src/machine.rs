//! Tape machine that executes IR nodes.

use bft_core::{Error, Result, RuntimeConfig};
use bft_ir::Node;
use tracing::debug;

/// Value stored by `Input` once the input is exhausted, matching `getchar()`
/// returning EOF into a `char` cell.
pub const EOF_BYTE: u8 = 0xFF;

pub struct Machine {
    config: RuntimeConfig,
    tape: Vec<u8>,
    pointer: usize,
    fuel_consumed: u64,
}

impl Machine {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            tape: vec![0; config.memory_size],
            pointer: 0,
            fuel_consumed: 0,
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Nodes executed by the last run
    pub fn fuel_consumed(&self) -> u64 {
        self.fuel_consumed
    }

    /// Zero the tape and move the cursor back to the first cell
    pub fn reset(&mut self) {
        self.tape.iter_mut().for_each(|cell| *cell = 0);
        self.pointer = 0;
        self.fuel_consumed = 0;
    }

    /// Execute `nodes` from a clean tape, returning everything written by `Output`
    pub fn run(&mut self, nodes: &[Node], input: &[u8]) -> Result<Vec<u8>> {
        self.reset();
        let jumps = jump_table(nodes)?;
        let mut input = input.iter().copied();
        let mut output = Vec::new();
        let mut pc = 0;

        while pc < nodes.len() {
            if self.fuel_consumed >= self.config.max_fuel {
                return Err(Error::FuelExhausted {
                    executed: self.fuel_consumed,
                });
            }
            self.fuel_consumed += 1;

            match nodes[pc] {
                Node::PointerMove(count) => {
                    self.pointer = self.offset_cell(count)?;
                }
                Node::CellAdjust(count) => {
                    let cell = &mut self.tape[self.pointer];
                    *cell = cell.wrapping_add(count as u8);
                }
                Node::Output => output.push(self.tape[self.pointer]),
                Node::Input => {
                    self.tape[self.pointer] = input.next().unwrap_or(EOF_BYTE);
                }
                Node::LoopStart => {
                    if self.tape[self.pointer] == 0 {
                        pc = jumps[pc];
                    }
                }
                Node::LoopEnd => {
                    if self.tape[self.pointer] != 0 {
                        pc = jumps[pc];
                    }
                }
                Node::Assign { value, offset } => {
                    let target = self.offset_cell(offset.unwrap_or(0))?;
                    self.tape[target] = value as u8;
                }
            }
            pc += 1;
        }

        debug!("Run consumed {} fuel, wrote {} bytes", self.fuel_consumed, output.len());
        Ok(output)
    }

    fn offset_cell(&self, offset: i32) -> Result<usize> {
        let position = self.pointer as i64 + i64::from(offset);
        usize::try_from(position)
            .ok()
            .filter(|&cell| cell < self.tape.len())
            .ok_or(Error::PointerOutOfBounds {
                position,
                memory_size: self.tape.len(),
            })
    }
}

/// Pair each loop delimiter with the index of its partner
fn jump_table(nodes: &[Node]) -> Result<Vec<usize>> {
    let mut jumps = vec![0; nodes.len()];
    let mut open = Vec::new();

    for (position, node) in nodes.iter().enumerate() {
        match node {
            Node::LoopStart => open.push(position),
            Node::LoopEnd => {
                let start = open.pop().ok_or(Error::UnmatchedLoopEnd { position })?;
                jumps[start] = position;
                jumps[position] = start;
            }
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(Error::UnclosedLoop { count: open.len() });
    }

    Ok(jumps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bft_ir::{optimize, tokenize};

    fn machine() -> Machine {
        Machine::new(RuntimeConfig::default())
    }

    #[test]
    fn test_cells_wrap() {
        let mut machine = machine();
        machine.run(&tokenize("-"), b"").unwrap();
        assert_eq!(machine.tape()[0], 255);

        machine.run(&[Node::CellAdjust(300)], b"").unwrap();
        assert_eq!(machine.tape()[0], 44);
    }

    #[test]
    fn test_echo_input() {
        let output = machine().run(&tokenize(",.>,.>,."), b"hi").unwrap();
        assert_eq!(output, vec![b'h', b'i', EOF_BYTE]);
    }

    #[test]
    fn test_loops_and_assign() {
        let mut machine = machine();
        let output = machine.run(&optimize(&tokenize("+++++[>++<-]>.[-].")), b"").unwrap();
        assert_eq!(output, vec![10, 0]);
        assert_eq!(machine.pointer(), 1);

        let assign = [Node::Assign {
            value: 9,
            offset: Some(2),
        }];
        machine.run(&assign, b"").unwrap();
        assert_eq!(machine.tape()[2], 9);
        assert_eq!(machine.pointer(), 0);
    }

    #[test]
    fn test_skips_loop_on_zero() {
        let output = machine().run(&tokenize("[.]+."), b"").unwrap();
        assert_eq!(output, vec![1]);
    }

    #[test]
    fn test_pointer_out_of_bounds() {
        let err = machine().run(&tokenize("<"), b"").unwrap_err();
        assert!(matches!(err, Error::PointerOutOfBounds { position: -1, .. }));

        let mut small = Machine::new(RuntimeConfig {
            memory_size: 2,
            ..RuntimeConfig::default()
        });
        assert!(small.run(&tokenize(">"), b"").is_ok());
        assert!(small.run(&tokenize(">>"), b"").is_err());
    }

    #[test]
    fn test_fuel_exhausted() {
        let mut machine = Machine::new(RuntimeConfig {
            max_fuel: 100,
            ..RuntimeConfig::default()
        });
        let err = machine.run(&tokenize("+[]"), b"").unwrap_err();
        assert!(matches!(err, Error::FuelExhausted { executed: 100 }));
    }

    #[test]
    fn test_unbalanced_rejected() {
        assert!(matches!(
            machine().run(&tokenize("]"), b""),
            Err(Error::UnmatchedLoopEnd { position: 0 })
        ));
        assert!(matches!(
            machine().run(&tokenize("[["), b""),
            Err(Error::UnclosedLoop { count: 2 })
        ));
    }
}
