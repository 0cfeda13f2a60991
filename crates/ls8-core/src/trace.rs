//! Human-readable machine state snapshots for debugging.

use std::fmt;

use crate::disasm::{disassemble_one, DisassemblyRow};
use crate::machine::Machine;
use crate::memory::Memory;
use crate::state::REGISTER_COUNT;

/// Number of memory cells shown starting at `PC`.
pub const TRACE_WINDOW: usize = 3;

/// Read-only view of `PC`, the cells at `PC..PC+3`, and all registers.
///
/// Renders as `TRACE: PC | B0 B1 B2 | R0 R1 .. R7` in two-digit hex. Cells
/// past the end of memory render as `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSnapshot {
    /// Program counter.
    pub pc: usize,
    /// Memory cells at `PC`, `PC + 1`, `PC + 2`.
    pub window: [Option<u8>; TRACE_WINDOW],
    /// Register values `R0..R7`.
    pub registers: [u8; REGISTER_COUNT],
}

impl TraceSnapshot {
    /// Captures the current state of `machine` without mutating it.
    #[must_use]
    pub fn capture(machine: &Machine) -> Self {
        let memory = machine.memory();
        let pc = machine.pc();

        Self {
            pc,
            window: std::array::from_fn(|offset| memory.get(pc + offset)),
            registers: machine.registers().values(),
        }
    }

    /// Disassembles the instruction at `PC` from the captured window.
    ///
    /// Every instruction fits in the window, so the result matches
    /// [`disassemble_one`] on the machine's memory.
    #[must_use]
    pub fn disassemble(&self) -> Option<DisassemblyRow> {
        let mut memory = Memory::new();
        for (address, cell) in (self.pc..).zip(self.window) {
            if let Some(byte) = cell {
                memory.write(address, byte).ok()?;
            }
        }
        disassemble_one(&memory, self.pc)
    }
}

impl fmt::Display for TraceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRACE: {:02X} |", self.pc)?;
        for cell in self.window {
            match cell {
                Some(byte) => write!(f, " {byte:02X}")?,
                None => f.write_str(" --")?,
            }
        }
        f.write_str(" |")?;
        for value in self.registers {
            write!(f, " {value:02X}")?;
        }
        Ok(())
    }
}
