//! Instruction disassembly for trace output and diagnostics.

use std::fmt;

use crate::decoder::{Decoder, Instruction};
use crate::fault::Fault;
use crate::memory::Memory;

/// A single disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRow {
    /// Address of the opcode byte.
    pub address: usize,
    /// Encoded length in bytes (1 for illegal bytes).
    pub len: usize,
    /// Mnemonic, or `.byte` for undecodable bytes.
    pub mnemonic: String,
    /// Formatted operands, possibly empty.
    pub operands: String,
    /// Whether the byte at `address` could not be decoded.
    pub is_illegal: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            f.write_str(&self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}

/// Disassembles the instruction at `address`.
///
/// Returns `None` only when `address` is past the end of memory.
#[must_use]
pub fn disassemble_one(memory: &Memory, address: usize) -> Option<DisassemblyRow> {
    let byte = memory.get(address)?;

    let row = match Decoder::decode(memory, address) {
        Ok(instruction) => DisassemblyRow {
            address,
            len: instruction.encoded_len(),
            mnemonic: instruction.opcode().mnemonic().to_string(),
            operands: format_operands(instruction),
            is_illegal: false,
        },
        Err(fault) => {
            let note = match fault {
                Fault::IllegalInstruction { .. } => "ILLEGAL".to_string(),
                other => other.to_string(),
            };
            DisassemblyRow {
                address,
                len: 1,
                mnemonic: ".byte".to_string(),
                operands: format!("{byte:#04X} ; {note}"),
                is_illegal: true,
            }
        }
    };

    Some(row)
}

fn format_operands(instruction: Instruction) -> String {
    match instruction {
        Instruction::Hlt => String::new(),
        Instruction::Ldi { reg, imm } => format!("{reg}, {imm}"),
        Instruction::Prn { reg } => reg.to_string(),
        Instruction::Alu { dest, src, .. } => format!("{dest}, {src}"),
    }
}
