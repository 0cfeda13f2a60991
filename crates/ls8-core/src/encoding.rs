//! Opcode table for the LS-8 instruction set.
//!
//! Opcode bytes follow the `AABCDDDD` layout: `AA` is the operand count,
//! `B` marks ALU instructions, `C` marks instructions that set `PC`, and
//! `DDDD` identifies the instruction within its group.

use crate::alu::AluOp;

/// Assigned opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Halt the machine.
    Hlt = 0b0000_0001,
    /// Load an immediate into a register.
    Ldi = 0b1000_0010,
    /// Print a register as a decimal line.
    Prn = 0b0100_0111,
    /// Multiply two registers through the ALU.
    Mul = 0b1010_0010,
}

/// Single source-of-truth opcode table.
///
/// Any byte not present here is an illegal instruction.
pub const OPCODE_TABLE: &[(u8, Opcode)] = &[
    (0b0000_0001, Opcode::Hlt),
    (0b1000_0010, Opcode::Ldi),
    (0b0100_0111, Opcode::Prn),
    (0b1010_0010, Opcode::Mul),
];

impl Opcode {
    /// Looks up an opcode byte.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(entry, opcode)| (*entry == byte).then_some(*opcode))
    }

    /// Raw opcode byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ldi => "LDI",
            Self::Prn => "PRN",
            Self::Mul => "MUL",
        }
    }

    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_count(self) -> usize {
        operand_count_field(self.as_u8()) as usize
    }

    /// Total encoded length (opcode plus operands).
    #[must_use]
    pub const fn instruction_len(self) -> usize {
        1 + self.operand_count()
    }

    /// ALU operation performed by this opcode, if it is an ALU instruction.
    #[must_use]
    pub const fn alu_op(self) -> Option<AluOp> {
        match self {
            Self::Mul => Some(AluOp::Mul),
            Self::Hlt | Self::Ldi | Self::Prn => None,
        }
    }
}

/// Extracts the `AA` operand-count field from an opcode byte.
#[must_use]
pub const fn operand_count_field(byte: u8) -> u8 {
    byte >> 6
}

/// Returns `true` when the `B` (ALU) bit of an opcode byte is set.
#[must_use]
pub const fn is_alu_field(byte: u8) -> bool {
    byte & 0b0010_0000 != 0
}
