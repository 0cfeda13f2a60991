//! Instruction decoder: turns the bytes at `PC` into an [`Instruction`].

use crate::alu::AluOp;
use crate::encoding::Opcode;
use crate::fault::Fault;
use crate::memory::Memory;
use crate::state::Register;

/// A fully decoded instruction with validated operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `HLT`
    Hlt,
    /// `LDI reg, imm`
    Ldi {
        /// Destination register.
        reg: Register,
        /// Immediate byte.
        imm: u8,
    },
    /// `PRN reg`
    Prn {
        /// Register to print.
        reg: Register,
    },
    /// Two-register ALU instruction (`MUL a, b`).
    Alu {
        /// Operation to apply.
        op: AluOp,
        /// Destination and left operand.
        dest: Register,
        /// Right operand.
        src: Register,
    },
}

impl Instruction {
    /// Opcode this instruction was decoded from.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        match self {
            Self::Hlt => Opcode::Hlt,
            Self::Ldi { .. } => Opcode::Ldi,
            Self::Prn { .. } => Opcode::Prn,
            Self::Alu { .. } => Opcode::Mul,
        }
    }

    /// Encoded length in bytes; also the `PC` advance for non-halting instructions.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        self.opcode().instruction_len()
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes the instruction whose opcode byte lives at `pc`.
    ///
    /// # Errors
    ///
    /// - [`Fault::AddressOutOfRange`] when the opcode or an operand lies past
    ///   the end of memory, or a register operand is not `R0..R7`.
    /// - [`Fault::IllegalInstruction`] when the opcode byte is unassigned.
    pub fn decode(memory: &Memory, pc: usize) -> Result<Instruction, Fault> {
        let byte = memory.read(pc)?;
        let opcode =
            Opcode::from_u8(byte).ok_or(Fault::IllegalInstruction { opcode: byte, pc })?;
        let operand = |offset: usize| memory.read(pc + offset);

        let instruction = match opcode {
            Opcode::Hlt => Instruction::Hlt,
            Opcode::Ldi => Instruction::Ldi {
                reg: Register::from_operand(operand(1)?)?,
                imm: operand(2)?,
            },
            Opcode::Prn => Instruction::Prn {
                reg: Register::from_operand(operand(1)?)?,
            },
            Opcode::Mul => Instruction::Alu {
                op: AluOp::Mul,
                dest: Register::from_operand(operand(1)?)?,
                src: Register::from_operand(operand(2)?)?,
            },
        };

        Ok(instruction)
    }
}
