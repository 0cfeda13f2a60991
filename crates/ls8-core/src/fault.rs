use std::fmt;

use thiserror::Error;

use crate::state::Register;

/// Storage space targeted by a bounds-checked access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressSpace {
    /// Byte-addressable main memory (`0x00..=0xFF`).
    Memory,
    /// General-purpose register file (`R0..R7`).
    Registers,
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Registers => f.write_str("register"),
        }
    }
}

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Memory or register bounds violation.
    Memory,
    /// Value did not fit the destination cell.
    Operand,
    /// Arithmetic-logic unit rejected the operation.
    Alu,
    /// Decoder rejected an opcode byte.
    Decode,
    /// Program image or snapshot could not be installed.
    Load,
    /// Output sink rejected a `PRN` value.
    Output,
}

/// Machine-level failure taxonomy.
///
/// Every fault is unrecoverable for the current run: the engine latches the
/// fault and refuses further progress until [`crate::Machine::reset`] or a
/// fresh [`crate::Machine::load`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Memory or register access outside the valid index range.
    #[error("{space} address {address:#04X} out of range")]
    AddressOutOfRange {
        /// Storage space that was addressed.
        space: AddressSpace,
        /// Offending index.
        address: usize,
    },
    /// Value does not fit in an 8-bit memory cell.
    #[error("operand value {value} does not fit in a byte")]
    InvalidOperand {
        /// Rejected value.
        value: u32,
    },
    /// ALU operation name did not match any known operation.
    #[error("unsupported ALU operation `{op}`")]
    UnsupportedOperation {
        /// Operation name as requested.
        op: String,
    },
    /// `DIV` with a zero divisor register.
    #[error("division by zero: {dest} / {src}")]
    DivisionByZero {
        /// Destination (dividend) register.
        dest: Register,
        /// Source (divisor) register holding zero.
        src: Register,
    },
    /// Opcode byte is not part of the instruction set.
    #[error("illegal instruction {opcode:#010b} at pc {pc:#04X}")]
    IllegalInstruction {
        /// Unrecognized opcode byte.
        opcode: u8,
        /// Program counter where it was fetched.
        pc: usize,
    },
    /// Program image longer than memory.
    #[error("program of {len} bytes exceeds memory capacity of {capacity} bytes")]
    ProgramTooLarge {
        /// Image length in bytes.
        len: usize,
        /// Memory capacity in bytes.
        capacity: usize,
    },
    /// Output sink refused a `PRN` value.
    #[error("output sink failed at pc {pc:#04X}")]
    OutputFailed {
        /// Program counter of the `PRN` instruction.
        pc: usize,
    },
    /// Snapshot does not describe a valid machine.
    #[error("snapshot layout mismatch: {reason}")]
    SnapshotLayout {
        /// What was wrong with the snapshot.
        reason: String,
    },
}

impl Fault {
    /// Returns the diagnostics class for this fault.
    #[must_use]
    pub const fn class(&self) -> FaultClass {
        match self {
            Self::AddressOutOfRange { .. } => FaultClass::Memory,
            Self::InvalidOperand { .. } => FaultClass::Operand,
            Self::UnsupportedOperation { .. } | Self::DivisionByZero { .. } => FaultClass::Alu,
            Self::IllegalInstruction { .. } => FaultClass::Decode,
            Self::ProgramTooLarge { .. } | Self::SnapshotLayout { .. } => FaultClass::Load,
            Self::OutputFailed { .. } => FaultClass::Output,
        }
    }

    /// Program counter associated with the fault, when one is known.
    #[must_use]
    pub const fn pc(&self) -> Option<usize> {
        match self {
            Self::IllegalInstruction { pc, .. } | Self::OutputFailed { pc } => Some(*pc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressSpace, Fault, FaultClass};
    use crate::state::Register;

    #[test]
    fn class_mapping_matches_fault_taxonomy() {
        assert_eq!(
            Fault::AddressOutOfRange {
                space: AddressSpace::Memory,
                address: 256
            }
            .class(),
            FaultClass::Memory
        );
        assert_eq!(
            Fault::InvalidOperand { value: 300 }.class(),
            FaultClass::Operand
        );
        assert_eq!(
            Fault::DivisionByZero {
                dest: Register::R0,
                src: Register::R1
            }
            .class(),
            FaultClass::Alu
        );
        assert_eq!(
            Fault::UnsupportedOperation { op: "MOD".into() }.class(),
            FaultClass::Alu
        );
        assert_eq!(
            Fault::IllegalInstruction { opcode: 0, pc: 0 }.class(),
            FaultClass::Decode
        );
        assert_eq!(
            Fault::ProgramTooLarge {
                len: 257,
                capacity: 256
            }
            .class(),
            FaultClass::Load
        );
        assert_eq!(Fault::OutputFailed { pc: 4 }.class(), FaultClass::Output);
    }

    #[test]
    fn messages_carry_actionable_context() {
        let illegal = Fault::IllegalInstruction {
            opcode: 0b1111_0000,
            pc: 0x0A,
        };
        assert_eq!(
            illegal.to_string(),
            "illegal instruction 0b11110000 at pc 0x0A"
        );

        let oob = Fault::AddressOutOfRange {
            space: AddressSpace::Registers,
            address: 9,
        };
        assert_eq!(oob.to_string(), "register address 0x09 out of range");

        let div = Fault::DivisionByZero {
            dest: Register::R2,
            src: Register::R5,
        };
        assert_eq!(div.to_string(), "division by zero: R2 / R5");

        let unsupported = Fault::UnsupportedOperation { op: "MOD".into() };
        assert_eq!(unsupported.to_string(), "unsupported ALU operation `MOD`");
    }

    #[test]
    fn pc_is_reported_only_for_execution_faults() {
        assert_eq!(Fault::IllegalInstruction { opcode: 0, pc: 7 }.pc(), Some(7));
        assert_eq!(Fault::OutputFailed { pc: 3 }.pc(), Some(3));
        assert_eq!(Fault::InvalidOperand { value: 256 }.pc(), None);
    }
}
