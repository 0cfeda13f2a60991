use std::fmt;

use crate::fault::{AddressSpace, Fault};
use crate::memory::validate_address;

/// Number of general-purpose registers (`R0..R7`).
pub const REGISTER_COUNT: usize = 8;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    /// All registers in index order.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Array index of this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps an index to a register, `None` for anything past `R7`.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Decodes a register operand byte fetched from memory.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] in the register space when the
    /// byte does not name one of `R0..R7`.
    pub fn from_operand(byte: u8) -> Result<Self, Fault> {
        Self::from_index(usize::from(byte)).ok_or(Fault::AddressOutOfRange {
            space: AddressSpace::Registers,
            address: usize::from(byte),
        })
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.index())
    }
}

/// Eight 8-bit registers, all zero at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterFile {
    values: [u8; REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads a register.
    #[must_use]
    pub const fn get(&self, reg: Register) -> u8 {
        self.values[reg.index()]
    }

    /// Writes a register.
    pub const fn set(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
    }

    /// Reads a register by raw index.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `index >= REGISTER_COUNT`.
    pub fn read(&self, index: usize) -> Result<u8, Fault> {
        let index = validate_address(AddressSpace::Registers, index, REGISTER_COUNT)?;
        Ok(self.values[index])
    }

    /// Writes a register by raw index.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `index >= REGISTER_COUNT`.
    pub fn write(&mut self, index: usize, value: u8) -> Result<(), Fault> {
        let index = validate_address(AddressSpace::Registers, index, REGISTER_COUNT)?;
        self.values[index] = value;
        Ok(())
    }

    /// All register values in index order.
    #[must_use]
    pub const fn values(&self) -> [u8; REGISTER_COUNT] {
        self.values
    }

    /// Builds a register file from raw values.
    #[must_use]
    pub const fn from_values(values: [u8; REGISTER_COUNT]) -> Self {
        Self { values }
    }
}
