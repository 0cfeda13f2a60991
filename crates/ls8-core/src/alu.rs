//! Arithmetic-logic unit operating on the register file.
//!
//! Registers are 8 bits wide; `ADD`, `SUB` and `MUL` wrap modulo 256 and
//! `DIV` truncates toward zero.

use std::fmt;
use std::str::FromStr;

use crate::fault::Fault;
use crate::state::{Register, RegisterFile};

/// Closed set of binary ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AluOp {
    /// `dest = dest + src` (wrapping).
    Add,
    /// `dest = dest - src` (wrapping).
    Sub,
    /// `dest = dest * src` (wrapping).
    Mul,
    /// `dest = dest / src` (truncating).
    Div,
}

impl AluOp {
    /// All operations in declaration order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        }
    }

    /// Computes `a <op> b` without touching any register.
    ///
    /// `None` means division by zero.
    #[must_use]
    pub const fn compute(self, a: u8, b: u8) -> Option<u8> {
        match self {
            Self::Add => Some(a.wrapping_add(b)),
            Self::Sub => Some(a.wrapping_sub(b)),
            Self::Mul => Some(a.wrapping_mul(b)),
            Self::Div => a.checked_div(b),
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for AluOp {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| Fault::UnsupportedOperation { op: s.to_string() })
    }
}

/// Applies `op` to `dest` and `src`, writing the result back into `dest`.
///
/// Returns the value written. A failing operation leaves every register
/// untouched.
///
/// # Errors
///
/// Returns [`Fault::DivisionByZero`] for `DIV` when `src` holds zero.
pub fn apply(
    registers: &mut RegisterFile,
    op: AluOp,
    dest: Register,
    src: Register,
) -> Result<u8, Fault> {
    let result = evaluate(registers, op, dest, src)?;
    registers.set(dest, result);
    Ok(result)
}

/// Computes the result `apply` would write, without committing it.
///
/// # Errors
///
/// Returns [`Fault::DivisionByZero`] for `DIV` when `src` holds zero.
pub fn evaluate(
    registers: &RegisterFile,
    op: AluOp,
    dest: Register,
    src: Register,
) -> Result<u8, Fault> {
    op.compute(registers.get(dest), registers.get(src))
        .ok_or(Fault::DivisionByZero { dest, src })
}
