//! Bounds and value-range checks shared by memory and the register file.

use crate::fault::{AddressSpace, Fault};

/// Validates `address` against a storage space of `size` cells.
///
/// # Errors
///
/// Returns [`Fault::AddressOutOfRange`] when `address >= size`.
pub const fn validate_address(
    space: AddressSpace,
    address: usize,
    size: usize,
) -> Result<usize, Fault> {
    if address < size {
        Ok(address)
    } else {
        Err(Fault::AddressOutOfRange { space, address })
    }
}

/// Narrows an untrusted value to a memory byte.
///
/// # Errors
///
/// Returns [`Fault::InvalidOperand`] when `value > 255`.
pub fn byte_operand(value: u32) -> Result<u8, Fault> {
    u8::try_from(value).map_err(|_| Fault::InvalidOperand { value })
}
