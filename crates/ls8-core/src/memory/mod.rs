//! Fixed-size byte-addressable main memory.

/// Bounds and value-range validation helpers.
pub mod access;

pub use access::{byte_operand, validate_address};

use crate::fault::{AddressSpace, Fault};

/// Size in bytes of the flat address space.
pub const MEMORY_BYTES: usize = 256;

/// Main memory: `MEMORY_BYTES` cells, all zero at construction.
///
/// Every access is bounds-checked and out-of-range indices fail with
/// [`Fault::AddressOutOfRange`] instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_BYTES],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zeroed memory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [0; MEMORY_BYTES],
        }
    }

    /// Number of addressable cells.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        MEMORY_BYTES
    }

    /// Reads the byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `address >= MEMORY_BYTES`.
    pub fn read(&self, address: usize) -> Result<u8, Fault> {
        let index = validate_address(AddressSpace::Memory, address, MEMORY_BYTES)?;
        Ok(self.cells[index])
    }

    /// Writes `value` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `address >= MEMORY_BYTES`.
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Fault> {
        let index = validate_address(AddressSpace::Memory, address, MEMORY_BYTES)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Writes an untrusted wide value, rejecting anything outside `0..=255`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] for a bad address and
    /// [`Fault::InvalidOperand`] for a value that does not fit in a byte.
    pub fn write_value(&mut self, address: usize, value: u32) -> Result<(), Fault> {
        let index = validate_address(AddressSpace::Memory, address, MEMORY_BYTES)?;
        self.cells[index] = byte_operand(value)?;
        Ok(())
    }

    /// Non-faulting read used by observers; `None` past the end of memory.
    #[must_use]
    pub fn get(&self, address: usize) -> Option<u8> {
        self.cells.get(address).copied()
    }

    /// Full memory image in address order.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Installs `image` at address 0 and zeroes every cell after it.
    ///
    /// Oversized images are rejected before any cell is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::ProgramTooLarge`] when `image` is longer than memory.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > MEMORY_BYTES {
            return Err(Fault::ProgramTooLarge {
                len: image.len(),
                capacity: MEMORY_BYTES,
            });
        }

        self.cells.fill(0);
        self.cells[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Rebuilds memory from a full-size image, as stored in snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::SnapshotLayout`] unless `bytes` is exactly
    /// `MEMORY_BYTES` long.
    pub fn from_image(bytes: &[u8]) -> Result<Self, Fault> {
        let cells: [u8; MEMORY_BYTES] =
            bytes.try_into().map_err(|_| Fault::SnapshotLayout {
                reason: format!(
                    "memory image is {} bytes, expected {MEMORY_BYTES}",
                    bytes.len()
                ),
            })?;
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MEMORY_BYTES};
    use crate::fault::{AddressSpace, Fault};

    #[test]
    fn new_memory_is_zeroed_256_bytes() {
        let memory = Memory::new();
        assert_eq!(memory.capacity(), 256);
        assert_eq!(memory.as_bytes().len(), MEMORY_BYTES);
        assert!(memory.as_bytes().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn read_and_write_cover_full_range() {
        let mut memory = Memory::new();
        memory.write(0x00, 0x11).expect("first cell is writable");
        memory.write(0xFF, 0x22).expect("last cell is writable");

        assert_eq!(memory.read(0x00), Ok(0x11));
        assert_eq!(memory.read(0xFF), Ok(0x22));
    }

    #[test]
    fn out_of_range_access_is_rejected_without_wrapping() {
        let mut memory = Memory::new();
        let expected = Err(Fault::AddressOutOfRange {
            space: AddressSpace::Memory,
            address: 256,
        });

        assert_eq!(memory.read(256), expected);
        assert_eq!(memory.write(256, 0xAA), expected.map(|_| ()));
        assert!(memory.as_bytes().iter().all(|byte| *byte == 0));
        assert_eq!(memory.get(256), None);
    }

    #[test]
    fn write_value_rejects_values_wider_than_a_byte() {
        let mut memory = Memory::new();
        memory.write_value(3, 255).expect("255 fits");
        assert_eq!(memory.read(3), Ok(255));

        assert_eq!(
            memory.write_value(3, 256),
            Err(Fault::InvalidOperand { value: 256 })
        );
        assert_eq!(memory.read(3), Ok(255));
    }

    #[test]
    fn load_image_installs_at_zero_and_clears_tail() {
        let mut memory = Memory::new();
        memory.write(10, 0xEE).expect("in range");

        memory.load_image(&[1, 2, 3]).expect("small image fits");

        assert_eq!(&memory.as_bytes()[..4], &[1, 2, 3, 0]);
        assert_eq!(memory.read(10), Ok(0));
    }

    #[test]
    fn oversized_image_performs_no_partial_write() {
        let mut memory = Memory::new();
        memory.write(0, 0x42).expect("in range");

        let image = vec![0xFF; MEMORY_BYTES + 1];
        assert_eq!(
            memory.load_image(&image),
            Err(Fault::ProgramTooLarge {
                len: 257,
                capacity: 256
            })
        );
        assert_eq!(memory.read(0), Ok(0x42));
        assert_eq!(memory.read(1), Ok(0));
    }

    #[test]
    fn image_of_exact_capacity_is_accepted() {
        let mut memory = Memory::new();
        let image = vec![0x5A; MEMORY_BYTES];
        memory.load_image(&image).expect("exact fit");
        assert_eq!(memory.read(0xFF), Ok(0x5A));
    }

    #[test]
    fn from_image_requires_full_size() {
        assert!(Memory::from_image(&[0; MEMORY_BYTES]).is_ok());
        assert!(matches!(
            Memory::from_image(&[0; 12]),
            Err(Fault::SnapshotLayout { .. })
        ));
    }
}
