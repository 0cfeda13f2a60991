//! Register file and run-state model.

/// Register identifiers and register file storage.
pub mod registers;
/// Execution state machine.
pub mod run_state;

pub use registers::{Register, RegisterFile, REGISTER_COUNT};
pub use run_state::RunState;
