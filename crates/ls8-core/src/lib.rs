//! Core fetch-decode-execute engine for the LS-8 virtual machine.

/// Fault taxonomy shared by every stage of the machine.
pub mod fault;
pub use fault::{AddressSpace, Fault, FaultClass};

/// Fixed-size main memory.
pub mod memory;
pub use memory::{byte_operand, validate_address, Memory, MEMORY_BYTES};

/// Register file and run-state model.
pub mod state;
pub use state::{Register, RegisterFile, RunState, REGISTER_COUNT};

/// Arithmetic-logic unit.
pub mod alu;
pub use alu::AluOp;

/// Opcode table.
pub mod encoding;
pub use encoding::{Opcode, OPCODE_TABLE};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{Decoder, Instruction};

/// Host-facing configuration, hooks and outcomes.
pub mod api;
pub use api::{
    DecimalLineSink, MachineConfig, MachineSnapshot, NoTrace, OutputError, OutputSink,
    RunOutcome, SnapshotVersion, StepOutcome, StopReason, TraceEvent, TraceSink,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{commit_execution, execute_instruction, step_one, ExecuteState};

/// The machine itself.
pub mod machine;
pub use machine::Machine;

/// Debug state snapshots.
pub mod trace;
pub use trace::{TraceSnapshot, TRACE_WINDOW};

/// Instruction disassembly.
pub mod disasm;
pub use disasm::{disassemble_one, DisassemblyRow};

#[cfg(test)]
use proptest as _;
