//! Host-facing contracts for embedding the machine: configuration, output
//! and trace hooks, run outcomes, and snapshots.

use std::io;

use crate::fault::Fault;
use crate::state::{Register, RunState, REGISTER_COUNT};
use crate::trace::TraceSnapshot;

/// Top-level configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Enables dispatch of [`TraceEvent`]s to the attached [`TraceSink`].
    pub tracing_enabled: bool,
    /// Maximum instructions a single `run` call retires before stopping.
    pub step_limit: Option<u64>,
}

/// Output transport failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputError {
    /// The sink could not accept the value.
    WriteFailed,
}

/// Destination for values emitted by `PRN`.
pub trait OutputSink {
    /// Receives one printed register value.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailed`] when the value cannot be delivered.
    fn emit(&mut self, value: u8) -> Result<(), OutputError>;
}

impl OutputSink for Vec<u8> {
    fn emit(&mut self, value: u8) -> Result<(), OutputError> {
        self.push(value);
        Ok(())
    }
}

/// Writes each emitted value as a decimal line to an [`io::Write`].
#[derive(Debug)]
pub struct DecimalLineSink<W> {
    inner: W,
}

impl<W: io::Write> DecimalLineSink<W> {
    /// Wraps a writer.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwraps the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> OutputSink for DecimalLineSink<W> {
    fn emit(&mut self, value: u8) -> Result<(), OutputError> {
        writeln!(self.inner, "{value}").map_err(|_| OutputError::WriteFailed)
    }
}

/// Status of one `step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired and `PC` advanced by `len`.
    Retired {
        /// Program counter of the retired instruction.
        pc: usize,
        /// Encoded length of the retired instruction.
        len: usize,
    },
    /// Machine is halted; `PC` is left on the `HLT` byte.
    Halted,
}

/// Why a run loop returned without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// `HLT` retired.
    Halted,
    /// Configured step limit reached before halting.
    StepLimit,
    /// External stop signal observed between instructions.
    Interrupted,
}

/// Aggregated outcome of a run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of instructions retired by this call, not counting `HLT`.
    pub steps: u64,
    /// Reason the loop stopped.
    pub stop: StopReason,
}

/// Trace events emitted in execution order when tracing is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// Opcode fetched at `pc`.
    InstructionStart {
        /// Program counter used for the fetch.
        pc: usize,
        /// Raw opcode byte.
        opcode: u8,
        /// Machine state before the instruction executes.
        state: TraceSnapshot,
    },
    /// Register written by `LDI` or the ALU.
    RegisterWrite {
        /// Destination register.
        reg: Register,
        /// Value written.
        value: u8,
    },
    /// Value emitted by `PRN`.
    Output {
        /// Printed value.
        value: u8,
    },
    /// `HLT` reached.
    Halted {
        /// Program counter of the `HLT` byte.
        pc: usize,
    },
    /// Fault raised during fetch, decode or execute.
    FaultRaised {
        /// Raised fault.
        fault: Fault,
        /// Program counter active when the fault was observed.
        pc: usize,
    },
}

/// Sink for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Trace sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Stable snapshot schema identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial schema.
    V1 = 1,
}

impl SnapshotVersion {
    /// Converts a wire value to a known snapshot version.
    #[must_use]
    pub const fn from_u16(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }
}

/// Full machine state for export, import and post-run inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineSnapshot {
    /// Snapshot schema version.
    pub version: SnapshotVersion,
    /// Program counter.
    pub pc: usize,
    /// Register values `R0..R7`.
    pub registers: [u8; REGISTER_COUNT],
    /// Full memory image; must be exactly memory-sized on restore.
    pub memory: Vec<u8>,
    /// Run state, including a latched fault.
    pub run_state: RunState,
}
