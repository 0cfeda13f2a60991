//! The execution engine: memory, registers and `PC` owned by one machine.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::alu::{self, AluOp};
use crate::api::{
    MachineConfig, MachineSnapshot, NoTrace, OutputSink, RunOutcome, SnapshotVersion,
    StepOutcome, StopReason, TraceSink,
};
use crate::encoding::Opcode;
use crate::execute::step_one;
use crate::fault::{AddressSpace, Fault};
use crate::memory::{Memory, MEMORY_BYTES};
use crate::state::{Register, RegisterFile, RunState};
use crate::trace::TraceSnapshot;

/// A single LS-8 machine.
///
/// The machine exclusively owns its memory, register file and program
/// counter; `run` borrows it mutably for the whole loop so nothing else can
/// observe or mutate state mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Machine {
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) pc: usize,
    pub(crate) run_state: RunState,
    pub(crate) config: MachineConfig,
}

impl Machine {
    /// Creates a machine with zeroed memory and registers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine with the given configuration.
    #[must_use]
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Main memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable main memory, for hosts that patch images between runs.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Program counter.
    #[must_use]
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> &RunState {
        &self.run_state
    }

    /// Returns `true` once `HLT` has retired.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self.run_state, RunState::Halted)
    }

    /// Installs a program image at address 0 and resets registers, `PC`
    /// and run state.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::ProgramTooLarge`] when the image exceeds memory; the
    /// machine is left untouched in that case.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        self.memory.load_image(image)?;
        self.reset();
        Ok(())
    }

    /// Zeroes registers and `PC` and clears any halt or latched fault.
    /// Memory is preserved.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::default();
        self.pc = 0;
        self.run_state = RunState::Running;
    }

    /// Executes exactly one instruction.
    ///
    /// # Errors
    ///
    /// Returns the fault raised by this instruction, or the fault latched
    /// by an earlier one.
    pub fn step(&mut self, output: &mut dyn OutputSink) -> Result<StepOutcome, Fault> {
        step_one(self, output, &mut NoTrace)
    }

    /// Executes exactly one instruction, reporting trace events to `trace`.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::step`].
    pub fn step_traced(
        &mut self,
        output: &mut dyn OutputSink,
        trace: &mut dyn TraceSink,
    ) -> Result<StepOutcome, Fault> {
        step_one(self, output, trace)
    }

    /// Runs until `HLT` or the configured step limit.
    ///
    /// # Errors
    ///
    /// Propagates the first fault from fetch, decode or execute.
    pub fn run(&mut self, output: &mut dyn OutputSink) -> Result<RunOutcome, Fault> {
        self.run_loop(output, &mut NoTrace, self.config.step_limit, None)
    }

    /// Runs until `HLT` or `max_steps` retired instructions, ignoring the
    /// configured step limit.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::run`].
    pub fn run_with_limit(
        &mut self,
        output: &mut dyn OutputSink,
        max_steps: u64,
    ) -> Result<RunOutcome, Fault> {
        self.run_loop(output, &mut NoTrace, Some(max_steps), None)
    }

    /// Like [`Machine::run`], reporting trace events to `trace`.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::run`].
    pub fn run_traced(
        &mut self,
        output: &mut dyn OutputSink,
        trace: &mut dyn TraceSink,
    ) -> Result<RunOutcome, Fault> {
        self.run_loop(output, trace, self.config.step_limit, None)
    }

    /// Like [`Machine::run`], also stopping once `stop` is set. The flag is
    /// checked once per cycle, before each fetch.
    ///
    /// # Errors
    ///
    /// Same as [`Machine::run`].
    pub fn run_until(
        &mut self,
        output: &mut dyn OutputSink,
        stop: &AtomicBool,
    ) -> Result<RunOutcome, Fault> {
        self.run_loop(output, &mut NoTrace, self.config.step_limit, Some(stop))
    }

    fn run_loop(
        &mut self,
        output: &mut dyn OutputSink,
        trace: &mut dyn TraceSink,
        step_limit: Option<u64>,
        stop: Option<&AtomicBool>,
    ) -> Result<RunOutcome, Fault> {
        let mut steps = 0_u64;

        loop {
            match &self.run_state {
                RunState::Halted => {
                    return Ok(RunOutcome {
                        steps,
                        stop: StopReason::Halted,
                    })
                }
                RunState::Faulted(fault) => return Err(fault.clone()),
                RunState::Running => {}
            }

            // `HLT` does not count as a retired step, so it never exceeds the limit.
            if step_limit.is_some_and(|limit| steps >= limit) && !self.at_halt() {
                return Ok(RunOutcome {
                    steps,
                    stop: StopReason::StepLimit,
                });
            }

            if stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Ok(RunOutcome {
                    steps,
                    stop: StopReason::Interrupted,
                });
            }

            match step_one(self, output, trace)? {
                StepOutcome::Retired { .. } => steps += 1,
                StepOutcome::Halted => {
                    return Ok(RunOutcome {
                        steps,
                        stop: StopReason::Halted,
                    })
                }
            }
        }
    }

    fn at_halt(&self) -> bool {
        self.memory.get(self.pc).and_then(Opcode::from_u8) == Some(Opcode::Hlt)
    }

    /// Applies an ALU operation to registers named by raw index.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] for an index past `R7` and
    /// [`Fault::DivisionByZero`] for `DIV` by a zero register.
    pub fn alu(&mut self, op: AluOp, dest: usize, src: usize) -> Result<u8, Fault> {
        let dest = register_at(dest)?;
        let src = register_at(src)?;
        alu::apply(&mut self.registers, op, dest, src)
    }

    /// Captures `PC`, the three memory cells at `PC`, and all registers.
    #[must_use]
    pub fn trace(&self) -> TraceSnapshot {
        TraceSnapshot::capture(self)
    }

    /// Exports the full machine state.
    #[must_use]
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            version: SnapshotVersion::V1,
            pc: self.pc,
            registers: self.registers.values(),
            memory: self.memory.as_bytes().to_vec(),
            run_state: self.run_state.clone(),
        }
    }

    /// Replaces machine state with a snapshot. Configuration is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::SnapshotLayout`] when the memory image has the wrong
    /// size or `PC` lies past the end of memory.
    pub fn restore(&mut self, snapshot: &MachineSnapshot) -> Result<(), Fault> {
        if snapshot.pc > MEMORY_BYTES {
            return Err(Fault::SnapshotLayout {
                reason: format!("pc {:#04X} past end of memory", snapshot.pc),
            });
        }

        self.memory = Memory::from_image(&snapshot.memory)?;
        self.registers = RegisterFile::from_values(snapshot.registers);
        self.pc = snapshot.pc;
        self.run_state = snapshot.run_state.clone();
        Ok(())
    }
}

fn register_at(index: usize) -> Result<Register, Fault> {
    Register::from_index(index).ok_or(Fault::AddressOutOfRange {
        space: AddressSpace::Registers,
        address: index,
    })
}
