//! Instruction execution pipeline.
//!
//! Each cycle runs in three phases:
//! 1. Fetch and decode the instruction at `PC`
//! 2. Compute every side effect into an [`ExecuteState`]
//! 3. Commit output, register write, and `PC` advance in that order
//!
//! Faults raised in phases 1-2 leave the machine untouched; a failing output
//! sink aborts phase 3 before any register or `PC` change.

use crate::alu;
use crate::api::{OutputSink, StepOutcome, TraceEvent, TraceSink};
use crate::decoder::{Decoder, Instruction};
use crate::fault::Fault;
use crate::machine::Machine;
use crate::state::{Register, RegisterFile, RunState};
use crate::trace::TraceSnapshot;

/// Side effects computed for one instruction, pending commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Register write to apply.
    pub register_write: Option<(Register, u8)>,
    /// Value to hand to the output sink.
    pub output: Option<u8>,
    /// New `PC` after commit; `None` leaves `PC` unchanged.
    pub next_pc: Option<usize>,
    /// Whether the machine halts after commit.
    pub halt: bool,
}

/// Computes the side effects of `instr` fetched at `pc`.
///
/// # Errors
///
/// Returns [`Fault::DivisionByZero`] from the ALU.
pub fn execute_instruction(
    instr: &Instruction,
    registers: &RegisterFile,
    pc: usize,
) -> Result<ExecuteState, Fault> {
    let next_pc = Some(pc + instr.encoded_len());

    let exec = match *instr {
        Instruction::Hlt => ExecuteState {
            halt: true,
            ..ExecuteState::default()
        },
        Instruction::Ldi { reg, imm } => ExecuteState {
            register_write: Some((reg, imm)),
            next_pc,
            ..ExecuteState::default()
        },
        Instruction::Prn { reg } => ExecuteState {
            output: Some(registers.get(reg)),
            next_pc,
            ..ExecuteState::default()
        },
        Instruction::Alu { op, dest, src } => ExecuteState {
            register_write: Some((dest, alu::evaluate(registers, op, dest, src)?)),
            next_pc,
            ..ExecuteState::default()
        },
    };

    Ok(exec)
}

/// Applies a computed [`ExecuteState`] to the machine.
///
/// # Errors
///
/// Returns [`Fault::OutputFailed`] when the sink rejects a `PRN` value; in
/// that case nothing else is committed.
pub fn commit_execution(
    machine: &mut Machine,
    exec: &ExecuteState,
    pc: usize,
    output: &mut dyn OutputSink,
    trace: &mut dyn TraceSink,
) -> Result<(), Fault> {
    let tracing = machine.config.tracing_enabled;

    if let Some(value) = exec.output {
        output
            .emit(value)
            .map_err(|_| Fault::OutputFailed { pc })?;
        if tracing {
            trace.on_event(TraceEvent::Output { value });
        }
    }

    if let Some((reg, value)) = exec.register_write {
        machine.registers.set(reg, value);
        if tracing {
            trace.on_event(TraceEvent::RegisterWrite { reg, value });
        }
    }

    if let Some(next_pc) = exec.next_pc {
        machine.pc = next_pc;
    }

    if exec.halt {
        machine.run_state = RunState::Halted;
        if tracing {
            trace.on_event(TraceEvent::Halted { pc });
        }
    }

    Ok(())
}

/// Runs a single fetch-decode-execute cycle.
///
/// A halted machine reports [`StepOutcome::Halted`] without side effects. A
/// faulted machine returns its latched fault. Any new fault is latched.
///
/// # Errors
///
/// Returns the fault raised during fetch, decode, execute or commit.
pub fn step_one(
    machine: &mut Machine,
    output: &mut dyn OutputSink,
    trace: &mut dyn TraceSink,
) -> Result<StepOutcome, Fault> {
    match &machine.run_state {
        RunState::Faulted(fault) => return Err(fault.clone()),
        RunState::Halted => return Ok(StepOutcome::Halted),
        RunState::Running => {}
    }

    let pc = machine.pc;
    match cycle(machine, pc, output, trace) {
        Ok(outcome) => Ok(outcome),
        Err(fault) => {
            if machine.config.tracing_enabled {
                trace.on_event(TraceEvent::FaultRaised {
                    fault: fault.clone(),
                    pc,
                });
            }
            machine.run_state = RunState::Faulted(fault.clone());
            Err(fault)
        }
    }
}

fn cycle(
    machine: &mut Machine,
    pc: usize,
    output: &mut dyn OutputSink,
    trace: &mut dyn TraceSink,
) -> Result<StepOutcome, Fault> {
    if machine.config.tracing_enabled {
        if let Some(opcode) = machine.memory.get(pc) {
            trace.on_event(TraceEvent::InstructionStart {
                pc,
                opcode,
                state: TraceSnapshot::capture(machine),
            });
        }
    }

    let instruction = Decoder::decode(&machine.memory, pc)?;
    let exec = execute_instruction(&instruction, &machine.registers, pc)?;
    commit_execution(machine, &exec, pc, output, trace)?;

    if exec.halt {
        Ok(StepOutcome::Halted)
    } else {
        Ok(StepOutcome::Retired {
            pc,
            len: instruction.encoded_len(),
        })
    }
}
