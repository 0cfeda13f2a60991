//! CLI entry point for the LS-8 runner binary.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use ls8::errors::EXIT_FAILURE;
use ls8::loader::load_into;
use ls8_core::{DecimalLineSink, Machine, MachineConfig, StopReason, TraceEvent, TraceSink};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

/// Run an LS-8 program image.
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(name = "ls8", version, about)]
struct Args {
    /// Program file: one binary literal per line, `#` starts a comment.
    program: PathBuf,

    /// Print machine state and disassembly to stderr before each instruction.
    #[arg(long)]
    trace: bool,

    /// Stop after retiring N instructions.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Print the final machine state as JSON to stdout, also after a fault.
    #[arg(long)]
    dump_state: bool,
}

impl Args {
    const fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            tracing_enabled: self.trace,
            step_limit: self.max_steps,
        }
    }
}

/// Writes trace events to stderr: a state line per fetch, effects indented.
struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart { state, .. } => {
                let listing = state
                    .disassemble()
                    .map(|row| format!("  {row}"))
                    .unwrap_or_default();
                eprintln!("{state}{listing}");
            }
            TraceEvent::RegisterWrite { reg, value } => eprintln!("    {reg} <- {value}"),
            TraceEvent::Output { value } => eprintln!("    out {value}"),
            TraceEvent::Halted { pc } => eprintln!("    halt at {pc:02X}"),
            TraceEvent::FaultRaised { fault, pc } => eprintln!("    fault at {pc:02X}: {fault}"),
        }
    }
}

fn dump_state(machine: &Machine, mut stdout: impl Write) -> Result<(), i32> {
    let rendered = serde_json::to_string_pretty(&machine.snapshot()).map_err(|e| {
        eprintln!("error: failed to serialize machine state: {e}");
        EXIT_FAILURE
    })?;
    writeln!(stdout, "{rendered}").map_err(|e| {
        eprintln!("error: failed to write machine state: {e}");
        EXIT_FAILURE
    })
}

fn run(args: &Args) -> Result<(), i32> {
    let mut machine = Machine::with_config(args.machine_config());

    if let Err(error) = load_into(&mut machine, &args.program) {
        eprintln!("{}", error.format_for_stderr());
        return Err(error.exit_code());
    }

    let mut output = DecimalLineSink::new(io::stdout().lock());

    let result = if args.trace {
        machine.run_traced(&mut output, &mut StderrTrace)
    } else {
        machine.run(&mut output)
    };

    let status = match result {
        Ok(outcome) => {
            if outcome.stop == StopReason::StepLimit {
                eprintln!(
                    "warning: step limit of {} reached at pc {:#04X} before HLT",
                    outcome.steps,
                    machine.pc()
                );
            }
            Ok(())
        }
        Err(fault) => {
            eprintln!("error: {fault}");
            Err(EXIT_FAILURE)
        }
    };

    if args.dump_state {
        dump_state(&machine, output.into_inner())?;
    }

    status
}

fn main() {
    let args = Args::parse();

    let exit_code = match run(&args) {
        Ok(()) => 0,
        Err(code) => code,
    };

    std::process::exit(exit_code);
}
