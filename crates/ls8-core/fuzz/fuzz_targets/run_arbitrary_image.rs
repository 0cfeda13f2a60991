#![no_main]

use libfuzzer_sys::fuzz_target;
use ls8_core::{disassemble_one, Decoder, Machine, MachineConfig, StopReason};

fuzz_target!(|data: &[u8]| {
    let mut machine = Machine::with_config(MachineConfig {
        step_limit: Some(1024),
        ..MachineConfig::default()
    });

    if machine.load(data).is_err() {
        assert!(data.len() > machine.memory().capacity());
        return;
    }

    for pc in 0..data.len() {
        let _ = Decoder::decode(machine.memory(), pc);
        let _ = disassemble_one(machine.memory(), pc);
    }

    let mut out: Vec<u8> = Vec::new();
    let before_trace = machine.trace();
    assert_eq!(machine.trace(), before_trace);

    match machine.run(&mut out) {
        Ok(outcome) => assert!(matches!(
            outcome.stop,
            StopReason::Halted | StopReason::StepLimit
        )),
        Err(fault) => assert_eq!(machine.run_state().latched_fault(), Some(&fault)),
    }
});
