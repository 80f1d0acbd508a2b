//! End-to-end conformance runs: whole programs stepped from reset to halt,
//! with every retirement checked against the canonical trace format.

use proptest::prelude::*;
use simulator_core::{
    step, FaultCode, MachineState, Reg, RunState, StepOutcome, ENTRY_POINT, HALT_SENTINEL,
};

use rstest as _;
use thiserror as _;

fn booted_with(program: &[u16]) -> MachineState {
    let mut state = MachineState::new();
    for (offset, &word) in (0_u16..).zip(program) {
        state.write_word(ENTRY_POINT + offset, word);
    }
    state.reset();
    state
}

/// Steps until the machine leaves the running state, collecting one rendered
/// trace line per retired instruction.
fn run_to_halt(state: &mut MachineState, max_steps: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for _ in 0..max_steps {
        match step(state) {
            StepOutcome::Retired(trace) => lines.push(trace.to_string()),
            StepOutcome::Halted | StepOutcome::Fault(_) => return lines,
        }
    }
    panic!("program did not terminate within {max_steps} steps");
}

#[test]
fn straight_line_program_produces_the_canonical_trace() {
    let program = [
        0x9005, // CONST R0, #5
        0x9203, // CONST R1, #3
        0x1401, // ADD R2, R0, R1
        0x9600, // CONST R3, #0
        0xD620, // HICONST R3, x20
        0x74C0, // STR R2, R3, #0
        0xF0FF, // TRAP xFF
    ];
    let mut state = booted_with(&program);

    let lines = run_to_halt(&mut state, 16);

    assert_eq!(
        lines,
        [
            "8200 1001000000000101 1 0 0005 1 1 0 0000 0000",
            "8201 1001001000000011 1 1 0003 1 1 0 0000 0000",
            "8202 0001010000000001 1 2 0008 1 1 0 0000 0000",
            "8203 1001011000000000 1 3 0000 1 2 0 0000 0000",
            "8204 1101011000100000 1 3 2000 1 1 0 0000 0000",
            "8205 0111010011000000 0 0 0000 0 0 1 2000 0008",
            "8206 1111000011111111 1 7 8207 1 1 0 0000 0000",
        ]
    );
    assert_eq!(state.run_state(), RunState::Halted);
    assert_eq!(state.read_word(0x2000), 0x0008);
    assert_eq!(state.reg(Reg::R7), 0x8207);
    assert!(state.privileged());
}

#[test]
fn countdown_loop_retires_each_iteration() {
    let program = [
        0x9003,               // CONST R0, #3
        0b0001_000_000_1_11111, // ADD R0, R0, #-1
        0b0000_001_111111110, // BRp #-2
        0xF0FF,               // TRAP xFF
    ];
    let mut state = booted_with(&program);

    let lines = run_to_halt(&mut state, 32);

    // CONST, three decrements, two taken branches plus the final untaken
    // one, then the trap.
    assert_eq!(lines.len(), 1 + 3 + 3 + 1);
    assert_eq!(state.reg(Reg::R0), 0);
    assert_eq!(state.run_state(), RunState::Halted);
}

#[test]
fn trap_and_return_round_trip_privilege() {
    // User code at 0x0000 traps into a handler that reads OS data and
    // returns; the user program then stores the result and halts by
    // jumping to OS halt code.
    let mut state = MachineState::new();
    // user program
    state.write_word(0x0000, 0xF010); // TRAP x10
    state.write_word(0x0001, 0x9600); // CONST R3, #0
    state.write_word(0x0002, 0xD620); // HICONST R3, x20
    state.write_word(0x0003, 0x74C0); // STR R2, R3, #0
    state.write_word(0x0004, 0xF0FF); // TRAP xFF
    // trap handler at x8010: LDR R2, R1, #0 then RTI
    state.write_word(0x8010, 0b0110_010_001_000000);
    state.write_word(0x8011, 0x8000);
    // OS data the handler reads
    state.write_word(0xA000, 0x00AA);
    state.reset();
    state.set_pc(0x0000);
    state.set_reg(Reg::R1, 0xA000);

    let lines = run_to_halt(&mut state, 16);

    assert_eq!(lines.len(), 7);
    assert_eq!(state.run_state(), RunState::Halted);
    assert!(!state.privileged() || state.pc() == HALT_SENTINEL);
    assert_eq!(state.read_word(0x2000), 0x00AA);
}

#[test]
fn fault_terminates_the_run_without_a_trace_line() {
    let program = [
        0x9005, // CONST R0, #5
        0x3000, // reserved opcode
    ];
    let mut state = booted_with(&program);

    let lines = run_to_halt(&mut state, 4);

    assert_eq!(lines.len(), 1);
    assert_eq!(
        state.run_state(),
        RunState::Faulted(FaultCode::InvalidOpcode)
    );
    assert_eq!(state.pc(), HALT_SENTINEL);
}

#[test]
fn unprivileged_os_data_touch_faults_mid_program() {
    let mut state = MachineState::new();
    state.write_word(0x0000, 0x9600); // CONST R3, #0
    state.write_word(0x0001, 0xD6A0); // HICONST R3, xA0
    state.write_word(0x0002, 0b0110_010_011_000000); // LDR R2, R3, #0
    state.reset();
    state.set_pc(0x0000);

    let lines = run_to_halt(&mut state, 8);

    assert_eq!(lines.len(), 2);
    assert_eq!(
        state.run_state(),
        RunState::Faulted(FaultCode::DataProtection)
    );
}

proptest! {
    #[test]
    fn stepping_any_single_word_is_total_and_precise(
        word in any::<u16>(),
        regs in any::<[u16; 8]>(),
    ) {
        let mut state = MachineState::new();
        state.write_word(ENTRY_POINT, word);
        state.reset();
        for (reg, value) in Reg::ALL.iter().copied().zip(regs) {
            state.set_reg(reg, value);
        }
        let before = state.clone();

        match step(&mut state) {
            StepOutcome::Retired(trace) => {
                prop_assert_eq!(trace.pc, ENTRY_POINT);
                prop_assert_eq!(trace.word, word);
                if let Some(codes) = trace.cc_write {
                    prop_assert_eq!(codes.count_ones(), 1);
                }
                prop_assert!(state.run_state().is_running());
            }
            StepOutcome::Halted => prop_assert!(false, "entry point is not the sentinel"),
            StepOutcome::Fault(cause) => {
                // A faulting step latches the cause and touches nothing else.
                prop_assert_eq!(state.pc(), HALT_SENTINEL);
                prop_assert_eq!(state.run_state().latched_fault(), Some(cause));
                for reg in Reg::ALL {
                    prop_assert_eq!(state.reg(reg), before.reg(reg));
                }
                prop_assert_eq!(state.psr(), before.psr());
            }
        }
    }

    #[test]
    fn every_trace_line_has_ten_fixed_width_columns(
        word in any::<u16>(),
        regs in any::<[u16; 8]>(),
    ) {
        let mut state = MachineState::new();
        state.write_word(ENTRY_POINT, word);
        state.reset();
        for (reg, value) in Reg::ALL.iter().copied().zip(regs) {
            state.set_reg(reg, value);
        }

        if let StepOutcome::Retired(trace) = step(&mut state) {
            let line = trace.to_string();
            let columns: Vec<&str> = line.split(' ').collect();
            prop_assert_eq!(columns.len(), 10);
            prop_assert_eq!(columns[0].len(), 4);
            prop_assert_eq!(columns[1].len(), 16);
            prop_assert_eq!(columns[4].len(), 4);
            prop_assert_eq!(columns[8].len(), 4);
            prop_assert_eq!(columns[9].len(), 4);
        }
    }
}
