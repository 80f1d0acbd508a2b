//! Architectural machine-state model primitives.

/// Register file, program counter, status word, and memory image.
pub mod registers;
/// Deterministic run-state machine for the step driver.
pub mod run_state;

pub use registers::{
    MachineState, Reg, CONDITION_MASK, ENTRY_POINT, GENERAL_REGISTER_COUNT, HALT_SENTINEL,
    PSR_PRIVILEGE,
};
pub use run_state::RunState;
