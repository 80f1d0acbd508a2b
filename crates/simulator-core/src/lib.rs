//! Functional simulator core for the LC4 16-bit ISA.
//!
//! The crate models a single-cycle von Neumann machine: a 64 Ki-word memory
//! image, eight general-purpose registers, a status word carrying the
//! privilege bit and the one-hot NZP condition codes, and a program counter.
//! [`exec::step`] advances the machine one instruction at a time and reports
//! each retirement as a [`exec::trace::StepTrace`] write-back record, which
//! renders to the canonical single-line trace format.
//!
//! Memory protection is enforced on every step: fetches must come from a
//! code region, data accesses must stay out of code regions, and OS data is
//! reachable only while `PSR[15]` is set. Violations latch a
//! [`fault::FaultCode`] and park the machine on the halt sentinel.

/// Instruction decoding into fully resolved operations.
pub mod decoder;
/// Instruction-word field extraction.
pub mod encoding;
/// The fetch/decode/execute step engine.
pub mod exec;
/// Fault causes.
pub mod fault;
/// Memory image, region map, and protection policy.
pub mod memory;
/// Architectural machine state.
pub mod state;

pub use decoder::Instruction;
pub use exec::trace::{MemAccess, StepTrace};
pub use exec::{step, StepOutcome};
pub use fault::FaultCode;
pub use state::{MachineState, Reg, RunState, ENTRY_POINT, HALT_SENTINEL};
