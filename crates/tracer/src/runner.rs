//! The run-to-halt stepping loop.

use std::io::{self, Write};

use simulator_core::{step, FaultCode, MachineState, StepOutcome};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program counter reached the halt sentinel.
    Halted {
        /// Instructions retired before the halt.
        retired: u64,
    },
    /// A protection or decode fault stopped the machine.
    Faulted {
        /// The latched cause.
        cause: FaultCode,
        /// Instructions retired before the fault.
        retired: u64,
    },
}

/// Steps the machine until it halts or faults, writing one trace line per
/// retired instruction.
///
/// A faulting step writes no trace line; the caller decides how to report
/// the returned cause. The loop runs as long as the program does: a
/// non-terminating program keeps this function running.
///
/// # Errors
///
/// Propagates any failure to write to `trace`.
pub fn run_to_halt<W: Write>(state: &mut MachineState, trace: &mut W) -> io::Result<RunOutcome> {
    let mut retired = 0;
    loop {
        match step(state) {
            StepOutcome::Retired(record) => {
                writeln!(trace, "{record}")?;
                retired += 1;
            }
            StepOutcome::Halted => return Ok(RunOutcome::Halted { retired }),
            StepOutcome::Fault(cause) => return Ok(RunOutcome::Faulted { cause, retired }),
        }
    }
}
