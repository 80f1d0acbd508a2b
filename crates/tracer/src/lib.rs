//! Object-file loading and the run-to-halt trace driver.
//!
//! The simulator core knows nothing about files: this crate feeds it. The
//! [`loader`] parses the segment-based object format into the memory image,
//! and the [`runner`] steps the machine to termination while streaming one
//! trace line per retired instruction.

/// Segment-based object file parsing.
pub mod loader;
/// The run-to-halt stepping loop.
pub mod runner;

pub use loader::{load_object_bytes, load_object_file, LoadError};
pub use runner::{run_to_halt, RunOutcome};

#[cfg(test)]
use tempfile as _;
