//! Execution fault causes.
//!
//! Every fault is detected before any architectural state changes for the
//! offending step, so a faulting instruction never partially retires.

/// Reason an instruction step refused to retire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// Instruction fetch targeted a data region, or an OS region without
    /// privilege.
    #[error("instruction fetch from non-executable address")]
    FetchProtection,

    /// Load or store targeted a code region, or OS data without privilege.
    #[error("data access to protected address")]
    DataProtection,

    /// A 3-bit register field decoded outside `R0..=R7`.
    #[error("register field out of range")]
    InvalidRegister,

    /// The 4-bit primary opcode is one of the reserved encodings.
    #[error("reserved opcode")]
    InvalidOpcode,
}
