use crate::fault::FaultCode;

/// Lifecycle of one simulated run.
///
/// The machine starts in [`RunState::Running`] and leaves it exactly once:
/// either by reaching the halt sentinel or by latching a fault. Both terminal
/// states are sticky until [`crate::state::MachineState::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Instructions retire normally.
    Running,
    /// The program counter reached the halt sentinel.
    Halted,
    /// A protection or decode fault stopped the machine.
    Faulted(FaultCode),
}

impl RunState {
    /// Returns `true` while the machine can still retire instructions.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns the latched fault cause, if any.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;
    use crate::fault::FaultCode;

    #[test]
    fn only_running_state_can_retire() {
        assert!(RunState::Running.is_running());
        assert!(!RunState::Halted.is_running());
        assert!(!RunState::Faulted(FaultCode::InvalidOpcode).is_running());
    }

    #[test]
    fn latched_fault_reports_the_cause() {
        assert_eq!(RunState::Running.latched_fault(), None);
        assert_eq!(RunState::Halted.latched_fault(), None);
        assert_eq!(
            RunState::Faulted(FaultCode::DataProtection).latched_fault(),
            Some(FaultCode::DataProtection)
        );
    }
}
