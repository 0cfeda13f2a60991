use crate::fault::Fault;

/// Execution state machine for the fetch-decode-execute loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// `HLT` retired; no further instructions execute.
    Halted,
    /// Fault is latched and no further progress is possible without reset or reload.
    Faulted(Fault),
}

impl RunState {
    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<&Fault> {
        match self {
            Self::Faulted(fault) => Some(fault),
            Self::Running | Self::Halted => None,
        }
    }

    /// Returns `true` once the machine can no longer make progress.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}
