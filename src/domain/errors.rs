// Domain-level errors and outcomes for the turn handoff protocol.

use std::fmt;

/// Which side of the call guard a facade call counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Calls that write intents into the action buffer.
    Set,
    /// Calls that read status or remaining values.
    Get,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Set => f.write_str("set"),
            CallKind::Get => f.write_str("get"),
        }
    }
}

/// Failures of the engine side of the handoff.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine stopped accepting turns or dropped the reply.
    #[error("engine disconnected")]
    Disconnected,
}

/// Protocol misuse or a lost engine. These end the agent's control logic;
/// the agent must not catch and retry them.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("too many calls to {kind} methods ({calls}) without advancing a turn")]
    GuardExceeded { kind: CallKind, calls: u32 },
    #[error("turns can only be advanced from the agent's control thread")]
    WrongThreadAccess,
    #[error("cannot take action while a wait condition is being tested")]
    IllegalDuringConditionTest,
    #[error("turn could not be completed: {0}")]
    EngineUnavailable(#[from] EngineError),
}

/// Why an intent left the action buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The numeric argument was NaN.
    InvalidNumber,
    /// The agent has no energy left.
    NoEnergy,
}

/// Result of a non-fatal intent setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Recorded,
    Ignored(IgnoreReason),
}

impl IntentOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, IntentOutcome::Recorded)
    }
}
