use super::status::StatusSnapshot;

/// One-shot predicate over the agent's status.
///
/// Tests must be free of side effects; they only ever see the snapshot, never
/// the proxy. Any `Fn(&StatusSnapshot) -> bool` closure is a condition.
pub trait WaitCondition: Send {
    fn test(&self, status: &StatusSnapshot) -> bool;

    /// Label used in logs and custom events.
    fn name(&self) -> &str {
        "condition"
    }
}

impl<F> WaitCondition for F
where
    F: Fn(&StatusSnapshot) -> bool + Send,
{
    fn test(&self, status: &StatusSnapshot) -> bool {
        self(status)
    }
}

/// A condition carrying its own name, used for custom events.
pub struct NamedCondition<F> {
    name: String,
    predicate: F,
}

impl<F> NamedCondition<F>
where
    F: Fn(&StatusSnapshot) -> bool + Send,
{
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> WaitCondition for NamedCondition<F>
where
    F: Fn(&StatusSnapshot) -> bool + Send,
{
    fn test(&self, status: &StatusSnapshot) -> bool {
        (self.predicate)(status)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
