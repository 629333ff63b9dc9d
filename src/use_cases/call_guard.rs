// Bounds the number of facade calls an agent may make between turns.

use crate::domain::CallKind;
use std::sync::atomic::{AtomicU32, Ordering};

/// Per-kind call budgets between two turn advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardLimits {
    pub max_set_calls: u32,
    pub max_get_calls: u32,
}

impl Default for GuardLimits {
    fn default() -> Self {
        Self {
            max_set_calls: 10_000,
            max_get_calls: 10_000,
        }
    }
}

/// The call that reached its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardTrip {
    pub kind: CallKind,
    pub calls: u32,
}

/// Two counters, one per [`CallKind`].
///
/// Atomic so that event handlers re-entering the proxy during a turn advance
/// can count through a shared reference.
#[derive(Debug, Default)]
pub struct CallGuard {
    limits: GuardLimits,
    set_calls: AtomicU32,
    get_calls: AtomicU32,
}

impl CallGuard {
    pub fn new(limits: GuardLimits) -> Self {
        Self {
            limits,
            set_calls: AtomicU32::new(0),
            get_calls: AtomicU32::new(0),
        }
    }

    /// Counts one call and fails once the count reaches the limit.
    pub fn record(&self, kind: CallKind) -> Result<u32, GuardTrip> {
        let (counter, limit) = match kind {
            CallKind::Set => (&self.set_calls, self.limits.max_set_calls),
            CallKind::Get => (&self.get_calls, self.limits.max_get_calls),
        };
        let calls = counter.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        if calls >= limit {
            return Err(GuardTrip { kind, calls });
        }
        Ok(calls)
    }

    pub fn reset(&self) {
        self.set_calls.store(0, Ordering::Relaxed);
        self.get_calls.store(0, Ordering::Relaxed);
    }

    pub fn count(&self, kind: CallKind) -> u32 {
        match kind {
            CallKind::Set => self.set_calls.load(Ordering::Relaxed),
            CallKind::Get => self.get_calls.load(Ordering::Relaxed),
        }
    }

    pub fn limits(&self) -> GuardLimits {
        self.limits
    }
}
