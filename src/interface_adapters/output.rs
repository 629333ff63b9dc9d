use crate::domain::OutputChannel;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::{info, warn};

const OVERFLOW_NOTICE: &str =
    "SYSTEM: This robot is printing too much between actions. Output stopped until next action.";

/// Agent console that forwards each line to `tracing` under the agent's name.
///
/// At most `max_lines` lines pass per turn. The first line over budget is
/// replaced by a single notice; the rest are counted and dropped until the
/// next [`OutputChannel::reset_counter`].
pub struct TracingOutput {
    agent: Arc<str>,
    max_lines: u32,
    printed: AtomicU32,
    dropped: AtomicU64,
}

impl TracingOutput {
    pub fn new(agent: Arc<str>, max_lines: u32) -> Self {
        Self {
            agent,
            max_lines,
            printed: AtomicU32::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Lines counted against the current turn, including rejected ones.
    pub fn printed_this_turn(&self) -> u32 {
        self.printed.load(Ordering::Relaxed)
    }

    /// Lines dropped over the agent's lifetime.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl OutputChannel for TracingOutput {
    fn println(&self, line: &str) {
        let seen = self.printed.fetch_add(1, Ordering::Relaxed);
        if seen < self.max_lines {
            info!(agent = %self.agent, "{line}");
            return;
        }

        self.dropped.fetch_add(1, Ordering::Relaxed);
        if seen == self.max_lines {
            warn!(agent = %self.agent, max_lines = self.max_lines, "{OVERFLOW_NOTICE}");
        }
    }

    fn reset_counter(&self) {
        self.printed.store(0, Ordering::Relaxed);
    }
}
