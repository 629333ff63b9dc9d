use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_AGENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id for an agent entering a world. Never zero.
pub fn next_agent_id() -> u64 {
    NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed)
}
