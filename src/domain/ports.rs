use std::any::Any;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::domain::commands::{ActionBuffer, TurnResult};
use crate::domain::errors::EngineError;

/// Identity of the thread allowed to drive an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadToken(ThreadId);

impl ThreadToken {
    pub fn current() -> Self {
        Self(thread::current().id())
    }
}

/// Opaque drawing surface handed through to agent code untouched.
pub type RenderTarget = Arc<dyn Any + Send + Sync>;

// Port for the authoritative engine. The only point where a turn happens.
pub trait TurnEngine: Send {
    /// Consumes the buffer, blocks until the engine resolved one turn.
    fn submit_and_advance(&mut self, commands: ActionBuffer) -> Result<TurnResult, EngineError>;
}

// Port for the runtime-side identity of an agent.
pub trait AgentPeer: Send + Sync {
    fn name(&self) -> Arc<str>;
    /// Thread recorded as the control thread, if one has been bound.
    fn owner_thread(&self) -> Option<ThreadToken>;
    /// True while a condition test runs on behalf of this agent.
    fn is_testing_condition(&self) -> bool;
    fn render_target(&self) -> Option<RenderTarget> {
        None
    }
}

// Port for the agent's console.
pub trait OutputChannel: Send + Sync {
    fn println(&self, line: &str);
    /// Starts a new per-turn output budget.
    fn reset_counter(&self);
}
