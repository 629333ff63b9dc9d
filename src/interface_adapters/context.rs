use crate::domain::{AgentPeer, RenderTarget, ThreadToken};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Runtime-side identity of one agent: its name, its control thread and
/// whether a condition is being tested on its behalf.
pub struct AgentContext {
    name: Arc<str>,
    owner: OnceLock<ThreadToken>,
    testing_condition: AtomicBool,
    render_target: Option<RenderTarget>,
}

impl AgentContext {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            owner: OnceLock::new(),
            testing_condition: AtomicBool::new(false),
            render_target: None,
        }
    }

    pub fn with_render_target(mut self, target: RenderTarget) -> Self {
        self.render_target = Some(target);
        self
    }

    /// Records the calling thread as the control thread. Only the first call wins.
    pub fn bind_current_thread(&self) -> bool {
        self.owner.set(ThreadToken::current()).is_ok()
    }

    /// Raises the testing flag until the returned scope is dropped.
    pub fn condition_scope(&self) -> ConditionScope<'_> {
        self.testing_condition.store(true, Ordering::SeqCst);
        ConditionScope { context: self }
    }
}

impl AgentPeer for AgentContext {
    fn name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    fn owner_thread(&self) -> Option<ThreadToken> {
        self.owner.get().copied()
    }

    fn is_testing_condition(&self) -> bool {
        self.testing_condition.load(Ordering::SeqCst)
    }

    fn render_target(&self) -> Option<RenderTarget> {
        self.render_target.clone()
    }
}

pub struct ConditionScope<'a> {
    context: &'a AgentContext,
}

impl Drop for ConditionScope<'_> {
    fn drop(&mut self) {
        self.context.testing_condition.store(false, Ordering::SeqCst);
    }
}
