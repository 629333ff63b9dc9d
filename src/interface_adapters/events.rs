use crate::domain::{ProxyError, WaitCondition, WorldEvent};
use crate::interface_adapters::context::AgentContext;
use crate::use_cases::{ControlProxy, EventDispatcher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

pub type EventHandler =
    Box<dyn FnMut(&WorldEvent, &mut ControlProxy) -> Result<(), ProxyError> + Send>;

/// Per-agent event queue fed by the engine and drained at turn boundaries.
///
/// Custom events are conditions registered up front; each boundary they are
/// tested with the agent's testing flag raised, and every one that holds is
/// delivered as [`WorldEvent::Custom`] after the engine's own events.
pub struct EventQueue {
    context: Arc<AgentContext>,
    events_rx: mpsc::UnboundedReceiver<WorldEvent>,
    custom: Vec<Box<dyn WaitCondition>>,
    handler: EventHandler,
}

impl EventQueue {
    pub fn new<H>(
        context: Arc<AgentContext>,
        events_rx: mpsc::UnboundedReceiver<WorldEvent>,
        handler: H,
    ) -> Self
    where
        H: FnMut(&WorldEvent, &mut ControlProxy) -> Result<(), ProxyError> + Send + 'static,
    {
        Self {
            context,
            events_rx,
            custom: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn add_custom_event(&mut self, condition: Box<dyn WaitCondition>) {
        self.custom.push(condition);
    }
}

impl EventDispatcher for EventQueue {
    fn process_events(&mut self, proxy: &mut ControlProxy) -> Result<(), ProxyError> {
        let mut pending = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            pending.push(event);
        }

        {
            let _scope = self.context.condition_scope();
            let status = proxy.current_status();
            pending.extend(
                self.custom
                    .iter()
                    .filter(|c| c.test(status))
                    .map(|c| WorldEvent::Custom {
                        name: c.name().to_string(),
                    }),
            );
        }

        for event in &pending {
            trace!(?event, "dispatching event");
            (self.handler)(event, proxy)?;
        }
        Ok(())
    }
}
