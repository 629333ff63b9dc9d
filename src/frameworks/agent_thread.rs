// Control threads: one OS thread per agent, blocking on the engine between turns.

use crate::domain::{ProxyError, WaitCondition};
use crate::interface_adapters::utils::ids::next_agent_id;
use crate::interface_adapters::{
    AgentContext, EngineHandle, EventHandler, EventQueue, Joined, TracingOutput,
};
use crate::use_cases::{ControlProxy, EngineInput, GuardLimits};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{error, info, info_span};

pub type Routine = Box<dyn FnOnce(&mut ControlProxy) -> Result<(), ProxyError> + Send>;

/// Everything needed to bring one agent to life.
pub struct AgentBlueprint {
    pub name: Arc<str>,
    pub routine: Routine,
    pub on_event: EventHandler,
    pub custom_events: Vec<Box<dyn WaitCondition>>,
}

#[derive(Debug, Clone, Copy)]
pub struct AgentLimits {
    pub guard: GuardLimits,
    pub output_max_lines: u32,
}

/// How an agent's control thread ended.
#[derive(Debug)]
pub enum AgentExit {
    Completed { time: u64, dropped_lines: u64 },
    Disabled(ProxyError),
    Panicked,
}

pub fn spawn_agent(
    input_tx: mpsc::Sender<EngineInput>,
    blueprint: AgentBlueprint,
    limits: AgentLimits,
) -> std::io::Result<JoinHandle<AgentExit>> {
    std::thread::Builder::new()
        .name(format!("agent-{}", blueprint.name))
        .spawn(move || run_agent(input_tx, blueprint, limits))
}

fn run_agent(
    input_tx: mpsc::Sender<EngineInput>,
    blueprint: AgentBlueprint,
    limits: AgentLimits,
) -> AgentExit {
    let AgentBlueprint {
        name,
        routine,
        on_event,
        custom_events,
    } = blueprint;
    let agent_id = next_agent_id();
    let span = info_span!("agent", agent = %name, agent_id);
    let _enter = span.enter();

    let context = Arc::new(AgentContext::new(Arc::clone(&name)));
    context.bind_current_thread();

    let Joined {
        engine,
        initial,
        events_rx,
    } = match EngineHandle::join(input_tx, agent_id, Arc::clone(&name)) {
        Ok(joined) => joined,
        Err(e) => {
            error!(error = %e, "agent could not join the engine");
            return AgentExit::Disabled(e.into());
        }
    };

    let mut queue = EventQueue::new(Arc::clone(&context), events_rx, on_event);
    for condition in custom_events {
        queue.add_custom_event(condition);
    }
    let output = Arc::new(TracingOutput::new(Arc::clone(&name), limits.output_max_lines));
    let mut proxy = ControlProxy::new(
        Box::new(engine),
        context,
        output.clone(),
        limits.guard,
        initial,
    )
    .with_dispatcher(Box::new(queue));

    proxy.initialize();
    let result = routine(&mut proxy);
    proxy.cleanup();

    match result {
        Ok(()) => {
            let time = proxy.current_status().time;
            info!(time, dropped_lines = output.dropped(), "agent finished");
            AgentExit::Completed {
                time,
                dropped_lines: output.dropped(),
            }
        }
        Err(e) => {
            error!(error = %e, "agent disabled");
            AgentExit::Disabled(e)
        }
    }
}
