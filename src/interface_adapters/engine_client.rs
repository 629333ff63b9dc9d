use crate::domain::{ActionBuffer, EngineError, TurnEngine, TurnResult, WorldEvent};
use crate::use_cases::EngineInput;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Agent-side end of the engine channels.
///
/// Blocks the calling thread on the async world task, so it must be used from
/// a plain OS thread, never from inside a tokio runtime.
pub struct EngineHandle {
    agent_id: u64,
    input_tx: mpsc::Sender<EngineInput>,
}

/// What an agent gets back when it enters the world.
pub struct Joined {
    pub engine: EngineHandle,
    pub initial: TurnResult,
    pub events_rx: mpsc::UnboundedReceiver<WorldEvent>,
}

impl EngineHandle {
    /// Registers a robot and waits for its first status.
    pub fn join(
        input_tx: mpsc::Sender<EngineInput>,
        agent_id: u64,
        name: Arc<str>,
    ) -> Result<Joined, EngineError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (reply, reply_rx) = oneshot::channel();
        input_tx
            .blocking_send(EngineInput::Join {
                agent_id,
                name,
                events_tx,
                reply,
            })
            .map_err(|_| EngineError::Disconnected)?;
        let initial = reply_rx
            .blocking_recv()
            .map_err(|_| EngineError::Disconnected)?;
        debug!(agent_id, "joined engine");

        Ok(Joined {
            engine: Self { agent_id, input_tx },
            initial,
            events_rx,
        })
    }

    pub fn agent_id(&self) -> u64 {
        self.agent_id
    }
}

impl TurnEngine for EngineHandle {
    fn submit_and_advance(&mut self, commands: ActionBuffer) -> Result<TurnResult, EngineError> {
        let (reply, reply_rx) = oneshot::channel();
        self.input_tx
            .blocking_send(EngineInput::Turn {
                agent_id: self.agent_id,
                commands,
                reply,
            })
            .map_err(|_| EngineError::Disconnected)?;
        reply_rx.blocking_recv().map_err(|_| EngineError::Disconnected)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let agent_id = self.agent_id;
        match self.input_tx.try_send(EngineInput::Leave { agent_id }) {
            Ok(()) => {}
            Err(TrySendError::Full(leave)) => {
                // Waiting for room would stall a runtime worker.
                if tokio::runtime::Handle::try_current().is_ok() {
                    warn!(agent_id, "engine input full; leave not delivered");
                } else if self.input_tx.blocking_send(leave).is_err() {
                    debug!(agent_id, "engine gone before leave");
                }
            }
            Err(TrySendError::Closed(_)) => debug!(agent_id, "engine gone before leave"),
        }
    }
}
