// Use-case level inputs/outputs for the engine world task.

use crate::domain::state::{ProjectileReport, RobotReport};
use crate::domain::{ActionBuffer, TurnResult, WorldEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum EngineInput {
    /// Adds a robot; the reply carries its first baseline and status.
    Join {
        agent_id: u64,
        name: Arc<str>,
        events_tx: mpsc::UnboundedSender<WorldEvent>,
        reply: oneshot::Sender<TurnResult>,
    },
    /// One agent's buffer for the next tick; replied to once resolved.
    Turn {
        agent_id: u64,
        commands: ActionBuffer,
        reply: oneshot::Sender<TurnResult>,
    },
    Leave {
        agent_id: u64,
    },
}

#[derive(Debug, Clone)]
pub struct TurnReport {
    pub time: u64,
    pub robots: Vec<RobotReport>,
    pub projectiles: Vec<ProjectileReport>,
}
