// Domain layer: turn protocol data, ports and the reference simulation rules.

pub mod commands;
pub mod condition;
pub mod errors;
pub mod events;
pub mod math;
pub mod ports;
pub mod state;
pub mod status;
pub mod systems;
pub mod tuning;

pub use commands::{ActionBuffer, Color, ColorChanges, Projectile, TurnResult};
pub use condition::{NamedCondition, WaitCondition};
pub use errors::{CallKind, EngineError, IgnoreReason, IntentOutcome, ProxyError};
pub use events::WorldEvent;
pub use ports::{AgentPeer, OutputChannel, RenderTarget, ThreadToken, TurnEngine};
pub use status::{BattleRules, StatusSnapshot};
