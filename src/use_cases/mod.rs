// Use cases layer: the agent control facade and the engine it talks to.

pub mod call_guard;
pub mod engine;
pub mod proxy;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use call_guard::{CallGuard, GuardLimits};
pub use engine::{EngineSettings, world_task};
pub use proxy::{ControlProxy, EventDispatcher};
pub use types::{EngineInput, TurnReport};
