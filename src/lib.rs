pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::agent_thread::{AgentBlueprint, AgentExit, AgentLimits};
pub use frameworks::runner::{run, run_with_config};
pub use use_cases::ControlProxy;
