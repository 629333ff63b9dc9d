// Interface adapters: runtime-side implementations of the proxy's ports.

pub mod context;
pub mod engine_client;
pub mod events;
pub mod output;
pub mod protocol;
pub mod telemetry;
pub mod utils;

pub use context::AgentContext;
pub use engine_client::{EngineHandle, Joined};
pub use events::{EventHandler, EventQueue};
pub use output::TracingOutput;
