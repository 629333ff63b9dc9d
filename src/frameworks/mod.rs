// Frameworks layer: process bootstrap, config and control threads.

pub mod agent_thread;
pub mod config;
pub mod demo;
pub mod runner;
