//! Execution runtime for compiled agent graphs
//!
//! Binds compiled graph models to runnable agents, derives the node
//! metadata registry, injects it into dynamic-routing agents, and runs
//! the resulting graph one turn at a time.

mod agent;
mod bind;
mod catalog;
mod inject;
mod registry;
mod runner;

pub use agent::{Agent, AgentContext, InstrumentedAgent, RegistrySlot};
pub use bind::{bind, ExecutableGraph};
pub use catalog::{AgentCatalog, AgentFactory};
pub use inject::{inject_registry, verify_injection};
pub use registry::{resolve_context, AgentRegistry, RegistryEntry};
pub use runner::{GraphRunner, RunOutcome};
