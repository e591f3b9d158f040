//! Core model for the sheet-driven agent graph engine
//!
//! This crate compiles tabular workflow rows into a validated graph model,
//! reconciles agent outputs against their declared field contracts, and
//! defines the shared state and event types the runtime operates on.

mod compiler;
mod contract;
mod error;
mod events;
mod graph;
mod route;
mod row;
mod spec;
mod state;
mod value;

pub use compiler::{compile_graph, compile_rows};
pub use contract::{reconcile, reconcile_into};
pub use error::{AgentError, CompileError, ContractError, RouteError, SheetError};
pub use events::{EventBus, RunEvent, RunId};
pub use graph::{GraphModel, NodeModel};
pub use route::{
    RoutingDecision, CONFIDENCE_FIELD, NEXT_NODE_FIELD, RATIONALE_FIELD,
};
pub use row::{split_pipe, SheetRow};
pub use spec::{validate_identifier, OutputSpec, ValidationPolicy};
pub use state::WorkflowState;
pub use value::Value;

/// Result type for sheetflow operations
pub type Result<T> = std::result::Result<T, SheetError>;
