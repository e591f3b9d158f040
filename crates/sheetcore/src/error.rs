use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("unknown agent type: {0}")]
    UnknownAgentType(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fatal problems found while compiling tabular rows into a graph model.
/// Any one of these invalidates the whole graph's compilation result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("graph '{graph}' has no rows")]
    EmptyGraph { graph: String },

    #[error("duplicate node '{node}' in graph '{graph}'")]
    DuplicateNode { graph: String, node: String },

    #[error("node '{node}': empty output specification")]
    EmptyOutputSpec { node: String },

    #[error("node '{node}': invalid output field '{field}': {reason}")]
    InvalidField {
        node: String,
        field: String,
        reason: String,
    },

    #[error("node '{node}': successor '{successor}' not found in graph '{graph}'")]
    UnknownSuccessor {
        graph: String,
        node: String,
        successor: String,
    },

    #[error("graph '{graph}': static successor cycle through '{node}'")]
    StaticCycle { graph: String, node: String },

    #[error("node '{node}': unknown validation policy '{value}'")]
    InvalidPolicy { node: String, value: String },
}

/// Output-contract violations raised under the `error` validation policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("node '{node}': declared output fields missing from result: {fields:?}")]
    MissingFields { node: String, fields: Vec<String> },

    #[error("node '{node}': result contains undeclared fields: {fields:?}")]
    UndeclaredFields { node: String, fields: Vec<String> },

    #[error("node '{node}': multi-output node must return a mapping, got a scalar")]
    ScalarForMultiOutput { node: String },
}

/// Failures owned by the dynamic router.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("orchestrator '{node}' has no registry attached")]
    EmptyRegistry { node: String },

    #[error("selection '{selected}' is outside the candidate set {candidates:?}")]
    SelectionOutsideCandidates {
        selected: String,
        candidates: Vec<String>,
    },

    #[error("classification failed: {0}")]
    ClassifierFailed(String),
}

#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("missing required input: {0}")]
    MissingInput(String),

    #[error("invalid input '{field}': expected {expected}")]
    InvalidInput { field: String, expected: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Route(#[from] RouteError),
}
