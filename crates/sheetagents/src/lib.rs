//! Built-in agent library
//!
//! Work agents plus the dynamic-routing orchestrator and its
//! intent-classification boundary.

mod collect;
mod orchestrator;
mod template;

pub use collect::{CollectAgent, CollectAgentFactory};
pub use orchestrator::{
    Candidate, IntentClassifier, KeywordClassifier, OrchestratorAgent, OrchestratorFactory,
};
pub use template::{TemplateAgent, TemplateAgentFactory};

use sheetruntime::AgentCatalog;
use std::sync::Arc;

/// Register all built-in agents with a catalog. The orchestrator is wired
/// to the keyword fallback classifier; register an `OrchestratorFactory`
/// with your own `IntentClassifier` to override it.
pub fn register_builtin(catalog: &mut AgentCatalog) {
    catalog.register(Arc::new(TemplateAgentFactory));
    catalog.register(Arc::new(CollectAgentFactory));
    catalog.register(Arc::new(OrchestratorFactory::new(Arc::new(
        KeywordClassifier,
    ))));
}
