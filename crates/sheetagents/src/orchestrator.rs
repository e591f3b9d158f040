use async_trait::async_trait;
use sheetcore::{AgentError, NodeModel, RouteError, RoutingDecision, Value};
use sheetruntime::{Agent, AgentContext, AgentFactory, RegistrySlot};
use std::sync::Arc;

/// One routing candidate presented to the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    pub prompt: String,
}

/// Boundary to the external intent-classification mechanism (typically a
/// language-model call). Implementations get the user utterance and the
/// candidate set in a stable order and return a decision; the orchestrator
/// owns membership enforcement, not the classifier.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[Candidate],
    ) -> Result<RoutingDecision, RouteError>;
}

/// Dynamic-routing agent: consults the injected node registry and the
/// classifier to pick the next node, then surfaces the decision through
/// its regular output fields (`next_node`, `confidence`, `rationale`).
pub struct OrchestratorAgent {
    slot: RegistrySlot,
    classifier: Arc<dyn IntentClassifier>,
}

impl OrchestratorAgent {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            slot: RegistrySlot::new(),
            classifier,
        }
    }
}

#[async_trait]
impl Agent for OrchestratorAgent {
    fn agent_type(&self) -> &str {
        "route.orchestrator"
    }

    fn registry_slot(&self) -> Option<&RegistrySlot> {
        Some(&self.slot)
    }

    async fn execute(&self, ctx: AgentContext) -> Result<Value, AgentError> {
        let registry = self
            .slot
            .get()
            .filter(|registry| !registry.is_empty())
            .ok_or_else(|| RouteError::EmptyRegistry {
                node: ctx.node.name.clone(),
            })?;

        let utterance = utterance_input(&ctx)?;

        // Candidate order is the registry's sorted name order; the node
        // itself is not a candidate for its own successor.
        let candidates: Vec<Candidate> = registry
            .iter()
            .filter(|(name, _)| *name != &ctx.node.name)
            .map(|(name, entry)| Candidate {
                name: name.clone(),
                description: entry.description.clone(),
                prompt: entry.prompt.clone(),
            })
            .collect();

        let decision = self
            .classifier
            .classify(&utterance, &candidates)
            .await
            .map_err(AgentError::from)?;

        if !registry.contains(&decision.selected) {
            return Err(AgentError::from(RouteError::SelectionOutsideCandidates {
                selected: decision.selected,
                candidates: registry.names(),
            }));
        }

        tracing::debug!(
            node = %ctx.node.name,
            selected = %decision.selected,
            confidence = decision.confidence,
            "classified intent"
        );
        Ok(Value::Object(decision.into_fields()))
    }
}

/// The utterance is the node's first declared input field, or an input
/// named `utterance` when the sheet declares none.
fn utterance_input(ctx: &AgentContext) -> Result<String, AgentError> {
    let field = ctx
        .node
        .inputs
        .first()
        .map(String::as_str)
        .unwrap_or("utterance");
    let value = ctx.require_input(field)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AgentError::InvalidInput {
            field: field.to_string(),
            expected: "string".to_string(),
        })
}

pub struct OrchestratorFactory {
    classifier: Arc<dyn IntentClassifier>,
}

impl OrchestratorFactory {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }
}

impl AgentFactory for OrchestratorFactory {
    fn create(&self, _node: &NodeModel) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(OrchestratorAgent::new(Arc::clone(&self.classifier))))
    }

    fn agent_type(&self) -> &str {
        "route.orchestrator"
    }
}

/// Deterministic fallback classifier: scores each candidate by token
/// overlap between the utterance and the candidate's name, description,
/// and prompt. Ties break toward the earlier candidate.
pub struct KeywordClassifier;

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[Candidate],
    ) -> Result<RoutingDecision, RouteError> {
        if candidates.is_empty() {
            return Err(RouteError::ClassifierFailed(
                "no candidates to classify against".to_string(),
            ));
        }

        let tokens = tokenize(utterance);
        let mut best: Option<(usize, &Candidate)> = None;

        for candidate in candidates {
            let haystack = format!(
                "{} {} {}",
                candidate.name, candidate.description, candidate.prompt
            )
            .to_lowercase();
            let hits = tokens
                .iter()
                .filter(|token| haystack.contains(token.as_str()))
                .count();
            let better = match best {
                Some((score, _)) => hits > score,
                None => true,
            };
            if better {
                best = Some((hits, candidate));
            }
        }

        // candidates is non-empty, so best is always set by the loop
        let (hits, candidate) = best.ok_or_else(|| {
            RouteError::ClassifierFailed("scoring produced no candidate".to_string())
        })?;
        let confidence = if tokens.is_empty() {
            0.0
        } else {
            hits as f64 / tokens.len() as f64
        };

        Ok(RoutingDecision {
            selected: candidate.name.clone(),
            confidence,
            rationale: format!(
                "matched {}/{} utterance tokens against '{}'",
                hits,
                tokens.len(),
                candidate.name
            ),
        })
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
