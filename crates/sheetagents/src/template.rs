use async_trait::async_trait;
use sheetcore::{AgentError, NodeModel, Value};
use sheetruntime::{Agent, AgentContext, AgentFactory};

/// Renders the node prompt by substituting `{field}` placeholders with
/// input values, returning the rendered text as a single scalar.
pub struct TemplateAgent;

#[async_trait]
impl Agent for TemplateAgent {
    fn agent_type(&self) -> &str {
        "work.template"
    }

    async fn execute(&self, ctx: AgentContext) -> Result<Value, AgentError> {
        let mut rendered = ctx.node.prompt.clone();
        for (field, value) in &ctx.inputs {
            rendered = rendered.replace(&format!("{{{}}}", field), &value.render());
        }
        Ok(Value::String(rendered))
    }
}

pub struct TemplateAgentFactory;

impl AgentFactory for TemplateAgentFactory {
    fn create(&self, _node: &NodeModel) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(TemplateAgent))
    }

    fn agent_type(&self) -> &str {
        "work.template"
    }
}
