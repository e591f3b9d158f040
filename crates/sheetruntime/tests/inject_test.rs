use async_trait::async_trait;
use sheetcore::{compile_graph, AgentError, NodeModel, SheetRow, Value};
use sheetruntime::{
    bind, inject_registry, verify_injection, Agent, AgentCatalog, AgentContext, AgentFactory,
    AgentRegistry, InstrumentedAgent, RegistrySlot,
};
use std::sync::Arc;

/// Minimal routing-capable agent for injection tests
struct StubRouter {
    slot: RegistrySlot,
}

#[async_trait]
impl Agent for StubRouter {
    fn agent_type(&self) -> &str {
        "stub.router"
    }

    fn registry_slot(&self) -> Option<&RegistrySlot> {
        Some(&self.slot)
    }

    async fn execute(&self, _ctx: AgentContext) -> Result<Value, AgentError> {
        Ok(Value::Null)
    }
}

struct StubWorker;

#[async_trait]
impl Agent for StubWorker {
    fn agent_type(&self) -> &str {
        "stub.worker"
    }

    async fn execute(&self, _ctx: AgentContext) -> Result<Value, AgentError> {
        Ok(Value::String("done".to_string()))
    }
}

struct StubRouterFactory {
    wrapped: bool,
}

impl AgentFactory for StubRouterFactory {
    fn create(&self, _node: &NodeModel) -> Result<Box<dyn Agent>, AgentError> {
        let router = Box::new(StubRouter {
            slot: RegistrySlot::new(),
        });
        if self.wrapped {
            Ok(Box::new(InstrumentedAgent::new(router)))
        } else {
            Ok(router)
        }
    }

    fn agent_type(&self) -> &str {
        "stub.router"
    }
}

struct StubWorkerFactory;

impl AgentFactory for StubWorkerFactory {
    fn create(&self, _node: &NodeModel) -> Result<Box<dyn Agent>, AgentError> {
        Ok(Box::new(StubWorker))
    }

    fn agent_type(&self) -> &str {
        "stub.worker"
    }
}

fn row(node: &str, agent_type: &str) -> SheetRow {
    SheetRow {
        graph: "g".to_string(),
        node: node.to_string(),
        agent_type: agent_type.to_string(),
        inputs: String::new(),
        outputs: "out".to_string(),
        prompt: format!("{} prompt", node),
        context: None,
        successor: None,
        validation: None,
        extra: None,
    }
}

fn catalog(wrapped_router: bool) -> AgentCatalog {
    let mut catalog = AgentCatalog::new();
    catalog.register(Arc::new(StubWorkerFactory));
    catalog.register(Arc::new(StubRouterFactory {
        wrapped: wrapped_router,
    }));
    catalog
}

#[test]
fn zero_routing_nodes_is_a_noop() {
    let rows = vec![row("a", "stub.worker"), row("b", "stub.worker")];
    let model = compile_graph("g", &rows).unwrap();
    let registry = Arc::new(AgentRegistry::from_graph(&model));
    let graph = bind(model, &catalog(false)).unwrap();

    assert_eq!(inject_registry(&graph, &registry), 0);
    assert!(verify_injection(&graph).is_empty());
}

#[test]
fn router_receives_registry_with_same_key_set() {
    let rows = vec![row("worker", "stub.worker"), row("router", "stub.router")];
    let model = compile_graph("g", &rows).unwrap();
    let registry = Arc::new(AgentRegistry::from_graph(&model));
    let graph = bind(model, &catalog(false)).unwrap();

    assert_eq!(inject_registry(&graph, &registry), 1);

    let unit = graph.unit("router").unwrap();
    let slot = unit.registry_slot().unwrap();
    let attached = slot.get().unwrap();
    assert_eq!(attached.names(), registry.names());

    let report = verify_injection(&graph);
    assert_eq!(report.len(), 1);
    assert_eq!(report.get("router"), Some(&true));
}

#[test]
fn injector_unwraps_one_wrapper_layer() {
    let rows = vec![row("worker", "stub.worker"), row("router", "stub.router")];
    let model = compile_graph("g", &rows).unwrap();
    let registry = Arc::new(AgentRegistry::from_graph(&model));
    let graph = bind(model, &catalog(true)).unwrap();

    // wrapped router exposes no slot directly
    assert!(graph.unit("router").unwrap().registry_slot().is_none());

    assert_eq!(inject_registry(&graph, &registry), 1);
    assert_eq!(verify_injection(&graph).get("router"), Some(&true));
}

#[test]
fn empty_registry_skips_injection() {
    let rows = vec![row("router", "stub.router")];
    let model = compile_graph("g", &rows).unwrap();
    let graph = bind(model, &catalog(false)).unwrap();

    let empty = Arc::new(AgentRegistry::default());
    assert_eq!(inject_registry(&graph, &empty), 0);
    assert_eq!(verify_injection(&graph).get("router"), Some(&false));
}

#[test]
fn reinjection_does_not_overwrite() {
    let rows = vec![row("router", "stub.router")];
    let model = compile_graph("g", &rows).unwrap();
    let registry = Arc::new(AgentRegistry::from_graph(&model));
    let graph = bind(model, &catalog(false)).unwrap();

    assert_eq!(inject_registry(&graph, &registry), 1);
    // second pass finds the slot occupied
    assert_eq!(inject_registry(&graph, &registry), 0);
}
