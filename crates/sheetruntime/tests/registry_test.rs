use sheetcore::{compile_graph, SheetRow, Value};
use sheetruntime::{resolve_context, AgentRegistry};
use std::collections::HashMap;

fn row_with(node: &str, prompt: &str, context: Option<Value>) -> SheetRow {
    SheetRow {
        graph: "g".to_string(),
        node: node.to_string(),
        agent_type: "work.template".to_string(),
        inputs: String::new(),
        outputs: "out".to_string(),
        prompt: prompt.to_string(),
        context,
        successor: None,
        validation: None,
        extra: None,
    }
}

fn build_registry(rows: Vec<SheetRow>) -> AgentRegistry {
    let model = compile_graph("g", &rows).unwrap();
    AgentRegistry::from_graph(&model)
}

#[test]
fn description_from_context_mapping() {
    let context = Value::Object(HashMap::from([(
        "description".to_string(),
        Value::String("Handles billing".to_string()),
    )]));
    let registry = build_registry(vec![row_with("billing", "ignored prompt", Some(context))]);
    assert_eq!(registry.get("billing").unwrap().description, "Handles billing");
}

#[test]
fn description_from_json_string_context() {
    let context = Value::String(r#"{"description": "From JSON", "tone": "formal"}"#.to_string());
    let registry = build_registry(vec![row_with("a", "prompt", Some(context))]);
    assert_eq!(registry.get("a").unwrap().description, "From JSON");
}

#[test]
fn description_from_key_value_pairs() {
    let context = Value::String("tone: formal, description: Handles refunds".to_string());
    let registry = build_registry(vec![row_with("a", "prompt", Some(context))]);
    assert_eq!(registry.get("a").unwrap().description, "Handles refunds");
}

#[test]
fn equals_separator_also_parses() {
    let map = resolve_context(&Value::String("description=Terse one".to_string()));
    assert_eq!(
        map.get("description"),
        Some(&Value::String("Terse one".to_string()))
    );
}

#[test]
fn unparseable_string_becomes_the_description() {
    let context = Value::String("Just a plain sentence about this node".to_string());
    let registry = build_registry(vec![row_with("a", "prompt", Some(context))]);
    assert_eq!(
        registry.get("a").unwrap().description,
        "Just a plain sentence about this node"
    );
}

#[test]
fn malformed_json_falls_through_to_raw_string() {
    let raw = "{not valid json at all";
    let map = resolve_context(&Value::String(raw.to_string()));
    assert_eq!(map.get("description"), Some(&Value::String(raw.to_string())));
}

#[test]
fn missing_context_falls_back_to_prompt() {
    let registry = build_registry(vec![row_with("a", "Short prompt", None)]);
    let entry = registry.get("a").unwrap();
    assert_eq!(entry.description, "Short prompt");
    assert_eq!(entry.prompt, "Short prompt");
}

#[test]
fn long_prompt_fallback_is_truncated_with_marker() {
    let prompt = "x".repeat(140);
    let registry = build_registry(vec![row_with("a", &prompt, None)]);
    let description = &registry.get("a").unwrap().description;
    assert_eq!(description.chars().count(), 101);
    assert!(description.ends_with('…'));
}

#[test]
fn no_context_and_no_prompt_yields_empty_description() {
    let registry = build_registry(vec![row_with("a", "", None)]);
    assert_eq!(registry.get("a").unwrap().description, "");
}

#[test]
fn registry_keeps_agent_type_verbatim() {
    let registry = build_registry(vec![row_with("a", "p", None)]);
    assert_eq!(registry.get("a").unwrap().agent_type, "work.template");
}

#[test]
fn iteration_order_is_sorted_by_name() {
    let registry = build_registry(vec![
        row_with("zeta", "p", None),
        row_with("alpha", "p", None),
        row_with("mid", "p", None),
    ]);
    let names: Vec<&str> = registry.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
}

#[test]
fn scalar_context_is_treated_as_absent() {
    assert!(resolve_context(&Value::Number(3.0)).is_empty());
    assert!(resolve_context(&Value::Null).is_empty());
    assert!(resolve_context(&Value::String("  ".to_string())).is_empty());
}
