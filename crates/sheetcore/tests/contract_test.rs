use sheetcore::{
    reconcile, reconcile_into, ContractError, OutputSpec, ValidationPolicy, Value, WorkflowState,
};
use std::collections::HashMap;

fn single(field: &str) -> OutputSpec {
    OutputSpec::Single(field.to_string())
}

fn multi(fields: &[&str]) -> OutputSpec {
    OutputSpec::Multi(fields.iter().map(|f| f.to_string()).collect())
}

fn mapping(pairs: &[(&str, i64)]) -> Value {
    Value::Object(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Number(*v as f64)))
            .collect(),
    )
}

#[test]
fn single_output_scalar_merges_directly() {
    let delta = reconcile("n", &single("answer"), ValidationPolicy::Error, "42".into()).unwrap();
    assert_eq!(delta, HashMap::from([("answer".to_string(), "42".into())]));
}

#[test]
fn single_output_mapping_merges_verbatim() {
    // a mapping return bypasses the single-field check entirely
    let produced = mapping(&[("foo", 1), ("bar", 2)]);
    let delta = reconcile("n", &single("answer"), ValidationPolicy::Error, produced).unwrap();
    assert_eq!(delta.len(), 2);
    assert!(delta.contains_key("foo"));
    assert!(delta.contains_key("bar"));
    assert!(!delta.contains_key("answer"));
}

#[test]
fn multi_output_missing_field_under_error_names_the_missing() {
    let err = reconcile(
        "n",
        &multi(&["result", "status"]),
        ValidationPolicy::Error,
        mapping(&[("result", 1)]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::MissingFields {
            node: "n".to_string(),
            fields: vec!["status".to_string()]
        }
    );
}

#[test]
fn multi_output_missing_field_under_warn_merges_the_present() {
    let delta = reconcile(
        "n",
        &multi(&["result", "status"]),
        ValidationPolicy::Warn,
        mapping(&[("result", 1)]),
    )
    .unwrap();
    assert_eq!(delta, HashMap::from([("result".to_string(), 1.into())]));
}

#[test]
fn multi_output_missing_field_under_ignore_merges_the_present() {
    let delta = reconcile(
        "n",
        &multi(&["result", "status"]),
        ValidationPolicy::Ignore,
        mapping(&[("result", 1)]),
    )
    .unwrap();
    assert_eq!(delta, HashMap::from([("result".to_string(), 1.into())]));
}

#[test]
fn undeclared_fields_are_dropped_under_lenient_policies() {
    for policy in [ValidationPolicy::Ignore, ValidationPolicy::Warn] {
        let delta = reconcile(
            "n",
            &multi(&["a", "b"]),
            policy,
            mapping(&[("a", 1), ("b", 2), ("c", 3)]),
        )
        .unwrap();
        assert_eq!(
            delta,
            HashMap::from([("a".to_string(), 1.into()), ("b".to_string(), 2.into())])
        );
    }
}

#[test]
fn undeclared_fields_fail_under_error() {
    let err = reconcile(
        "n",
        &multi(&["a", "b"]),
        ValidationPolicy::Error,
        mapping(&[("a", 1), ("b", 2), ("c", 3)]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::UndeclaredFields {
            node: "n".to_string(),
            fields: vec!["c".to_string()]
        }
    );
}

#[test]
fn scalar_for_multi_output_wraps_into_first_field_when_lenient() {
    for policy in [ValidationPolicy::Ignore, ValidationPolicy::Warn] {
        let delta = reconcile("n", &multi(&["first", "second"]), policy, "x".into()).unwrap();
        assert_eq!(delta, HashMap::from([("first".to_string(), "x".into())]));
    }
}

#[test]
fn scalar_for_multi_output_fails_under_error() {
    let err = reconcile(
        "n",
        &multi(&["first", "second"]),
        ValidationPolicy::Error,
        "x".into(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::ScalarForMultiOutput {
            node: "n".to_string()
        }
    );
}

#[test]
fn failed_reconcile_leaves_state_untouched() {
    let mut state = WorkflowState::new();
    state.set("existing", "kept".into());

    let result = reconcile_into(
        "n",
        &multi(&["result", "status"]),
        ValidationPolicy::Error,
        mapping(&[("result", 1)]),
        &mut state,
    );

    assert!(result.is_err());
    assert_eq!(state.len(), 1);
    assert_eq!(state.get("existing"), Some(&"kept".into()));
}

#[test]
fn successful_reconcile_merges_atomically() {
    let mut state = WorkflowState::new();
    reconcile_into(
        "n",
        &multi(&["a", "b"]),
        ValidationPolicy::Warn,
        mapping(&[("a", 1), ("b", 2)]),
        &mut state,
    )
    .unwrap();

    assert_eq!(state.len(), 2);
    assert_eq!(state.get("a"), Some(&1.into()));
    assert_eq!(state.get("b"), Some(&2.into()));
}
