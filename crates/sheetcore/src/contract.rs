use crate::error::ContractError;
use crate::spec::{OutputSpec, ValidationPolicy};
use crate::state::WorkflowState;
use crate::Value;
use std::collections::HashMap;

/// Reconcile what a node actually produced against its declared output
/// fields, returning the delta to merge into workflow state.
///
/// A single-output node returning a mapping has the mapping merged
/// verbatim, without checking it against the declared field — mapping
/// returns are treated as authoritative.
pub fn reconcile(
    node: &str,
    spec: &OutputSpec,
    policy: ValidationPolicy,
    produced: Value,
) -> Result<HashMap<String, Value>, ContractError> {
    match spec {
        OutputSpec::Single(field) => match produced {
            Value::Object(map) => Ok(map),
            scalar => Ok(HashMap::from([(field.clone(), scalar)])),
        },
        OutputSpec::Multi(fields) => match produced {
            Value::Object(map) => reconcile_multi(node, fields, policy, map),
            scalar => match policy {
                ValidationPolicy::Error => Err(ContractError::ScalarForMultiOutput {
                    node: node.to_string(),
                }),
                ValidationPolicy::Warn => {
                    tracing::warn!(
                        node,
                        field = %fields[0],
                        "scalar result from multi-output node wrapped into first declared field"
                    );
                    Ok(HashMap::from([(fields[0].clone(), scalar)]))
                }
                ValidationPolicy::Ignore => Ok(HashMap::from([(fields[0].clone(), scalar)])),
            },
        },
    }
}

/// Reconcile and merge in one atomic step: state is only touched after the
/// whole delta is known to be legal under the node's policy.
pub fn reconcile_into(
    node: &str,
    spec: &OutputSpec,
    policy: ValidationPolicy,
    produced: Value,
    state: &mut WorkflowState,
) -> Result<(), ContractError> {
    let delta = reconcile(node, spec, policy, produced)?;
    state.apply(delta);
    Ok(())
}

fn reconcile_multi(
    node: &str,
    declared: &[String],
    policy: ValidationPolicy,
    mut map: HashMap<String, Value>,
) -> Result<HashMap<String, Value>, ContractError> {
    let mut missing: Vec<String> = declared
        .iter()
        .filter(|field| !map.contains_key(*field))
        .cloned()
        .collect();
    missing.sort();

    let mut extra: Vec<String> = map
        .keys()
        .filter(|key| !declared.iter().any(|field| field == *key))
        .cloned()
        .collect();
    extra.sort();

    if policy == ValidationPolicy::Error {
        if !missing.is_empty() {
            return Err(ContractError::MissingFields {
                node: node.to_string(),
                fields: missing,
            });
        }
        if !extra.is_empty() {
            return Err(ContractError::UndeclaredFields {
                node: node.to_string(),
                fields: extra,
            });
        }
    } else if policy == ValidationPolicy::Warn {
        if !missing.is_empty() {
            tracing::warn!(node, fields = ?missing, "declared output fields missing from result");
        }
        if !extra.is_empty() {
            tracing::warn!(node, fields = ?extra, "dropping undeclared fields from result");
        }
    }

    for key in &extra {
        map.remove(key);
    }
    Ok(map)
}
