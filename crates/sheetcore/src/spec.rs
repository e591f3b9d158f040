use crate::error::CompileError;
use crate::row::split_pipe;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Words that may not be used as output field names.
const RESERVED: &[&str] = &["null", "true", "false", "state", "input", "output"];

/// Check one field name against identifier rules: letters, digits and
/// underscores only, no leading digit, not reserved, non-empty after trim.
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty after trimming".to_string());
    }
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if first.is_ascii_digit() {
            return Err("starts with a digit".to_string());
        }
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("contains characters outside [A-Za-z0-9_]".to_string());
    }
    if RESERVED.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(format!("'{}' is a reserved word", name));
    }
    Ok(())
}

/// Declared output field(s) of one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OutputSpec {
    Single(String),
    Multi(Vec<String>),
}

impl OutputSpec {
    /// Parse a pipe-delimited output cell. One resolved name yields
    /// `Single`, two or more yield `Multi`, none is a compile error.
    pub fn parse(cell: &str, node: &str) -> Result<Self, CompileError> {
        let mut fields = split_pipe(cell);
        if fields.is_empty() {
            return Err(CompileError::EmptyOutputSpec {
                node: node.to_string(),
            });
        }
        for field in &fields {
            validate_identifier(field).map_err(|reason| CompileError::InvalidField {
                node: node.to_string(),
                field: field.clone(),
                reason,
            })?;
        }
        if fields.len() == 1 {
            Ok(OutputSpec::Single(fields.remove(0)))
        } else {
            Ok(OutputSpec::Multi(fields))
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, OutputSpec::Multi(_))
    }

    /// First declared field (scalar results of multi-output nodes land here
    /// under lenient policies).
    pub fn first(&self) -> &str {
        match self {
            OutputSpec::Single(field) => field,
            OutputSpec::Multi(fields) => &fields[0],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        match self {
            OutputSpec::Single(field) => vec![field.as_str()],
            OutputSpec::Multi(fields) => fields.iter().map(String::as_str).collect(),
        }
    }
}

/// Per-node strictness for output-contract reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(ValidationPolicy::Ignore),
            "warn" => Ok(ValidationPolicy::Warn),
            "error" => Ok(ValidationPolicy::Error),
            other => Err(other.to_string()),
        }
    }
}
