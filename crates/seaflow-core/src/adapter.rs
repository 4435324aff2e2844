//! Adapters map a node's interface onto its action's parameters, and the consistency check
//! over them.
//!
//! The input adapter is keyed by action parameter and points into the node's merged input context
//! (`"$.url"`). The output adapter is keyed by node output and points into the action's result.
//! Adapters never influence layout or edge validation.

use crate::action::ActionTemplate;
use crate::interface::NodeInterface;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference into a JSON context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamRef {
    /// The canonical `$.name` form.
    Key(String),
    /// Any other JSONPath expression, kept verbatim and never resolved.
    Path(String),
}

impl ParamRef {
    pub fn key(name: impl Into<String>) -> Self {
        ParamRef::Key(name.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            ParamRef::Key(k) => Some(k),
            ParamRef::Path(_) => None,
        }
    }
}

fn is_plain_key(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl From<String> for ParamRef {
    fn from(value: String) -> Self {
        match value.strip_prefix("$.") {
            Some(rest) if is_plain_key(rest) => ParamRef::Key(rest.to_string()),
            _ => ParamRef::Path(value),
        }
    }
}

impl From<&str> for ParamRef {
    fn from(value: &str) -> Self {
        ParamRef::from(value.to_string())
    }
}

impl From<ParamRef> for String {
    fn from(value: ParamRef) -> Self {
        match value {
            ParamRef::Key(k) => format!("$.{k}"),
            ParamRef::Path(p) => p,
        }
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamRef::Key(k) => write!(f, "$.{k}"),
            ParamRef::Path(p) => f.write_str(p),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterMap {
    /// action parameter -> reference into the node's inputs
    #[serde(default)]
    pub input: IndexMap<String, ParamRef>,
    /// node output -> reference into the action's outputs
    #[serde(default)]
    pub output: IndexMap<String, ParamRef>,
}

impl AdapterMap {
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "kebab-case")]
pub enum AdapterIssue {
    UnknownNodeInput { param: String, input: String },
    UnknownActionParam { param: String },
    UnmappedActionInput { param: String },
    UnknownNodeOutput { output: String },
    UnknownActionOutput { output: String, action_output: String },
}

impl fmt::Display for AdapterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterIssue::UnknownNodeInput { param, input } => {
                write!(f, "parameter '{param}' reads '$.{input}', which is not a node input")
            }
            AdapterIssue::UnknownActionParam { param } => {
                write!(f, "the action has no parameter '{param}'")
            }
            AdapterIssue::UnmappedActionInput { param } => {
                write!(f, "required action parameter '{param}' is not mapped")
            }
            AdapterIssue::UnknownNodeOutput { output } => {
                write!(f, "'{output}' is not a declared node output")
            }
            AdapterIssue::UnknownActionOutput {
                output,
                action_output,
            } => write!(
                f,
                "output '{output}' reads '$.{action_output}', which the action does not produce"
            ),
        }
    }
}

/// Checks a node's adapters against its interface and, when known, its action.
///
/// Free-form paths are never resolved and never produce issues. Without an action only the
/// node-side references can be checked.
pub fn check_adapters(
    interface: &NodeInterface,
    adapters: &AdapterMap,
    action: Option<&ActionTemplate>,
) -> Vec<AdapterIssue> {
    let mut issues = Vec::new();

    for (param, reference) in &adapters.input {
        if action.is_some_and(|a| !a.input_def.contains_key(param)) {
            issues.push(AdapterIssue::UnknownActionParam {
                param: param.clone(),
            });
        }
        if let Some(key) = reference.as_key() {
            if !interface.inputs.contains_key(key) {
                issues.push(AdapterIssue::UnknownNodeInput {
                    param: param.clone(),
                    input: key.to_string(),
                });
            }
        }
    }

    if let Some(action) = action {
        for (param, port) in &action.input_def {
            if port.required && !adapters.input.contains_key(param) {
                issues.push(AdapterIssue::UnmappedActionInput {
                    param: param.clone(),
                });
            }
        }
    }

    for (output, reference) in &adapters.output {
        if !interface.outputs.contains_key(output) {
            issues.push(AdapterIssue::UnknownNodeOutput {
                output: output.clone(),
            });
        }
        let Some(key) = reference.as_key() else {
            continue;
        };
        if action.is_some_and(|a| !a.output_def.contains_key(key)) {
            issues.push(AdapterIssue::UnknownActionOutput {
                output: output.clone(),
                action_output: key.to_string(),
            });
        }
    }

    tracing::trace!(issues = issues.len(), "adapter check");
    issues
}
