use crate::interface::{InputPort, NodeInterface, OutputPort};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Default,
    Carrier,
    External,
}

/// A reusable unit of work a node can run, with the action's own port definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ActionKind,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub input_def: IndexMap<String, InputPort>,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub output_def: IndexMap<String, OutputPort>,
}

impl ActionTemplate {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn input(mut self, name: impl Into<String>, port: InputPort) -> Self {
        self.input_def.insert(name.into(), port);
        self
    }

    pub fn output(mut self, name: impl Into<String>, port: OutputPort) -> Self {
        self.output_def.insert(name.into(), port);
        self
    }

    /// Interface a freshly placed node running this action starts with.
    pub fn interface(&self) -> NodeInterface {
        NodeInterface {
            inputs: self.input_def.clone(),
            outputs: self.output_def.clone(),
        }
    }

    /// `"<title> (<name>)"`, the label of a node running this action.
    pub fn node_label(&self) -> String {
        format!("{} ({})", self.title, self.name)
    }
}

pub(crate) fn find<'a>(actions: &'a [ActionTemplate], name: &str) -> Option<&'a ActionTemplate> {
    actions.iter().find(|a| a.name == name)
}
