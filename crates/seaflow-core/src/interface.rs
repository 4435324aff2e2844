//! Node interfaces: the named inputs a node consumes and the outputs it produces.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared value type of a port.
///
/// Parsed leniently: common aliases (`int`, `float`, `bool`, `dict`, `list`, ...) map onto the five
/// kinds and anything unrecognised is treated as `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PortType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PortType {
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::String => "String",
            PortType::Number => "Number",
            PortType::Boolean => "Boolean",
            PortType::Object => "Object",
            PortType::Array => "Array",
        }
    }
}

impl From<String> for PortType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "number" | "int" | "integer" | "float" | "double" => PortType::Number,
            "boolean" | "bool" => PortType::Boolean,
            "object" | "dict" | "map" => PortType::Object,
            "array" | "list" => PortType::Array,
            _ => PortType::String,
        }
    }
}

impl From<PortType> for String {
    fn from(value: PortType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPort {
    #[serde(rename = "type", default)]
    pub ty: PortType,
    /// Inputs are required unless explicitly marked `required: false`.
    #[serde(default = "default_required")]
    pub required: bool,
}

impl Default for InputPort {
    fn default() -> Self {
        Self {
            ty: PortType::String,
            required: true,
        }
    }
}

impl InputPort {
    pub fn new(ty: PortType) -> Self {
        Self { ty, required: true }
    }

    pub fn optional(ty: PortType) -> Self {
        Self {
            ty,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputPort {
    #[serde(rename = "type", default)]
    pub ty: PortType,
}

impl OutputPort {
    pub fn new(ty: PortType) -> Self {
        Self { ty }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInterface {
    #[serde(default)]
    pub inputs: IndexMap<String, InputPort>,
    #[serde(default)]
    pub outputs: IndexMap<String, OutputPort>,
}

impl NodeInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: impl Into<String>, port: InputPort) -> Self {
        self.inputs.insert(name.into(), port);
        self
    }

    pub fn output(mut self, name: impl Into<String>, port: OutputPort) -> Self {
        self.outputs.insert(name.into(), port);
        self
    }

    /// Required inputs in declaration order.
    pub fn required_inputs(&self) -> impl Iterator<Item = (&str, &InputPort)> {
        self.inputs
            .iter()
            .filter(|(_, port)| port.required)
            .map(|(name, port)| (name.as_str(), port))
    }
}
