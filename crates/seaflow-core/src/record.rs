//! Builders from loaded records to graph descriptions.
//!
//! A DAG definition and a task execution both arrive as a tree of components. Sub-DAGs and
//! sub-tasks become groups holding their own components; `previous_*` lists become edges
//! pointing at the component that declares them.

use crate::action::ActionTemplate;
use crate::adapter::{AdapterMap, ParamRef};
use crate::builder::GraphDescriptionBuilder;
use crate::interface::{InputPort, NodeInterface, OutputPort};
use crate::model::{EdgeKind, GraphDescription, GraphEdge, GraphNode};
use crate::serde_util::null_as_default;
use crate::validate::Interfaces;
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---- DAG definitions -------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DagComponentKind {
    #[default]
    Node,
    Dag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagComponent {
    pub identifier: String,
    #[serde(default)]
    pub kind: DagComponentKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing)]
    pub action_detail: Option<ActionTemplate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_nodes: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub previous_dags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_adapter: IndexMap<String, ParamRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_adapter: IndexMap<String, ParamRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_def: Option<IndexMap<String, InputPort>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_def: Option<IndexMap<String, OutputPort>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub components: Vec<DagComponent>,
}

impl DagComponent {
    fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    fn interface(&self) -> Option<NodeInterface> {
        if self.input_def.is_none() && self.output_def.is_none() {
            return None;
        }
        Some(NodeInterface {
            inputs: self.input_def.clone().unwrap_or_default(),
            outputs: self.output_def.clone().unwrap_or_default(),
        })
    }
}

/// A DAG definition as listed by the server, and the payload used to create one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagRecord {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<DagComponent>,
}

/// Everything the DAG viewer needs from a definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DagView {
    pub description: GraphDescription,
    pub interfaces: Interfaces,
    pub adapters: IndexMap<String, AdapterMap>,
    /// Action templates embedded in the components, first occurrence wins.
    pub actions: Vec<ActionTemplate>,
}

impl DagRecord {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_view(&self) -> Result<DagView> {
        let mut builder = GraphDescriptionBuilder::new();
        let mut view = DagView::default();
        collect_dag(&self.components, None, &mut builder, &mut view);
        view.description = builder.build()?;
        tracing::debug!(
            dag = %self.name,
            nodes = view.description.nodes.len(),
            edges = view.description.edges.len(),
            "built DAG view"
        );
        Ok(view)
    }
}

fn collect_dag(
    components: &[DagComponent],
    parent: Option<&str>,
    builder: &mut GraphDescriptionBuilder,
    view: &mut DagView,
) {
    for comp in components {
        let mut node = match comp.kind {
            DagComponentKind::Node => GraphNode::plain(&comp.identifier, comp.label()),
            DagComponentKind::Dag => GraphNode::group(&comp.identifier, comp.label()),
        };
        if let Some(parent) = parent {
            node = node.with_parent(parent);
        }
        if let Some(action) = &comp.action {
            node = node.with_action(action);
        }
        builder.push_node(node);

        if comp.kind == DagComponentKind::Node {
            if let Some(interface) = comp.interface() {
                view.interfaces.insert(comp.identifier.clone(), interface);
            }
            let adapters = AdapterMap {
                input: comp.input_adapter.clone(),
                output: comp.output_adapter.clone(),
            };
            if !adapters.is_empty() {
                view.adapters.insert(comp.identifier.clone(), adapters);
            }
        }
        if let Some(detail) = &comp.action_detail {
            if !view.actions.iter().any(|a| a.name == detail.name) {
                view.actions.push(detail.clone());
            }
        }

        for prev in &comp.previous_nodes {
            builder.push_edge(GraphEdge::new(prev, &comp.identifier));
        }
        for prev in &comp.previous_dags {
            builder.push_edge(GraphEdge::new(prev, &comp.identifier).with_kind(EdgeKind::SubGraph));
        }

        if comp.kind == DagComponentKind::Dag {
            collect_dag(&comp.components, Some(&comp.identifier), builder, view);
        }
    }
}

// ---- task executions -------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepState {
    Success,
    Processing,
    Error,
    Other(String),
}

impl StepState {
    pub fn as_str(&self) -> &str {
        match self {
            StepState::Success => "SUCCESS",
            StepState::Processing => "PROCESSING",
            StepState::Error => "ERROR",
            StepState::Other(s) => s,
        }
    }
}

impl From<&str> for StepState {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => StepState::Success,
            "PROCESSING" => StepState::Processing,
            "ERROR" => StepState::Error,
            other => StepState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskComponentKind {
    #[default]
    Step,
    Task,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskComponent {
    pub identifier: String,
    #[serde(default)]
    pub kind: TaskComponentKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_tasks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<TaskComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<TaskComponent>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskView {
    pub description: GraphDescription,
    /// State of every step, keyed by step id.
    pub states: IndexMap<String, StepState>,
}

impl TaskRecord {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_view(&self) -> Result<TaskView> {
        let mut builder = GraphDescriptionBuilder::new();
        let mut states = IndexMap::new();
        collect_task(&self.components, None, &mut builder, &mut states);
        let description = builder.build()?;
        tracing::debug!(
            task = %self.name,
            nodes = description.nodes.len(),
            edges = description.edges.len(),
            "built task view"
        );
        Ok(TaskView {
            description,
            states,
        })
    }
}

fn collect_task(
    components: &[TaskComponent],
    parent: Option<&str>,
    builder: &mut GraphDescriptionBuilder,
    states: &mut IndexMap<String, StepState>,
) {
    for comp in components {
        let mut node = match comp.kind {
            TaskComponentKind::Task => {
                let label = if comp.title.is_empty() {
                    &comp.name
                } else {
                    &comp.title
                };
                GraphNode::group(&comp.identifier, label.as_str())
            }
            TaskComponentKind::Step => {
                states.insert(comp.identifier.clone(), StepState::from(comp.state.as_str()));
                GraphNode::plain(&comp.identifier, format!("{} ({})", comp.title, comp.state))
            }
        };
        if let Some(parent) = parent {
            node = node.with_parent(parent);
        }
        builder.push_node(node);

        for prev in &comp.previous_steps {
            builder.push_edge(GraphEdge::new(prev, &comp.identifier));
        }
        for prev in &comp.previous_tasks {
            builder.push_edge(GraphEdge::new(prev, &comp.identifier).with_kind(EdgeKind::SubGraph));
        }

        if comp.kind == TaskComponentKind::Task {
            collect_task(&comp.components, Some(&comp.identifier), builder, states);
        }
    }
}
