pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("Node {id} refers to unknown parent {parent}")]
    UnknownParent { id: String, parent: String },

    #[error("Node {id} has parent {parent}, which is not a group")]
    ParentNotGroup { id: String, parent: String },

    #[error("Containment cycle through node {id}")]
    ContainmentCycle { id: String },

    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("Unknown action: {name}")]
    UnknownAction { name: String },

    #[error("Cannot connect {from} -> {to}: {reason}")]
    ConnectionRejected {
        from: String,
        to: String,
        reason: String,
    },

    #[error("There are {count} invalid connection(s); fix the parameter mappings first")]
    InvalidConnections { count: usize },

    #[error("DAG name must not be empty")]
    MissingDagName,
}
