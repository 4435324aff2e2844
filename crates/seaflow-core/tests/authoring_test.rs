use seaflow_core::{
    ActionTemplate, AdapterIssue, AdapterMap, AuthoringGraph, Error, InputPort, NodeInterface,
    OutputPort, ParamRef, PortType, check_adapters,
};

fn catalog() -> Vec<ActionTemplate> {
    vec![
        ActionTemplate::new("http_get", "HTTP GET")
            .input("url", InputPort::new(PortType::String))
            .output("body", OutputPort::new(PortType::String)),
        ActionTemplate::new("parse_json", "Parse JSON")
            .input("body", InputPort::new(PortType::String))
            .output("doc", OutputPort::new(PortType::Object)),
        ActionTemplate::new("notify", "Notify").input("channel", InputPort::default()),
    ]
}

#[test]
fn add_node_seeds_label_and_interface_from_the_action() {
    let mut g = AuthoringGraph::new(catalog());
    let id = g.add_node("http_get").unwrap();

    assert_eq!(id, "node-1");
    assert_eq!(g.node(&id).unwrap().label, "HTTP GET (http_get)");
    assert!(g.interfaces[&id].inputs.contains_key("url"));
    assert_eq!(g.version, 1);
    assert!(matches!(
        g.add_node("missing"),
        Err(Error::UnknownAction { .. })
    ));
}

#[test]
fn node_ids_skip_ids_in_use() {
    let mut g = AuthoringGraph::new(catalog());
    let a = g.add_node("http_get").unwrap();
    let b = g.add_node("http_get").unwrap();
    g.remove_node(&a).unwrap();
    let c = g.add_node("http_get").unwrap();

    assert_eq!((a.as_str(), b.as_str()), ("node-1", "node-2"));
    assert_eq!(c, "node-3");
}

#[test]
fn compatible_nodes_connect() {
    let mut g = AuthoringGraph::new(catalog());
    let fetch = g.add_node("http_get").unwrap();
    let parse = g.add_node("parse_json").unwrap();

    assert!(g.connect(&fetch, &parse).unwrap());
    assert!(!g.connect(&fetch, &parse).unwrap());
    assert_eq!(g.edges.len(), 1);
}

#[test]
fn rejected_connections_leave_the_document_unchanged() {
    let mut g = AuthoringGraph::new(catalog());
    let fetch = g.add_node("http_get").unwrap();
    let notify = g.add_node("notify").unwrap();
    let before = g.clone();

    let err = g.connect(&fetch, &notify).unwrap_err();
    match err {
        Error::ConnectionRejected { reason, .. } => {
            assert_eq!(
                reason,
                "Target requires input 'channel', but Source only provides: body"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(g, before);
}

#[test]
fn interface_edits_mark_edges_without_removing_them() {
    let mut g = AuthoringGraph::new(catalog());
    let fetch = g.add_node("http_get").unwrap();
    let parse = g.add_node("parse_json").unwrap();
    g.connect(&fetch, &parse).unwrap();

    let widened = g.interfaces[&parse]
        .clone()
        .input("encoding", InputPort::new(PortType::String));
    g.set_interface(&parse, widened).unwrap();

    assert_eq!(g.edges.len(), 1);
    let statuses = g.edge_statuses();
    assert!(!statuses[0].verdict.is_valid());
    assert!(matches!(
        g.to_dag_definition("ingest", ""),
        Err(Error::InvalidConnections { count: 1 })
    ));

    assert!(g.disconnect(&fetch, &parse));
    assert!(g.to_dag_definition("ingest", "").is_ok());
}

#[test]
fn export_builds_the_create_payload() {
    let mut g = AuthoringGraph::new(catalog());
    let fetch = g.add_node("http_get").unwrap();
    let parse = g.add_node("parse_json").unwrap();
    g.connect(&fetch, &parse).unwrap();
    let mut adapters = AdapterMap::default();
    adapters.input.insert("url".into(), ParamRef::key("url"));
    g.set_adapters(&fetch, adapters).unwrap();

    let dag = g.to_dag_definition("ingest", "").unwrap();
    assert_eq!(dag.identifier, "dag-ingest");
    assert_eq!(dag.title, "ingest");
    assert_eq!(dag.components.len(), 2);
    assert_eq!(dag.components[0].name, "ingest_node-1");
    assert_eq!(dag.components[1].previous_nodes, vec![fetch.clone()]);
    assert_eq!(dag.components[0].action.as_deref(), Some("http_get"));

    let payload = serde_json::to_value(&dag).unwrap();
    assert_eq!(payload["components"][0]["kind"], "Node");
    assert_eq!(payload["components"][0]["input_adapter"]["url"], "$.url");

    assert!(matches!(
        g.to_dag_definition("  ", "x"),
        Err(Error::MissingDagName)
    ));
}

#[test]
fn self_connections_are_rejected() {
    let mut g = AuthoringGraph::new(catalog());
    let a = g.add_node("http_get").unwrap();
    assert!(matches!(
        g.connect(&a, &a),
        Err(Error::ConnectionRejected { .. })
    ));
}

#[test]
fn removing_a_node_drops_its_connections() {
    let mut g = AuthoringGraph::new(catalog());
    let fetch = g.add_node("http_get").unwrap();
    let parse = g.add_node("parse_json").unwrap();
    g.connect(&fetch, &parse).unwrap();
    g.remove_node(&fetch).unwrap();

    assert!(g.edges.is_empty());
    assert!(!g.interfaces.contains_key(&fetch));
    assert!(matches!(
        g.remove_node(&fetch),
        Err(Error::UnknownNode { .. })
    ));
}

#[test]
fn adapter_check_reports_every_issue_kind() {
    let action = ActionTemplate::new("http_get", "HTTP GET")
        .input("url", InputPort::default())
        .input("timeout", InputPort::default())
        .output("body", OutputPort::default());
    let interface = NodeInterface::new()
        .input("source_url", InputPort::default())
        .output("rows", OutputPort::default());

    let mut adapters = AdapterMap::default();
    adapters.input.insert("url".into(), ParamRef::from("$.target"));
    adapters.input.insert("retries".into(), ParamRef::from("$.source_url"));
    adapters.output.insert("rows".into(), ParamRef::from("$.payload"));
    adapters.output.insert("extra".into(), ParamRef::from("$.body"));

    let issues = check_adapters(&interface, &adapters, Some(&action));
    assert_eq!(
        issues,
        vec![
            AdapterIssue::UnknownNodeInput {
                param: "url".into(),
                input: "target".into()
            },
            AdapterIssue::UnknownActionParam {
                param: "retries".into()
            },
            AdapterIssue::UnmappedActionInput {
                param: "timeout".into()
            },
            AdapterIssue::UnknownActionOutput {
                output: "rows".into(),
                action_output: "payload".into()
            },
            AdapterIssue::UnknownNodeOutput {
                output: "extra".into()
            },
        ]
    );
}

#[test]
fn free_form_paths_are_not_checked() {
    let interface = NodeInterface::new();
    let mut adapters = AdapterMap::default();
    adapters
        .output
        .insert("rows".into(), ParamRef::from("$.data[*].row"));
    let issues = check_adapters(&interface, &adapters, None);
    // The output key itself is still unknown to the node.
    assert_eq!(
        issues,
        vec![AdapterIssue::UnknownNodeOutput {
            output: "rows".into()
        }]
    );
}

#[test]
fn authoring_documents_load_from_json() {
    let json = r#"{
      "nodes": [
        {"id": "a", "kind": "plain", "label": "A", "action": "http_get"},
        {"id": "b", "kind": "plain", "label": "B"}
      ],
      "edges": [{"source": "a", "target": "b"}],
      "interfaces": {"b": {"inputs": {"body": {"type": "string"}}}},
      "actions": [
        {"name": "http_get", "title": "HTTP GET", "type": "default",
         "output_def": {"body": {"type": "String"}}}
      ]
    }"#;
    let g = AuthoringGraph::from_json(json).unwrap();
    assert!(g.edge_statuses()[0].verdict.is_valid());
    assert!(g.adapter_issues().is_empty());
}
