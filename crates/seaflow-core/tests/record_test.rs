use seaflow_core::{
    DagRecord, EdgeKind, Error, GraphDescriptionBuilder, GraphNode, NodeKind, ParamRef,
    StepState, TaskRecord,
};

const DAG: &str = r#"{
  "identifier": "dag-etl",
  "name": "etl",
  "title": "Nightly ETL",
  "components": [
    {
      "identifier": "extract",
      "kind": "Node",
      "name": "etl_extract",
      "title": "Extract",
      "action": "http_get",
      "action_detail": {
        "name": "http_get",
        "title": "HTTP GET",
        "type": "default",
        "input_def": {"url": {"type": "String"}},
        "output_def": {"body": {"type": "String"}}
      },
      "input_adapter": {"url": "$.source_url"},
      "output_adapter": {"rows": "$.body"},
      "input_def": {"source_url": {"type": "String"}},
      "output_def": {"rows": {"type": "Array"}},
      "previous_nodes": null
    },
    {
      "identifier": "clean",
      "kind": "Dag",
      "name": "clean_dag",
      "title": "",
      "previous_nodes": ["extract"],
      "components": [
        {"identifier": "dedupe", "kind": "Node", "name": "dedupe", "title": "Dedupe"},
        {"identifier": "normalize", "kind": "Node", "name": "normalize", "title": "Normalize",
         "previous_nodes": ["dedupe"]}
      ]
    },
    {
      "identifier": "load",
      "kind": "Node",
      "name": "load",
      "title": "Load",
      "previous_dags": ["clean"]
    }
  ]
}"#;

#[test]
fn sub_dags_become_groups_with_children() {
    let view = DagRecord::from_json(DAG).unwrap().to_view().unwrap();
    let d = &view.description;

    let clean = d.node("clean").unwrap();
    assert_eq!(clean.kind, NodeKind::Group);
    assert_eq!(clean.label, "clean_dag");
    let children: Vec<&str> = d.children("clean").map(|n| n.id.as_str()).collect();
    assert_eq!(children, vec!["dedupe", "normalize"]);
    assert_eq!(d.node("extract").unwrap().action.as_deref(), Some("http_get"));
}

#[test]
fn both_edge_kinds_are_produced() {
    let view = DagRecord::from_json(DAG).unwrap().to_view().unwrap();
    let edges: Vec<(&str, &str, EdgeKind)> = view
        .description
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("extract", "clean", EdgeKind::Flow),
            ("dedupe", "normalize", EdgeKind::Flow),
            ("clean", "load", EdgeKind::SubGraph),
        ]
    );
}

#[test]
fn interfaces_adapters_and_actions_are_collected() {
    let view = DagRecord::from_json(DAG).unwrap().to_view().unwrap();

    let extract = &view.interfaces["extract"];
    assert!(extract.inputs.contains_key("source_url"));
    assert!(extract.outputs.contains_key("rows"));
    assert!(!view.interfaces.contains_key("dedupe"));

    let adapters = &view.adapters["extract"];
    assert_eq!(adapters.input["url"], ParamRef::key("source_url"));
    assert_eq!(view.actions.len(), 1);
    assert_eq!(view.actions[0].name, "http_get");
}

#[test]
fn task_steps_carry_their_state_in_the_label() {
    let json = r#"{
      "name": "etl-run-7",
      "title": "ETL run",
      "state": "PROCESSING",
      "components": [
        {"identifier": "s1", "kind": "Step", "name": "extract", "title": "Extract", "state": "SUCCESS"},
        {"identifier": "t1", "kind": "Task", "name": "clean", "title": "Clean", "state": "PROCESSING",
         "previous_steps": ["s1"],
         "components": [
           {"identifier": "s2", "kind": "Step", "name": "dedupe", "title": "Dedupe", "state": "ERROR"}
         ]},
        {"identifier": "s3", "kind": "Step", "name": "load", "title": "Load", "state": "PENDING",
         "previous_tasks": ["t1"]}
      ]
    }"#;
    let view = TaskRecord::from_json(json).unwrap().to_view().unwrap();
    let d = &view.description;

    assert_eq!(d.node("s1").unwrap().label, "Extract (SUCCESS)");
    assert!(d.node("t1").unwrap().is_group());
    assert_eq!(d.node("s2").unwrap().parent.as_deref(), Some("t1"));
    assert_eq!(view.states["s2"], StepState::Error);
    assert_eq!(view.states["s3"], StepState::Other("PENDING".into()));
    assert_eq!(d.edges[1].kind, EdgeKind::SubGraph);
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = GraphDescriptionBuilder::new()
        .node(GraphNode::plain("a", "A"))
        .node(GraphNode::plain("a", "again"))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateNode { id } if id == "a"));
}

#[test]
fn containment_cycles_are_rejected() {
    let err = GraphDescriptionBuilder::new()
        .node(GraphNode::group("g1", "G1").with_parent("g2"))
        .node(GraphNode::group("g2", "G2").with_parent("g1"))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::ContainmentCycle { .. }));
}

#[test]
fn parents_must_exist_and_be_groups() {
    let unknown = GraphDescriptionBuilder::new()
        .node(GraphNode::plain("a", "A").with_parent("nope"))
        .build()
        .unwrap_err();
    assert!(matches!(unknown, Error::UnknownParent { .. }));

    let not_group = GraphDescriptionBuilder::new()
        .node(GraphNode::plain("p", "P"))
        .node(GraphNode::plain("a", "A").with_parent("p"))
        .build()
        .unwrap_err();
    assert!(matches!(not_group, Error::ParentNotGroup { .. }));
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(DagRecord::from_json("{"), Err(Error::Json(_))));
}
