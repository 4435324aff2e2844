use seaflow_core::{GraphDescriptionBuilder, GraphEdge, GraphNode, Size};
use seaflow_layout::{HandleSide, LayoutConfig, LayoutResult, RankDir, layout, layout_description};

fn overlap(result: &LayoutResult, a: &str, b: &str) -> bool {
    let a = result.node(a).unwrap();
    let b = result.node(b).unwrap();
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

fn pipeline() -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let nodes = vec![
        GraphNode::plain("extract", "Extract"),
        GraphNode::group("clean", "Clean"),
        GraphNode::plain("dedupe", "Dedupe").with_parent("clean"),
        GraphNode::plain("normalize", "Normalize").with_parent("clean"),
        GraphNode::plain("load", "Load"),
    ];
    let edges = vec![
        GraphEdge::new("extract", "dedupe"),
        GraphEdge::new("dedupe", "normalize"),
        GraphEdge::new("normalize", "load"),
    ];
    (nodes, edges)
}

#[test]
fn layout_is_deterministic() {
    let (nodes, edges) = pipeline();
    let config = LayoutConfig::dag_viewer();
    assert_eq!(layout(&nodes, &edges, &config), layout(&nodes, &edges, &config));
}

#[test]
fn children_fit_inside_their_group() {
    let (nodes, edges) = pipeline();
    let config = LayoutConfig::dag_viewer();
    let result = layout(&nodes, &edges, &config);

    let group = result.node("clean").unwrap();
    for id in ["dedupe", "normalize"] {
        let child = result.node(id).unwrap();
        assert_eq!(child.parent.as_deref(), Some("clean"));
        assert!(child.x >= config.padding && child.y >= config.padding);
        assert!(child.x + child.width <= group.width - config.padding + 1e-9);
        assert!(child.y + child.height <= group.height - config.padding + 1e-9);
    }
    // Two 172-wide children one rank apart, plus padding on both sides.
    assert_eq!(group.width, 172.0 * 2.0 + 100.0 + 80.0);
    assert_eq!(group.height, 36.0 + 80.0);
}

#[test]
fn edges_are_lifted_to_top_level_groups() {
    let (nodes, edges) = pipeline();
    let result = layout(&nodes, &edges, &LayoutConfig::dag_viewer());

    let extract = result.node("extract").unwrap();
    let clean = result.node("clean").unwrap();
    let load = result.node("load").unwrap();
    assert!(extract.x + extract.width <= clean.x);
    assert!(clean.x + clean.width <= load.x);
    assert_eq!(result.width, load.x + load.width);
}

#[test]
fn edges_between_groups_order_the_groups() {
    let nodes = vec![
        GraphNode::group("g1", "G1"),
        GraphNode::plain("a", "A").with_parent("g1"),
        GraphNode::group("g2", "G2"),
        GraphNode::plain("b", "B").with_parent("g2"),
    ];
    let edges = vec![GraphEdge::new("a", "b")];
    let result = layout(&nodes, &edges, &LayoutConfig::dag_viewer());

    let g1 = result.node("g1").unwrap();
    let g2 = result.node("g2").unwrap();
    assert!(g1.x + g1.width <= g2.x, "{g1:?} {g2:?}");
    assert_eq!((g1.width, g1.height), (172.0 + 80.0, 36.0 + 80.0));

    for (child, group) in [("a", "g1"), ("b", "g2")] {
        let n = result.node(child).unwrap();
        assert_eq!(n.parent.as_deref(), Some(group));
        assert_eq!((n.x, n.y), (40.0, 40.0));
        let (cx, cy) = result.absolute_position(child).unwrap();
        let (gx, gy) = result.absolute_position(group).unwrap();
        assert_eq!((cx - gx, cy - gy), (40.0, 40.0));
    }
    assert!(!overlap(&result, "g1", "g2"));
}

#[test]
fn nested_groups_are_resolved_bottom_up() {
    let nodes = vec![
        GraphNode::group("outer", "Outer"),
        GraphNode::group("inner", "Inner").with_parent("outer"),
        GraphNode::plain("leaf", "Leaf").with_parent("inner"),
        GraphNode::plain("side", "Side").with_parent("outer"),
    ];
    let edges = vec![GraphEdge::new("leaf", "side")];
    let config = LayoutConfig::dag_viewer();
    let result = layout(&nodes, &edges, &config);

    let inner = result.node("inner").unwrap();
    assert_eq!((inner.width, inner.height), (172.0 + 80.0, 36.0 + 80.0));
    let leaf = result.node("leaf").unwrap();
    assert_eq!((leaf.x, leaf.y), (40.0, 40.0));

    let outer = result.node("outer").unwrap();
    let (ix, iy) = result.absolute_position("inner").unwrap();
    let (lx, ly) = result.absolute_position("leaf").unwrap();
    assert_eq!((lx - ix, ly - iy), (40.0, 40.0));
    assert!(inner.x + inner.width <= outer.width);
    assert!(!overlap(&result, "inner", "side"));
}

#[test]
fn edgeless_siblings_do_not_overlap() {
    let nodes: Vec<GraphNode> = (0..6)
        .map(|i| GraphNode::plain(format!("n{i}"), format!("Node {i}")))
        .collect();
    let result = layout(&nodes, &[], &LayoutConfig::dag_viewer());
    for i in 0..6 {
        for j in i + 1..6 {
            assert!(!overlap(&result, &format!("n{i}"), &format!("n{j}")));
        }
    }
}

#[test]
fn dangling_edges_and_self_loops_are_ignored() {
    let nodes = vec![GraphNode::plain("a", "A"), GraphNode::plain("b", "B")];
    let edges = vec![
        GraphEdge::new("a", "ghost"),
        GraphEdge::new("phantom", "b"),
        GraphEdge::new("a", "a"),
        GraphEdge::new("a", "b"),
    ];
    let result = layout(&nodes, &edges, &LayoutConfig::dag_viewer());
    assert_eq!(result.nodes.len(), 2);
    assert!(result.node("a").unwrap().x < result.node("b").unwrap().x);
}

#[test]
fn empty_groups_get_the_default_box() {
    let nodes = vec![GraphNode::group("g", "Empty")];
    let result = layout(&nodes, &[], &LayoutConfig::dag_viewer());
    let g = result.node("g").unwrap();
    assert_eq!((g.width, g.height), (172.0 + 40.0, 36.0 + 40.0));
}

#[test]
fn bad_parents_are_treated_as_top_level() {
    let nodes = vec![
        GraphNode::plain("host", "Host"),
        GraphNode::plain("a", "A").with_parent("host"),
        GraphNode::plain("b", "B").with_parent("missing"),
        GraphNode::group("g1", "G1").with_parent("g2"),
        GraphNode::group("g2", "G2").with_parent("g1"),
    ];
    let result = layout(&nodes, &[], &LayoutConfig::dag_viewer());
    assert_eq!(result.node("a").unwrap().parent, None);
    assert_eq!(result.node("b").unwrap().parent, None);
    let cycle_roots = ["g1", "g2"]
        .iter()
        .filter(|id| result.node(id).unwrap().parent.is_none())
        .count();
    assert_eq!(cycle_roots, 1);
}

#[test]
fn task_viewer_grows_long_labels() {
    let nodes = vec![
        GraphNode::plain("s1", "Extract (SUCCESS)"),
        GraphNode::plain("s2", "Normalize customer records (PROCESSING)"),
        GraphNode::plain("s3", "").with_size(Size::new(50.0, 50.0)),
    ];
    let result = layout(&nodes, &[], &LayoutConfig::task_viewer());
    assert_eq!(result.node("s1").unwrap().height, 46.0);
    assert_eq!(result.node("s2").unwrap().height, 86.0);
    assert_eq!(result.node("s2").unwrap().width, 180.0);
    assert_eq!(result.node("s3").unwrap().height, 50.0);
}

#[test]
fn handle_sides_follow_the_rank_direction() {
    let nodes = vec![GraphNode::plain("a", "A")];
    let lr = layout(&nodes, &[], &LayoutConfig::dag_viewer());
    assert_eq!(lr.nodes[0].source_side, HandleSide::Right);
    assert_eq!(lr.nodes[0].target_side, HandleSide::Left);

    let tb = LayoutConfig {
        rankdir: RankDir::TB,
        ..LayoutConfig::dag_viewer()
    };
    let result = layout(&nodes, &[], &tb);
    assert_eq!(result.nodes[0].source_side, HandleSide::Bottom);
    assert_eq!(result.nodes[0].target_side, HandleSide::Top);
}

#[test]
fn descriptions_lay_out_like_their_parts() {
    let (nodes, edges) = pipeline();
    let mut builder = GraphDescriptionBuilder::new().version(3);
    for n in nodes.clone() {
        builder = builder.node(n);
    }
    for e in edges.clone() {
        builder = builder.edge(e);
    }
    let description = builder.build().unwrap();
    let config = LayoutConfig::dag_viewer();
    assert_eq!(
        layout_description(&description, &config),
        layout(&nodes, &edges, &config)
    );
}
