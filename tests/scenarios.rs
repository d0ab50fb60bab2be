use live_state_graph::graph::{self, FilterState, RootRule, derive_effective_graph};
use live_state_graph::{
    CollectionKey, GraphView, LayoutAdapter, Platform, Rendered, ResourceState, Snapshot,
    ViewConfig,
};
use pretty_assertions::assert_eq;

fn service_with_pods() -> Vec<ResourceState> {
    vec![
        ResourceState::new("svc", "Service", "web"),
        ResourceState::new("pod1", "Pod", "web-1").with_parents(["svc"]),
        ResourceState::new("pod2", "Pod", "web-2").with_parents(["svc"]),
    ]
}

fn edge_pairs(g: &live_state_graph::Graph) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = g
        .edges()
        .iter()
        .map(|e| (e.parent.clone(), e.child.clone()))
        .collect();
    pairs.sort();
    pairs
}

#[test]
fn hiding_pods_leaves_the_service_alone() {
    let g = graph::build(&service_with_pods(), RootRule::Default);
    assert_eq!(g.node_count(), 3);
    assert_eq!(
        edge_pairs(&g),
        vec![
            ("svc".to_string(), "pod1".to_string()),
            ("svc".to_string(), "pod2".to_string()),
        ]
    );

    let filter = FilterState::from_resources(&service_with_pods()).toggle("Pod");
    let effective = derive_effective_graph(&g, &filter);
    assert_eq!(effective.node_count(), 1);
    assert!(effective.contains("svc"));
    assert_eq!(effective.edge_count(), 0);
}

#[test]
fn missing_parent_yields_node_without_edges() {
    let resources = vec![ResourceState::new("orphan", "Pod", "o").with_parents(["missing"])];
    let g = graph::build(&resources, RootRule::Default);

    assert!(g.contains("orphan"));
    assert!(!g.contains("missing"));
    assert!(g.edges().iter().all(|e| !e.touches("missing")));
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn empty_input_lays_out_to_nothing() {
    let g = graph::build(&[], RootRule::Default);
    assert!(g.is_empty());
    assert_eq!(g.edge_count(), 0);

    let layout = LayoutAdapter::default().layout(&g).unwrap();
    assert!(layout.is_empty());
    assert!(layout.edges.is_empty());

    let mut view = GraphView::new(&ViewConfig::default(), Platform::Application);
    view.set_collection(CollectionKey::new("empty"), Vec::new());
    let frame = view.frame().unwrap();
    assert!(frame.is_empty());
    assert!(frame.edges.is_empty());
}

#[test]
fn selection_survives_a_snapshot_without_the_node() {
    let mut view = GraphView::new(&ViewConfig::default(), Platform::Kubernetes);
    let key = CollectionKey::new("deploy-1");

    view.set_collection(key.clone(), service_with_pods());
    view.select("pod2");
    assert_eq!(view.selected().map(|r| r.name.as_str()), Some("web-2"));

    let without: Vec<_> = service_with_pods()
        .into_iter()
        .filter(|r| r.id != "pod2")
        .collect();
    view.set_collection(key.clone(), without);
    assert_eq!(view.selected(), None);

    view.set_collection(key, service_with_pods());
    assert_eq!(view.selected().map(|r| r.id.as_str()), Some("pod2"));
}

#[test]
fn selection_follows_the_kind_filter() {
    let mut view = GraphView::new(&ViewConfig::default(), Platform::Kubernetes);
    view.set_collection(CollectionKey::new("d"), service_with_pods());
    view.select("pod1");

    view.toggle_kind("Pod");
    assert_eq!(view.selected(), None);
    assert_eq!(view.selection().selected_id(), Some("pod1"));

    view.toggle_kind("Pod");
    assert_eq!(view.selected().map(|r| r.id.as_str()), Some("pod1"));
}

#[test]
fn filter_kept_across_snapshots_and_reset_on_new_collection() {
    let mut view = GraphView::new(&ViewConfig::default(), Platform::Kubernetes);
    view.set_collection(CollectionKey::new("v1"), service_with_pods());
    view.toggle_kind("Pod");

    let mut next = service_with_pods();
    next.push(ResourceState::new("cm", "ConfigMap", "cfg").with_parents(["svc"]));
    view.update_resources(next.clone());

    assert!(!view.filter().is_visible("Pod"));
    assert!(view.filter().is_visible("ConfigMap"));
    let frame = view.frame().unwrap();
    let mut ids: Vec<_> = frame.nodes.iter().map(|n| n.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["cm", "svc"]);

    view.set_collection(CollectionKey::new("v2"), next);
    assert!(view.filter().is_visible("Pod"));
    assert_eq!(view.frame().unwrap().nodes.len(), 4);
}

#[test]
fn ecs_snapshot_fans_out_from_the_single_root() {
    let json = r#"{
        "version": {"timestamp": 1700000000, "index": 3},
        "platform": "ecs",
        "resources": [
            {"id": "svc", "kind": "Service", "name": "api", "healthStatus": 1},
            {"id": "task", "kind": "Task", "name": "t-1", "parentIds": ["gone"], "healthStatus": 2},
            {"id": "ctr", "kind": "Container", "name": "app", "parentIds": ["task"]}
        ]
    }"#;
    let snap = Snapshot::from_json(json, Platform::Application).unwrap();
    assert_eq!(snap.platform, Platform::Ecs);
    assert_eq!(snap.collection_key(), CollectionKey::new("1700000000-3"));

    let mut view = GraphView::new(&ViewConfig::default(), snap.platform);
    view.set_collection(snap.collection_key(), snap.resources);

    let frame = view.frame().unwrap();
    assert!(frame.effective.has_edge("svc", "task"));
    assert!(frame.effective.has_edge("task", "ctr"));
    // Reachability is judged on native links only, so ctr gets a root link too.
    assert!(frame.effective.has_edge("svc", "ctr"));
    assert_eq!(frame.edges.len(), 3);
}

#[test]
fn frame_geometry_lines_up_with_node_boxes() {
    let mut view = GraphView::new(&ViewConfig::default(), Platform::Kubernetes);
    view.set_collection(CollectionKey::new("d"), service_with_pods());

    let Rendered::Ready(frame) = view.rendered() else {
        panic!("expected a frame");
    };
    assert_eq!(frame.nodes.len(), 3);
    assert_eq!(frame.edges.len(), 2);

    for node in &frame.nodes {
        assert!(node.x + 300.0 <= frame.canvas.width);
        assert!(node.y + 72.0 <= frame.canvas.height);
    }
    for edge in &frame.edges {
        let g = &edge.geometry;
        assert!(g.width > 0.0 && g.height > 0.0);
        assert_eq!(g.local_points.len(), g.points.split(' ').count());
    }
}
