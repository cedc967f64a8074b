use super::*;
use crate::foundation::core::Point;

fn bin() -> (SceneGraph, ActorId) {
    let mut graph = SceneGraph::new(400.0, 300.0);
    let container = graph.create_named("bin");
    graph.add_child(graph.root(), container).unwrap();
    graph
        .set_layout_manager(container, Box::new(BinLayout::default()))
        .unwrap();
    graph.set_size(container, 100.0, 60.0).unwrap();
    (graph, container)
}

fn sized(graph: &mut SceneGraph, parent: ActorId, w: f64, h: f64) -> ActorId {
    let c = graph.create_actor();
    graph.set_size(c, w, h).unwrap();
    graph.add_child(parent, c).unwrap();
    c
}

#[test]
fn children_are_centered_by_default() {
    let (mut graph, container) = bin();
    let child = sized(&mut graph, container, 20.0, 10.0);
    graph.resolve_allocations();
    assert_eq!(
        graph.allocation(child).unwrap(),
        Rect::new(40.0, 25.0, 60.0, 35.0)
    );
}

#[test]
fn child_alignment_wins_over_the_layout_default() {
    let (mut graph, container) = bin();
    let a = sized(&mut graph, container, 20.0, 10.0);
    let b = sized(&mut graph, container, 20.0, 10.0);
    graph
        .set_child_layout_property(a, "x-align", &serde_json::json!("end"))
        .unwrap();
    graph
        .set_child_layout_property(b, "y-align", &serde_json::json!("fill"))
        .unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(a).unwrap().x0, 80.0);
    assert_eq!(graph.allocation(b).unwrap(), Rect::new(40.0, 0.0, 60.0, 60.0));
}

#[test]
fn preferred_size_is_the_largest_child() {
    let (mut graph, container) = bin();
    sized(&mut graph, container, 20.0, 50.0);
    sized(&mut graph, container, 70.0, 10.0);
    graph.clear_size(container).unwrap();
    assert_eq!(graph.preferred_width(container, None).unwrap().natural, 70.0);
    assert_eq!(graph.preferred_height(container, None).unwrap().natural, 50.0);
}

#[test]
fn layout_default_alignment_is_configurable() {
    let (mut graph, container) = bin();
    let child = sized(&mut graph, container, 20.0, 10.0);
    graph
        .set_layout_property(container, "x_align", &serde_json::json!("start"))
        .unwrap();
    graph
        .set_layout_property(container, "y-align", &serde_json::json!("end"))
        .unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(child).unwrap().origin(), Point::new(0.0, 50.0));
    assert!(
        graph
            .set_layout_property(container, "x-align", &serde_json::json!("middle"))
            .is_err()
    );
}
