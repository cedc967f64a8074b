use super::*;
use crate::foundation::core::Rect;

#[test]
fn children_sit_at_their_fixed_position() {
    let mut graph = SceneGraph::new(200.0, 200.0);
    let group = graph.create_actor();
    let child = graph.create_actor();
    graph.add_child(graph.root(), group).unwrap();
    graph.add_child(group, child).unwrap();
    graph.set_position(group, 10.0, 20.0).unwrap();
    graph.set_position(child, 5.0, 7.0).unwrap();
    graph.set_size(child, 30.0, 40.0).unwrap();
    graph.resolve_allocations();

    assert_eq!(graph.allocation(group).unwrap(), Rect::new(10.0, 20.0, 45.0, 67.0));
    assert_eq!(graph.allocation(child).unwrap(), Rect::new(5.0, 7.0, 35.0, 47.0));
}

#[test]
fn preferred_size_covers_positioned_children() {
    let mut graph = SceneGraph::new(200.0, 200.0);
    let group = graph.create_actor();
    for (x, w) in [(0.0, 10.0), (50.0, 20.0)] {
        let c = graph.create_actor();
        graph.set_position(c, x, x / 2.0).unwrap();
        graph.set_size(c, w, w).unwrap();
        graph.add_child(group, c).unwrap();
    }
    assert_eq!(
        FixedLayout.preferred_width(&graph, group, None),
        SizeRequest::fixed(70.0)
    );
    assert_eq!(
        FixedLayout.preferred_height(&graph, group, None),
        SizeRequest::fixed(45.0)
    );
}

#[test]
fn has_no_properties() {
    let mut layout = FixedLayout;
    assert!(layout.set_property("spacing", &serde_json::json!(1)).is_err());
}
