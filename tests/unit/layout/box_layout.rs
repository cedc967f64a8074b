use super::*;
use crate::foundation::core::Rect;

fn row(widths: &[f64], spacing: f64) -> (SceneGraph, ActorId, Vec<ActorId>) {
    let mut graph = SceneGraph::new(400.0, 300.0);
    let container = graph.create_named("row");
    graph.add_child(graph.root(), container).unwrap();
    graph
        .set_layout_manager(
            container,
            Box::new(BoxLayout::new(Orientation::Horizontal, spacing)),
        )
        .unwrap();
    let children = widths
        .iter()
        .map(|&w| {
            let c = graph.create_actor();
            graph.set_size(c, w, 10.0).unwrap();
            graph.add_child(container, c).unwrap();
            c
        })
        .collect();
    (graph, container, children)
}

#[test]
fn preferred_width_sums_children_and_spacing() {
    let (graph, container, _) = row(&[10.0, 20.0, 30.0], 5.0);
    let req = graph.preferred_width(container, None).unwrap();
    assert_eq!(req.natural, 70.0);
    assert_eq!(graph.preferred_height(container, None).unwrap().natural, 10.0);
}

#[test]
fn children_get_their_natural_size_without_expand() {
    let (mut graph, container, children) = row(&[10.0, 20.0, 30.0], 5.0);
    graph.set_size(container, 200.0, 50.0).unwrap();
    graph.resolve_allocations();

    let xs: Vec<_> = children
        .iter()
        .map(|&c| graph.allocation(c).unwrap().x0)
        .collect();
    assert_eq!(xs, vec![0.0, 15.0, 40.0]);
    assert_eq!(
        graph.allocation(children[2]).unwrap(),
        Rect::new(40.0, 0.0, 70.0, 50.0)
    );
}

#[test]
fn leftover_goes_to_expanding_children_only() {
    let (mut graph, container, children) = row(&[10.0, 20.0, 30.0], 5.0);
    graph.set_size(container, 200.0, 50.0).unwrap();
    graph
        .set_child_layout_property(children[0], "expand", &serde_json::json!(true))
        .unwrap();
    graph
        .set_child_layout_property(children[2], "expand", &serde_json::json!(true))
        .unwrap();
    graph.resolve_allocations();

    assert_eq!(graph.allocation(children[0]).unwrap().width(), 75.0);
    assert_eq!(graph.allocation(children[1]).unwrap().width(), 20.0);
    assert_eq!(graph.allocation(children[2]).unwrap().width(), 95.0);
    assert_eq!(graph.allocation(children[2]).unwrap().x1, 200.0);
}

#[test]
fn shortfall_is_filled_smallest_gap_first() {
    let layout = BoxLayout::default();
    let reqs = [
        SizeRequest {
            min: 10.0,
            natural: 30.0,
        },
        SizeRequest {
            min: 10.0,
            natural: 20.0,
        },
    ];
    assert_eq!(layout.sizes(&reqs, &[false, false], 40.0), vec![20.0, 20.0]);
    assert_eq!(layout.sizes(&reqs, &[false, false], 10.0), vec![10.0, 10.0]);
    assert_eq!(layout.sizes(&reqs, &[false, true], 60.0), vec![30.0, 30.0]);
}

#[test]
fn homogeneous_splits_evenly() {
    let (mut graph, container, children) = row(&[10.0, 50.0], 0.0);
    graph.set_size(container, 100.0, 20.0).unwrap();
    graph
        .set_layout_property(container, "homogeneous", &serde_json::json!(true))
        .unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[0]).unwrap().width(), 50.0);
    assert_eq!(graph.allocation(children[1]).unwrap().x0, 50.0);
}

#[test]
fn pack_start_reverses_the_visual_order() {
    let (mut graph, container, children) = row(&[10.0, 20.0], 4.0);
    graph
        .with_layout_mut::<BoxLayout, _>(container, |l| l.pack_start = true)
        .unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[1]).unwrap().x0, 0.0);
    assert_eq!(graph.allocation(children[0]).unwrap().x0, 24.0);
}

#[test]
fn child_alignment_overrides_fill() {
    let (mut graph, container, children) = row(&[10.0], 0.0);
    graph.set_size(container, 100.0, 40.0).unwrap();
    graph
        .set_child_layout_property(children[0], "y-align", &serde_json::json!("center"))
        .unwrap();
    graph.resolve_allocations();
    assert_eq!(
        graph.allocation(children[0]).unwrap(),
        Rect::new(0.0, 15.0, 10.0, 25.0)
    );
}

#[test]
fn vertical_boxes_stack_top_to_bottom() {
    let (mut graph, container, children) = row(&[10.0, 10.0], 2.0);
    graph
        .set_layout_property(container, "orientation", &serde_json::json!("vertical"))
        .unwrap();
    assert_eq!(graph.preferred_height(container, None).unwrap().natural, 22.0);
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[1]).unwrap().y0, 12.0);
}

#[test]
fn margins_are_part_of_the_child_extent() {
    let (mut graph, container, children) = row(&[10.0, 10.0], 0.0);
    graph
        .set_margin(children[0], crate::foundation::core::Margin::uniform(5.0))
        .unwrap();
    assert_eq!(graph.preferred_width(container, None).unwrap().natural, 30.0);
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[0]).unwrap().x0, 5.0);
    assert_eq!(graph.allocation(children[1]).unwrap().x0, 20.0);
}

#[test]
fn unknown_properties_are_rejected() {
    let mut layout = BoxLayout::default();
    assert!(layout.set_property("wrap", &serde_json::json!(true)).is_err());
    assert!(layout.set_property("spacing", &serde_json::json!("wide")).is_err());
    layout.set_property("pack_start", &serde_json::json!(true)).unwrap();
    assert!(layout.pack_start);
}
