use super::*;
use crate::layout::LayoutManager;
use crate::foundation::core::{Point, Rect, Size};

fn grid_with_cells(n: usize, w: f64, h: f64, spacing: f64) -> (SceneGraph, ActorId, Vec<ActorId>) {
    let mut graph = SceneGraph::new(300.0, 400.0);
    let container = graph.create_named("grid");
    graph.add_child(graph.root(), container).unwrap();
    graph.set_size(container, 300.0, 400.0).unwrap();
    let mut layout = MultiLayout::new(MultiMode::Grid);
    layout.spacing = spacing;
    graph.set_layout_manager(container, Box::new(layout)).unwrap();
    let children = (0..n)
        .map(|_| {
            let c = graph.create_actor();
            graph.set_size(c, w, h).unwrap();
            graph.add_child(container, c).unwrap();
            c
        })
        .collect();
    (graph, container, children)
}

#[test]
fn items_per_row_follows_the_cell_and_spacing() {
    assert_eq!(items_per_row(300.0, 64.0, 12.0), 4);
    assert_eq!(items_per_row(64.0, 64.0, 12.0), 1);
    assert_eq!(items_per_row(10.0, 64.0, 12.0), 1);
    assert_eq!(items_per_row(300.0, 0.0, 12.0), 1);
}

#[test]
fn grid_wraps_after_a_full_row() {
    let (mut graph, _, children) = grid_with_cells(6, 64.0, 48.0, 12.0);
    graph.resolve_allocations();

    let boxes: Vec<_> = children
        .iter()
        .map(|&c| graph.allocation(c).unwrap())
        .collect();
    assert_eq!(boxes[0], Rect::new(0.0, 0.0, 64.0, 48.0));
    assert_eq!(boxes[3].x0, 3.0 * 76.0);
    assert_eq!(boxes[3].y0, 0.0);
    assert_eq!(boxes[4].x0, 0.0);
    assert_eq!(boxes[4].y0, 60.0);
    assert_eq!(boxes[5].origin(), Point::new(76.0, 60.0));
}

#[test]
fn cells_take_the_largest_child() {
    let (mut graph, container, children) = grid_with_cells(2, 20.0, 10.0, 0.0);
    let big = graph.create_actor();
    graph.set_size(big, 50.0, 30.0).unwrap();
    graph.add_child(container, big).unwrap();
    graph.resolve_allocations();

    assert_eq!(graph.allocation(children[0]).unwrap().size(), Size::new(50.0, 30.0));
    assert_eq!(graph.allocation(big).unwrap().x0, 100.0);
}

#[test]
fn circle_places_items_around_the_center() {
    let (mut graph, container, children) = grid_with_cells(4, 20.0, 20.0, 0.0);
    graph
        .with_layout_mut::<MultiLayout, _>(container, MultiLayout::toggle)
        .unwrap();
    graph.resolve_allocations();

    // radius = min((300 - 20) / 2, (400 - 20) / 2) = 140, center (150, 200)
    let first = graph.allocation(children[0]).unwrap();
    assert!((first.center().x - 150.0).abs() < 1e-9);
    assert!((first.center().y - 340.0).abs() < 1e-9);
    let second = graph.allocation(children[1]).unwrap();
    assert!((second.center().x - 290.0).abs() < 1e-9);
    assert!((second.center().y - 200.0).abs() < 1e-9);
}

#[test]
fn grid_preferred_size_sums_children() {
    let (graph, container, _) = grid_with_cells(3, 10.0, 5.0, 2.0);
    let layout = MultiLayout {
        mode: MultiMode::Grid,
        spacing: 2.0,
    };
    assert_eq!(layout.preferred_width(&graph, container, None).natural, 34.0);
    let circle = MultiLayout {
        mode: MultiMode::Circle,
        spacing: 0.0,
    };
    assert_eq!(circle.preferred_height(&graph, container, None).natural, 5.0);
}

#[test]
fn mode_is_configurable_by_name() {
    let mut layout = MultiLayout::default();
    layout
        .set_property("state", &serde_json::json!("circle"))
        .unwrap();
    assert_eq!(layout.mode, MultiMode::Circle);
    layout.set_property("spacing", &serde_json::json!(8)).unwrap();
    assert_eq!(layout.spacing, 8.0);
    assert!(layout.set_property("mode", &serde_json::json!("spiral")).is_err());
    assert!(layout.set_property("columns", &serde_json::json!(3)).is_err());
}

#[test]
fn hidden_children_take_no_cell() {
    let (mut graph, _, children) = grid_with_cells(3, 10.0, 10.0, 0.0);
    graph.set_visible(children[0], false).unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[1]).unwrap().x0, 0.0);
    assert_eq!(graph.allocation(children[2]).unwrap().x0, 10.0);
}
