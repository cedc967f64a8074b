use super::*;
use crate::foundation::core::Rect;

fn flow(sizes: &[(f64, f64)], layout: FlowLayout) -> (SceneGraph, ActorId, Vec<ActorId>) {
    let mut graph = SceneGraph::new(400.0, 300.0);
    let container = graph.create_named("flow");
    graph.add_child(graph.root(), container).unwrap();
    graph.set_layout_manager(container, Box::new(layout)).unwrap();
    let children = sizes
        .iter()
        .map(|&(w, h)| {
            let c = graph.create_actor();
            graph.set_size(c, w, h).unwrap();
            graph.add_child(container, c).unwrap();
            c
        })
        .collect();
    (graph, container, children)
}

fn spaced() -> FlowLayout {
    FlowLayout {
        column_spacing: 10.0,
        row_spacing: 5.0,
        ..FlowLayout::default()
    }
}

#[test]
fn wraps_once_the_row_is_full() {
    let (mut graph, container, children) = flow(&[(40.0, 20.0); 3], spaced());
    graph.set_size(container, 100.0, 200.0).unwrap();
    graph.resolve_allocations();

    assert_eq!(
        graph.allocation(children[0]).unwrap(),
        Rect::new(0.0, 0.0, 40.0, 20.0)
    );
    assert_eq!(
        graph.allocation(children[1]).unwrap(),
        Rect::new(50.0, 0.0, 90.0, 20.0)
    );
    assert_eq!(
        graph.allocation(children[2]).unwrap(),
        Rect::new(0.0, 25.0, 40.0, 45.0)
    );
}

#[test]
fn an_oversized_child_still_gets_its_own_line() {
    let (mut graph, container, children) = flow(&[(150.0, 10.0), (20.0, 10.0)], spaced());
    graph.set_size(container, 100.0, 200.0).unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[0]).unwrap().x0, 0.0);
    assert_eq!(graph.allocation(children[1]).unwrap().y0, 15.0);
}

#[test]
fn rows_are_as_tall_as_their_tallest_child() {
    let (mut graph, container, children) =
        flow(&[(40.0, 10.0), (40.0, 30.0), (40.0, 10.0)], spaced());
    graph.set_size(container, 100.0, 200.0).unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[2]).unwrap().y0, 35.0);
}

#[test]
fn homogeneous_cells_use_the_largest_child() {
    let layout = FlowLayout {
        homogeneous: true,
        ..FlowLayout::default()
    };
    let (mut graph, container, children) = flow(&[(20.0, 10.0), (40.0, 5.0)], layout);
    graph.set_size(container, 200.0, 100.0).unwrap();
    graph.resolve_allocations();
    assert_eq!(
        graph.allocation(children[0]).unwrap(),
        Rect::new(0.0, 0.0, 40.0, 10.0)
    );
    assert_eq!(graph.allocation(children[1]).unwrap().x0, 40.0);
}

#[test]
fn preferred_height_depends_on_the_width_hint() {
    let (graph, container, _) = flow(&[(40.0, 20.0); 3], spaced());
    let layout = spaced();
    assert_eq!(layout.preferred_width(&graph, container, None).natural, 140.0);
    assert_eq!(layout.preferred_width(&graph, container, None).min, 40.0);
    assert_eq!(layout.preferred_height(&graph, container, None).natural, 20.0);
    assert_eq!(
        layout.preferred_height(&graph, container, Some(100.0)).natural,
        45.0
    );
}

#[test]
fn vertical_flow_fills_columns() {
    let layout = FlowLayout {
        column_spacing: 4.0,
        ..FlowLayout::new(Orientation::Vertical)
    };
    let (mut graph, container, children) = flow(&[(10.0, 30.0); 3], layout);
    graph.set_size(container, 100.0, 70.0).unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[1]).unwrap().y0, 30.0);
    assert_eq!(
        graph.allocation(children[2]).unwrap(),
        Rect::new(14.0, 0.0, 24.0, 30.0)
    );
}

#[test]
fn column_width_bounds_clamp_children() {
    let layout = FlowLayout {
        min_column_width: 30.0,
        max_column_width: Some(50.0),
        ..FlowLayout::default()
    };
    let (mut graph, container, children) = flow(&[(10.0, 10.0), (80.0, 10.0)], layout);
    graph.set_size(container, 200.0, 100.0).unwrap();
    graph.resolve_allocations();
    assert_eq!(graph.allocation(children[0]).unwrap().width(), 30.0);
    assert_eq!(graph.allocation(children[1]).unwrap().width(), 50.0);
}

#[test]
fn properties_accept_both_spellings() {
    let mut layout = FlowLayout::default();
    layout
        .set_property("column-spacing", &serde_json::json!(6))
        .unwrap();
    layout.set_property("row_spacing", &serde_json::json!(3)).unwrap();
    layout
        .set_property("max-row-height", &serde_json::json!(-1))
        .unwrap();
    assert_eq!(layout.column_spacing, 6.0);
    assert_eq!(layout.row_spacing, 3.0);
    assert_eq!(layout.max_row_height, None);
    assert!(layout.set_property("snap", &serde_json::json!(1)).is_err());
}
