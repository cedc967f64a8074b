use super::*;

fn pair(graph: &mut SceneGraph) -> (ActorId, ActorId) {
    let a = graph.create_actor();
    let b = graph.create_actor();
    graph.add_child(graph.root(), a).unwrap();
    graph.add_child(graph.root(), b).unwrap();
    (a, b)
}

#[test]
fn align_factor_is_clamped() {
    let src = SceneGraph::new(1.0, 1.0).root();
    let c = Constraint::align(src, AlignAxis::X, 1.5);
    assert_eq!(
        c.kind,
        ConstraintKind::Align {
            axis: AlignAxis::X,
            factor: 1.0
        }
    );
}

#[test]
fn snap_edges_must_share_an_axis() {
    let src = SceneGraph::new(1.0, 1.0).root();
    assert!(matches!(
        Constraint::snap(src, SnapEdge::Left, SnapEdge::Top, 0.0),
        Err(StageError::Config(_))
    ));
    assert!(Constraint::snap(src, SnapEdge::Left, SnapEdge::Right, 4.0).is_ok());
}

#[test]
fn align_centers_within_the_source() {
    let src = SceneGraph::new(1.0, 1.0).root();
    let own = Rect::new(5.0, 5.0, 25.0, 15.0);
    let source = Rect::new(0.0, 0.0, 200.0, 100.0);
    let out = Constraint::align(src, AlignAxis::Both, 0.5).apply(own, source);
    assert_eq!(out, Rect::new(90.0, 45.0, 110.0, 55.0));
}

#[test]
fn bind_copies_coordinates_with_offset() {
    let src = SceneGraph::new(1.0, 1.0).root();
    let own = Rect::new(0.0, 0.0, 10.0, 10.0);
    let source = Rect::new(30.0, 40.0, 80.0, 60.0);

    let x = Constraint::bind(src, BindCoordinate::X, 5.0).apply(own, source);
    assert_eq!(x, Rect::new(35.0, 0.0, 45.0, 10.0));

    let width = Constraint::bind(src, BindCoordinate::Width, -10.0).apply(own, source);
    assert_eq!(width, Rect::new(0.0, 0.0, 40.0, 10.0));

    let all = Constraint::bind(src, BindCoordinate::All, 0.0).apply(own, source);
    assert_eq!(all, source);
}

#[test]
fn snap_moves_a_single_edge() {
    let src = SceneGraph::new(1.0, 1.0).root();
    let own = Rect::new(0.0, 0.0, 10.0, 10.0);
    let source = Rect::new(30.0, 40.0, 80.0, 60.0);
    let c = Constraint::snap(src, SnapEdge::Right, SnapEdge::Left, -2.0).unwrap();
    assert_eq!(c.apply(own, source), Rect::new(0.0, 0.0, 28.0, 10.0));
    let c = Constraint::snap(src, SnapEdge::Top, SnapEdge::Bottom, 0.0).unwrap();
    assert_eq!(c.apply(own, source), Rect::new(0.0, 60.0, 10.0, 10.0));
}

#[test]
fn hold_restores_only_touched_edges() {
    let src = SceneGraph::new(1.0, 1.0).root();
    let own = Rect::new(1.0, 2.0, 3.0, 4.0);
    let prev = Rect::new(10.0, 20.0, 30.0, 40.0);
    let c = Constraint::bind(src, BindCoordinate::Y, 0.0);
    assert_eq!(c.hold(own, prev), Rect::new(1.0, 20.0, 3.0, 40.0));
}

#[test]
fn generated_names_are_unique() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    let first = graph
        .add_constraint(a, Constraint::bind(b, BindCoordinate::X, 0.0))
        .unwrap();
    let second = graph
        .add_constraint(a, Constraint::bind(b, BindCoordinate::Y, 0.0))
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(graph.constraints(a).unwrap().len(), 2);
}

#[test]
fn duplicate_names_and_stage_owners_are_rejected() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    let c = Constraint::bind(b, BindCoordinate::X, 0.0);
    graph.add_constraint_with_name(a, "x", c).unwrap();
    assert!(matches!(
        graph.add_constraint_with_name(a, "x", c),
        Err(StageError::Config(_))
    ));
    let root = graph.root();
    assert!(matches!(
        graph.add_constraint(root, Constraint::bind(a, BindCoordinate::X, 0.0)),
        Err(StageError::Config(_))
    ));
}

#[test]
fn dependency_cycles_are_rejected_at_attach_time() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    graph
        .add_constraint(a, Constraint::bind(b, BindCoordinate::X, 0.0))
        .unwrap();
    let err = graph
        .add_constraint(b, Constraint::bind(a, BindCoordinate::X, 0.0))
        .unwrap_err();
    assert!(matches!(err, StageError::Config(_)));
    assert!(graph.constraints(b).unwrap().is_empty());

    let child = graph.create_actor();
    graph.add_child(a, child).unwrap();
    assert!(
        graph
            .add_constraint(a, Constraint::align(child, AlignAxis::X, 0.0))
            .is_err()
    );
    assert!(
        graph
            .add_constraint(a, Constraint::align(a, AlignAxis::X, 0.0))
            .is_err()
    );
}

#[test]
fn dead_sources_are_stale() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    graph.destroy(b).unwrap();
    assert!(matches!(
        graph.add_constraint(a, Constraint::bind(b, BindCoordinate::X, 0.0)),
        Err(StageError::StaleActor(id)) if id == b
    ));
}

#[test]
fn remove_and_disable_by_name() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    let c = Constraint::bind(b, BindCoordinate::X, 0.0);
    graph.add_constraint_with_name(a, "follow", c).unwrap();
    graph.set_constraint_enabled(a, "follow", false).unwrap();
    assert!(!graph.constraints(a).unwrap()[0].enabled);
    assert_eq!(graph.remove_constraint(a, "follow").unwrap(), c);
    assert!(graph.remove_constraint(a, "follow").is_err());
    assert!(graph.set_constraint_enabled(a, "follow", true).is_err());
}

#[test]
fn destroying_a_source_detaches_its_constraints() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let (a, b) = pair(&mut graph);
    graph
        .add_constraint(a, Constraint::bind(b, BindCoordinate::X, 0.0))
        .unwrap();
    graph.destroy(b).unwrap();
    assert!(graph.constraints(a).unwrap().is_empty());
}

#[test]
fn constraint_kinds_deserialize_from_tagged_json() {
    let kind: ConstraintKind = serde_json::from_value(serde_json::json!({
        "type": "snap",
        "from_edge": "left",
        "to_edge": "right",
        "offset": 8.0
    }))
    .unwrap();
    assert_eq!(
        kind,
        ConstraintKind::Snap {
            from_edge: SnapEdge::Left,
            to_edge: SnapEdge::Right,
            offset: 8.0
        }
    );
    let bind: ConstraintKind =
        serde_json::from_value(serde_json::json!({ "type": "bind", "coordinate": "size" }))
            .unwrap();
    assert_eq!(
        bind,
        ConstraintKind::Bind {
            coordinate: BindCoordinate::Size,
            offset: 0.0
        }
    );
}
