use super::*;

fn actor_at(graph: &mut SceneGraph, parent: ActorId, x: f64, y: f64, w: f64, h: f64) -> ActorId {
    let a = graph.create_actor();
    graph.set_position(a, x, y).unwrap();
    graph.set_size(a, w, h).unwrap();
    graph.add_child(parent, a).unwrap();
    a
}

#[test]
fn paints_parents_before_children_in_list_order() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let root = graph.root();
    let a = actor_at(&mut graph, root, 0.0, 0.0, 50.0, 50.0);
    let inner = actor_at(&mut graph, a, 5.0, 5.0, 10.0, 10.0);
    let b = actor_at(&mut graph, root, 60.0, 0.0, 20.0, 20.0);
    graph.resolve_allocations();

    let list = PaintList::build(&graph, Color::new(0, 0, 0, 255));
    let order: Vec<_> = list.nodes.iter().map(|n| n.actor).collect();
    assert_eq!(order, vec![root, a, inner, b]);
    assert_eq!(list.stage_size, Size::new(100.0, 100.0));
    assert_eq!(list.len(), 4);
}

#[test]
fn hidden_and_transparent_subtrees_are_skipped() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let root = graph.root();
    let hidden = actor_at(&mut graph, root, 0.0, 0.0, 10.0, 10.0);
    let under_hidden = actor_at(&mut graph, hidden, 0.0, 0.0, 5.0, 5.0);
    let clear = actor_at(&mut graph, root, 0.0, 0.0, 10.0, 10.0);
    let under_clear = actor_at(&mut graph, clear, 0.0, 0.0, 5.0, 5.0);
    let half = actor_at(&mut graph, root, 0.0, 0.0, 10.0, 10.0);
    let under_half = actor_at(&mut graph, half, 0.0, 0.0, 5.0, 5.0);
    graph.set_visible(hidden, false).unwrap();
    graph.set_opacity(clear, 0).unwrap();
    graph.set_opacity(half, 51).unwrap();
    graph.set_opacity(under_half, 128).unwrap();
    graph.resolve_allocations();

    let list = PaintList::build(&graph, Color::default());
    for gone in [hidden, under_hidden, clear, under_clear] {
        assert!(list.node(gone).is_none());
    }
    assert!((list.node(half).unwrap().opacity - 0.2).abs() < 1e-6);
    let expected = 0.2 * 128.0 / 255.0;
    assert!((list.node(under_half).unwrap().opacity - expected).abs() < 1e-6);
}

#[test]
fn transforms_map_local_space_to_the_stage() {
    let mut graph = SceneGraph::new(200.0, 200.0);
    let root = graph.root();
    let a = actor_at(&mut graph, root, 10.0, 20.0, 30.0, 40.0);
    let inner = actor_at(&mut graph, a, 5.0, 5.0, 10.0, 10.0);
    graph.set_scale(a, 2.0, 2.0).unwrap();
    graph.resolve_allocations();

    let list = PaintList::build(&graph, Color::default());
    let node = list.node(a).unwrap();
    assert_eq!(node.size, Size::new(30.0, 40.0));
    assert_eq!(node.transform * Point::ORIGIN, Point::new(10.0, 20.0));
    assert_eq!(node.transform * Point::new(30.0, 40.0), Point::new(70.0, 100.0));
    let inner = list.node(inner).unwrap();
    assert_eq!(inner.transform * Point::ORIGIN, Point::new(20.0, 30.0));
}

#[test]
fn clipping_propagates_to_descendants() {
    let mut graph = SceneGraph::new(200.0, 200.0);
    let root = graph.root();
    let outer = actor_at(&mut graph, root, 10.0, 10.0, 100.0, 100.0);
    let inner = actor_at(&mut graph, outer, 50.0, 50.0, 100.0, 100.0);
    let leaf = actor_at(&mut graph, inner, 0.0, 0.0, 10.0, 10.0);
    graph.set_clip_to_allocation(outer, true).unwrap();
    graph.set_clip_to_allocation(inner, true).unwrap();
    graph.resolve_allocations();

    let list = PaintList::build(&graph, Color::default());
    assert_eq!(list.node(root).unwrap().clip, None);
    assert_eq!(
        list.node(outer).unwrap().clip,
        Some(Rect::new(10.0, 10.0, 110.0, 110.0))
    );
    assert_eq!(
        list.node(leaf).unwrap().clip,
        Some(Rect::new(60.0, 60.0, 110.0, 110.0))
    );
}

#[test]
fn visuals_and_content_revisions_are_reported() {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let root = graph.root();
    let a = actor_at(&mut graph, root, 0.0, 0.0, 10.0, 10.0);
    let red = Color::new(255, 0, 0, 255);
    graph.set_background_color(a, Some(red)).unwrap();
    graph.set_border(a, Some(red), 0.0).unwrap();
    let canvas = graph.content_mut().create_canvas(10.0, 10.0);
    graph.set_content(a, Some(canvas)).unwrap();
    let revision = graph.invalidate_content(a).unwrap();
    graph.set_depth(a, 3.0).unwrap();
    graph.resolve_allocations();

    let list = PaintList::build(&graph, Color::default());
    let node = list.node(a).unwrap();
    assert_eq!(node.background, Some(red));
    assert_eq!(node.border, None);
    assert_eq!(node.depth, 3.0);
    assert_eq!(
        node.content,
        Some(ContentRef {
            id: canvas,
            revision
        })
    );

    graph.set_border(a, Some(red), 2.0).unwrap();
    let list = PaintList::build(&graph, Color::default());
    assert_eq!(
        list.node(a).unwrap().border,
        Some(Border {
            color: red,
            width: 2.0
        })
    );
}

#[derive(Default)]
struct Recorder {
    frames: Vec<usize>,
}

impl Renderer for Recorder {
    fn render(&mut self, list: &PaintList) -> StageResult<()> {
        self.frames.push(list.len());
        Ok(())
    }
}

#[test]
fn renderers_receive_the_list() {
    let mut graph = SceneGraph::new(10.0, 10.0);
    graph.resolve_allocations();
    let mut recorder = Recorder::default();
    recorder
        .render(&PaintList::build(&graph, Color::default()))
        .unwrap();
    assert_eq!(recorder.frames, vec![1]);
}
