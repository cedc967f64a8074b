use super::*;

fn actor(idx: u32) -> ActorId {
    ActorId { idx, generation: 0 }
}

#[test]
fn first_attacher_owns_the_content() {
    let mut store = ContentStore::default();
    let canvas = store.create_canvas(32.0, 16.0);
    store.attach(canvas, actor(1)).unwrap();
    store.attach(canvas, actor(2)).unwrap();
    assert_eq!(store.owner(canvas).unwrap(), Some(actor(1)));
    assert_eq!(store.attached(canvas).unwrap(), &[actor(1), actor(2)]);
}

#[test]
fn only_the_owner_may_invalidate() {
    let mut store = ContentStore::default();
    let canvas = store.create_canvas(32.0, 16.0);
    store.attach(canvas, actor(1)).unwrap();
    store.attach(canvas, actor(2)).unwrap();
    assert_eq!(store.invalidate(canvas, actor(1)).unwrap(), 1);
    assert!(matches!(
        store.invalidate(canvas, actor(2)),
        Err(StageError::Content(_))
    ));
    assert_eq!(store.revision(canvas).unwrap(), 1);
}

#[test]
fn ownership_passes_to_the_next_attacher() {
    let mut store = ContentStore::default();
    let canvas = store.create_canvas(10.0, 10.0);
    store.attach(canvas, actor(1)).unwrap();
    store.attach(canvas, actor(2)).unwrap();
    store.detach(canvas, actor(1));
    assert_eq!(store.owner(canvas).unwrap(), None);
    store.attach(canvas, actor(3)).unwrap();
    assert_eq!(store.owner(canvas).unwrap(), Some(actor(3)));
}

#[test]
fn canvas_resizes_but_image_does_not() {
    let mut store = ContentStore::default();
    let canvas = store.create_canvas(10.0, 10.0);
    let image = store.create_image(4.0, 3.0);
    store.attach(canvas, actor(1)).unwrap();
    store.attach(image, actor(1)).unwrap();
    store.set_canvas_size(canvas, actor(1), 20.0, 5.0).unwrap();
    assert_eq!(store.preferred_size(canvas), Some(Size::new(20.0, 5.0)));
    assert!(store.set_canvas_size(image, actor(1), 1.0, 1.0).is_err());
    assert_eq!(store.preferred_size(image), Some(Size::new(4.0, 3.0)));
}

#[test]
fn unknown_ids_are_content_errors() {
    let store = ContentStore::default();
    assert!(store.kind(ContentId(9)).is_err());
    assert_eq!(store.preferred_size(ContentId(9)), None);
}
