use super::*;
use crate::animation::ease::EasingMode;
use crate::event::input::{Event, EventFlow, EventType};
use crate::foundation::color::Color;

fn stage() -> Stage {
    Stage::new(StageConfig {
        width: 400.0,
        height: 300.0,
        ..StageConfig::default()
    })
    .unwrap()
}

fn child(stage: &mut Stage, parent: ActorId) -> ActorId {
    let scene = stage.scene_mut();
    let a = scene.create_actor();
    scene.set_size(a, 10.0, 10.0).unwrap();
    scene.add_child(parent, a).unwrap();
    a
}

fn slide(to: f64, duration: f64) -> Transition {
    Transition::property(PropertyTransition::new(PropertyId::X, to), duration)
        .unwrap()
        .with_easing(EasingMode::Linear)
}

fn x(stage: &Stage, a: ActorId) -> f64 {
    stage.scene().position(a).unwrap().x
}

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
fn new_rejects_an_empty_stage() {
    let err = Stage::new(StageConfig {
        width: 0.0,
        ..StageConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, StageError::Validation(_)));

    let mut stage = stage();
    assert!(matches!(stage.set_size(-1.0, 10.0), Err(StageError::Validation(_))));
    stage.set_size(640.0, 480.0).unwrap();
    assert_eq!(stage.config().width, 640.0);
}

#[test]
fn frames_advance_transitions_by_the_delta() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    stage.add_transition(a, "slide", slide(100.0, 250.0)).unwrap();

    let report = stage.frame(125.0);
    assert_eq!(report.frame, 1);
    assert_eq!(report.dt_ms, 125.0);
    assert_eq!(report.transitions_running, 1);
    assert_eq!(x(&stage, a), 50.0);

    let report = stage.frame(125.0);
    assert_eq!(x(&stage, a), 100.0);
    assert_eq!(report.transitions_running, 0);
    assert!(report.notifications.contains(&Notification::TransitionStopped {
        actor: a,
        name: "slide".to_owned(),
        finished: true,
    }));
    assert!(stage.transition(a, "slide").is_none());
}

#[test]
fn endless_transitions_wrap_to_the_start() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    let looping = slide(100.0, 250.0).with_repeat_count(-1).unwrap();
    stage.add_transition(a, "loop", looping).unwrap();

    stage.frame(125.0);
    assert_eq!(x(&stage, a), 50.0);
    stage.frame(125.0);
    assert_eq!(x(&stage, a), 0.0);
    stage.frame(125.0);
    assert_eq!(x(&stage, a), 50.0);
    assert_eq!(stage.running_transitions(), 1);
}

#[test]
fn oversized_deltas_are_clamped() {
    let mut stage = stage();
    assert_eq!(stage.frame(10_000.0).dt_ms, 250.0);
    assert_eq!(stage.frame(-5.0).dt_ms, 0.0);
    assert_eq!(stage.clock().frames(), 2);
}

#[test]
fn tick_feeds_the_delta_between_timestamps() {
    let mut stage = stage();
    assert_eq!(stage.tick(1_000.0).dt_ms, 0.0);
    assert_eq!(stage.tick(1_016.0).dt_ms, 16.0);
    assert_eq!(stage.tick(1_032.0).frame, 3);
}

#[test]
fn removal_cancels_transitions_in_the_subtree() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    let b = child(&mut stage, a);
    stage.add_transition(b, "slide", slide(100.0, 250.0)).unwrap();
    stage.frame(50.0);

    assert_eq!(stage.remove_child(root, a).unwrap(), a);
    assert!(stage.transition_names(b).is_empty());
    let report = stage.frame(50.0);
    assert!(report.notifications.contains(&Notification::TransitionStopped {
        actor: b,
        name: "slide".to_owned(),
        finished: false,
    }));
    assert_eq!(x(&stage, b), 20.0);
}

#[test]
fn destroy_disconnects_handlers() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    let b = child(&mut stage, a);
    stage.on(b, EventType::Motion, |_, _| Ok(EventFlow::Stop)).unwrap();
    stage.on(root, EventType::Motion, |_, _| Ok(EventFlow::Stop)).unwrap();
    assert_eq!(stage.handler_count(), 2);

    let doomed = stage.destroy(a).unwrap();
    assert_eq!(doomed.len(), 2);
    assert!(doomed.contains(&b));
    assert_eq!(stage.handler_count(), 1);
    assert!(!stage.scene().contains(b));
}

#[test]
fn animate_property_without_easing_sets_directly() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    stage.animate_property(a, PropertyId::X, 30.0).unwrap();
    assert_eq!(x(&stage, a), 30.0);
    assert!(stage.transition_names(a).is_empty());

    let err = stage
        .animate_property(a, PropertyId::X, Color::new(1, 2, 3, 255))
        .unwrap_err();
    assert!(matches!(err, StageError::Config(_)));
}

#[test]
fn easing_state_turns_writes_into_transitions() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    stage
        .with_easing_state(a, |stage| {
            stage.scene_mut().set_easing_mode(a, EasingMode::Linear)?;
            stage.animate_property(a, PropertyId::X, 100.0)
        })
        .unwrap();
    assert_eq!(stage.transition_names(a), vec!["x"]);
    assert_eq!(stage.scene().easing_state(a).unwrap().duration_ms, 0.0);

    stage.frame(125.0);
    assert_eq!(x(&stage, a), 50.0);

    // A second write restarts from the current value.
    stage
        .with_easing_state(a, |stage| {
            stage.scene_mut().set_easing_mode(a, EasingMode::Linear)?;
            stage.animate_property(a, PropertyId::X, 0.0)
        })
        .unwrap();
    assert_eq!(stage.transition_names(a), vec!["x"]);
    stage.frame(125.0);
    assert_eq!(x(&stage, a), 25.0);
}

#[test]
fn easing_state_is_restored_when_the_closure_fails() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    let out: StageResult<()> = stage.with_easing_state(a, |_| Err(StageError::config("nope")));
    assert!(out.is_err());
    assert!(stage.restore_easing_state(a).is_err());
}

#[test]
fn scroll_to_point_follows_the_scroll_mode() {
    let mut stage = stage();
    let root = stage.root();
    let list = child(&mut stage, root);
    stage.scene_mut().set_scroll_mode(list, ScrollMode::Vertical).unwrap();

    stage.scroll_to_point(list, Point::new(40.0, 200.0)).unwrap();
    let offset = stage.scene().scroll_offset(list).unwrap();
    assert_eq!((offset.x, offset.y), (0.0, 200.0));

    stage.save_easing_state(list).unwrap();
    stage.scroll_to_point(list, Point::new(0.0, 0.0)).unwrap();
    stage.restore_easing_state(list).unwrap();
    assert_eq!(stage.transition_names(list), vec!["scroll-y"]);
    stage.frame(250.0);
    assert_eq!(stage.scene().scroll_offset(list).unwrap().y, 0.0);
}

#[test]
fn frame_with_hands_the_paint_list_to_the_renderer() {
    let mut stage = stage();
    let root = stage.root();
    child(&mut stage, root);
    let mut recorder = Recorder { frames: Vec::new() };
    let report = stage.frame_with(16.0, &mut recorder).unwrap();
    stage.frame_with(16.0, &mut recorder).unwrap();
    assert_eq!(recorder.frames, vec![2, 2]);
    assert_eq!(report.paint.len(), 2);
}

#[test]
fn queued_input_runs_before_layout() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    stage
        .on(root, EventType::ButtonPress, move |stage, _| {
            stage.scene_mut().set_position(a, 70.0, 0.0)?;
            Ok(EventFlow::Stop)
        })
        .unwrap();
    stage.queue_event(Event::button_press(300.0, 300.0));
    let report = stage.frame(0.0);
    assert_eq!(report.events_dispatched, 1);
    assert_eq!(stage.scene().allocation(a).unwrap().x0, 70.0);
}

#[test]
fn shutdown_tears_everything_down() {
    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    child(&mut stage, a);
    child(&mut stage, root);
    stage.add_transition(a, "slide", slide(100.0, 250.0)).unwrap();
    stage.on(a, EventType::Motion, |_, _| Ok(EventFlow::Propagate)).unwrap();
    stage.set_unhandled_handler(EventType::KeyPress, |_, _| Ok(EventFlow::Propagate));

    let report = stage.shutdown();
    assert_eq!(
        report,
        ShutdownReport {
            actors_destroyed: 3,
            transitions_cancelled: 1,
            handlers_disconnected: 2,
        }
    );
    assert_eq!(stage.scene().len(), 1);
    assert_eq!(stage.handler_count(), 0);
    assert_eq!(stage.frame(16.0).paint.len(), 1);
}

#[test]
fn removal_detaches_constraints_on_and_from_the_subtree() {
    use crate::constraint::{BindCoordinate, Constraint};

    let mut stage = stage();
    let root = stage.root();
    let a = child(&mut stage, root);
    let b = child(&mut stage, root);
    let c = child(&mut stage, root);
    let scene = stage.scene_mut();
    scene.add_constraint(a, Constraint::bind(b, BindCoordinate::X, 0.0)).unwrap();
    scene.add_constraint(c, Constraint::bind(a, BindCoordinate::X, 5.0)).unwrap();
    stage.frame(0.0);

    stage.remove_child(root, b).unwrap();
    assert!(stage.scene().constraints(a).unwrap().is_empty());
    assert_eq!(stage.scene().constraints(c).unwrap().len(), 1);

    stage.remove_child(root, a).unwrap();
    assert!(stage.scene().constraints(c).unwrap().is_empty());

    stage.scene_mut().add_child(root, a).unwrap();
    for _ in 0..3 {
        let report = stage.frame(16.0);
        assert!(report.diagnostics.is_empty());
    }
    assert!(!stage.scene().needs_relayout());
}
