use super::*;
use crate::foundation::color::Color;

fn actor() -> (SceneGraph, ActorId) {
    let mut graph = SceneGraph::new(100.0, 100.0);
    let a = graph.create_actor();
    graph.add_child(graph.root(), a).unwrap();
    (graph, a)
}

fn float(v: PropertyValue) -> f64 {
    v.as_float().unwrap()
}

#[test]
fn samples_interpolate_between_endpoints() {
    let p = PropertyTransition::new(PropertyId::X, 100.0).from_value(20.0);
    assert_eq!(float(p.sample(0.0).unwrap()), 20.0);
    assert_eq!(float(p.sample(0.5).unwrap()), 60.0);
    assert_eq!(float(p.sample(1.0).unwrap()), 100.0);
}

#[test]
fn values_must_match_the_property_kind() {
    let p = PropertyTransition::new(PropertyId::Opacity, Color::new(0, 0, 0, 255));
    assert!(matches!(
        Transition::property(p, 100.0),
        Err(StageError::Config(_))
    ));
    let p = PropertyTransition::new(PropertyId::BackgroundColor, 1.0);
    assert!(Transition::group(vec![GroupMember::new(p, 100.0)]).is_err());
}

#[test]
fn keyframes_are_validated() {
    let base = || PropertyTransition::new(PropertyId::X, 100.0);
    assert!(
        base()
            .with_keyframes(vec![Keyframe::new(0.6, 1.0), Keyframe::new(0.2, 2.0)])
            .is_err()
    );
    assert!(base().with_keyframes(vec![Keyframe::new(1.5, 1.0)]).is_err());
    assert!(
        base()
            .with_keyframes(vec![Keyframe::new(0.5, Color::default())])
            .is_err()
    );
}

#[test]
fn keyframes_split_the_progress() {
    let p = PropertyTransition::new(PropertyId::X, 100.0)
        .from_value(0.0)
        .with_keyframes(vec![Keyframe::new(0.5, 80.0)])
        .unwrap();
    assert_eq!(float(p.sample(0.25).unwrap()), 40.0);
    assert_eq!(float(p.sample(0.5).unwrap()), 80.0);
    assert_eq!(float(p.sample(0.75).unwrap()), 90.0);
    assert_eq!(float(p.sample(1.0).unwrap()), 100.0);

    let eased = PropertyTransition::new(PropertyId::X, 100.0)
        .from_value(0.0)
        .with_keyframes(vec![
            Keyframe::new(0.5, 50.0).with_easing(EasingMode::Steps {
                count: 1,
                at_start: false,
            }),
        ])
        .unwrap();
    assert_eq!(float(eased.sample(0.25).unwrap()), 0.0);
}

#[test]
fn a_keyframe_at_the_end_wins() {
    let p = PropertyTransition::new(PropertyId::X, 100.0)
        .from_value(0.0)
        .with_keyframes(vec![Keyframe::new(1.0, 10.0)])
        .unwrap();
    assert_eq!(float(p.sample(1.0).unwrap()), 10.0);
}

#[test]
fn implicit_start_reads_the_actor() {
    let (mut graph, a) = actor();
    graph.set_opacity(a, 100).unwrap();
    let mut t =
        Transition::property(PropertyTransition::new(PropertyId::Opacity, 200.0), 100.0).unwrap();
    t.begin(&graph, a).unwrap();
    t.timeline.start();
    t.timeline.advance(50.0);
    t.write(&mut graph, a).unwrap();
    assert_eq!(graph.opacity(a).unwrap(), 150);
}

#[test]
fn colors_interpolate_per_channel() {
    let (mut graph, a) = actor();
    let p = PropertyTransition::new(PropertyId::BackgroundColor, Color::new(200, 100, 0, 255))
        .from_value(Color::new(0, 0, 0, 255));
    let mut t = Transition::property(p, 100.0).unwrap();
    t.begin(&graph, a).unwrap();
    t.timeline.start();
    t.timeline.advance(50.0);
    t.write(&mut graph, a).unwrap();
    assert_eq!(
        graph.property(a, PropertyId::BackgroundColor).unwrap(),
        PropertyValue::Color(Color::new(100, 50, 0, 255))
    );
}

#[test]
fn group_duration_covers_the_last_member() {
    let group = Transition::group(vec![
        GroupMember::new(PropertyTransition::new(PropertyId::ScaleX, 2.0), 300.0),
        GroupMember::new(PropertyTransition::new(PropertyId::Opacity, 0.0), 200.0)
            .with_delay(200.0),
    ])
    .unwrap();
    assert_eq!(group.timeline().duration_ms(), 400.0);
    assert!(Transition::group(Vec::new()).is_err());
}

#[test]
fn group_members_run_in_their_own_window() {
    let (mut graph, a) = actor();
    let mut group = Transition::group(vec![
        GroupMember::new(
            PropertyTransition::new(PropertyId::ScaleX, 2.0).from_value(1.0),
            200.0,
        ),
        GroupMember::new(PropertyTransition::new(PropertyId::Opacity, 55.0), 100.0)
            .with_delay(100.0),
    ])
    .unwrap();
    group.begin(&graph, a).unwrap();
    group.timeline.start();

    group.timeline.advance(50.0);
    group.write(&mut graph, a).unwrap();
    assert_eq!(graph.scale(a).unwrap().0, 1.25);
    assert_eq!(graph.opacity(a).unwrap(), 255);

    group.timeline.advance(100.0);
    group.write(&mut graph, a).unwrap();
    assert_eq!(graph.scale(a).unwrap().0, 1.75);
    assert_eq!(graph.opacity(a).unwrap(), 155);
}

#[test]
fn builder_configures_the_timeline() {
    let t = Transition::property(PropertyTransition::new(PropertyId::X, 1.0), 100.0)
        .unwrap()
        .with_delay(20.0)
        .with_easing(EasingMode::EaseInQuad)
        .with_auto_reverse(true)
        .with_repeat_count(2)
        .unwrap()
        .persistent();
    assert_eq!(t.timeline().delay_ms(), 20.0);
    assert_eq!(t.timeline().progress_mode(), EasingMode::EaseInQuad);
    assert!(t.timeline().auto_reverse());
    assert_eq!(t.timeline().repeat_count(), 2);
    assert!(!t.remove_on_complete());
    assert!(matches!(t.kind(), TransitionKind::Property(p) if p.property() == PropertyId::X));
}
