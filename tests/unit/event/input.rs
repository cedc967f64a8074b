use super::*;

#[test]
fn key_names_parse_case_insensitively() {
    assert_eq!(Key::parse("Escape").unwrap(), Key::Escape);
    assert_eq!(Key::parse("esc").unwrap(), Key::Escape);
    assert_eq!(Key::parse("page_up").unwrap(), Key::PageUp);
    assert_eq!(Key::parse("F5").unwrap(), Key::F(5));
    assert_eq!(Key::parse("q").unwrap(), Key::Char('q'));
    assert_eq!(Key::parse("Q").unwrap(), Key::Char('Q'));
    assert!(matches!(Key::parse("f25"), Err(StageError::Config(_))));
    assert!(Key::parse("hyper").is_err());
}

#[test]
fn keys_display_as_their_parseable_names() {
    for key in [Key::Escape, Key::PageDown, Key::F(12), Key::Char('x'), Key::Space] {
        assert_eq!(Key::parse(&key.to_string()).unwrap(), key);
    }
}

#[test]
fn keys_serialize_as_strings() {
    assert_eq!(serde_json::to_string(&Key::Escape).unwrap(), "\"escape\"");
    let key: Key = serde_json::from_str("\"f1\"").unwrap();
    assert_eq!(key, Key::F(1));
    assert!(serde_json::from_str::<Key>("\"nope\"").is_err());
}

#[test]
fn key_text() {
    assert_eq!(Key::Char('a').unicode(), Some('a'));
    assert_eq!(Key::Space.unicode(), Some(' '));
    assert_eq!(Key::Escape.unicode(), None);
}

#[test]
fn pointer_events_carry_positions() {
    let ev = Event::button_press(3.0, 4.0).with_modifiers(Modifiers::SHIFT | Modifiers::BUTTON1);
    assert_eq!(ev.event_type(), EventType::ButtonPress);
    assert_eq!(ev.position(), Some(Point::new(3.0, 4.0)));
    assert!(ev.is_pointer());
    assert!(ev.modifiers.contains(Modifiers::SHIFT));
    assert!(!ev.modifiers.contains(Modifiers::CONTROL));
    assert_eq!(ev.key(), None);
    assert_eq!(ev.source, None);

    let scroll = Event::scroll(1.0, 2.0, 0.0, -3.0);
    assert_eq!(scroll.event_type(), EventType::Scroll);
    assert!(scroll.is_pointer());
}

#[test]
fn key_events_have_no_position() {
    let ev = Event::key_release(Key::Enter).at(42);
    assert_eq!(ev.event_type(), EventType::KeyRelease);
    assert_eq!(ev.key(), Some(Key::Enter));
    assert_eq!(ev.position(), None);
    assert!(!ev.is_pointer());
    assert_eq!(ev.time_ms, 42);
}

#[test]
fn handlers_propagate_by_default() {
    assert_eq!(EventFlow::default(), EventFlow::Propagate);
    assert_eq!(Phase::default(), Phase::Bubble);
}
