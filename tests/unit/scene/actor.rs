use super::*;

#[test]
fn property_names_roundtrip() {
    for p in PropertyId::ALL {
        assert_eq!(PropertyId::from_name(p.name()).unwrap(), p);
    }
    assert_eq!(
        PropertyId::from_name("scale_x").unwrap(),
        PropertyId::ScaleX
    );
    assert_eq!(
        PropertyId::from_name("rotation").unwrap(),
        PropertyId::RotationZ
    );
    assert!(matches!(
        PropertyId::from_name("wobble"),
        Err(StageError::Config(_))
    ));
}

#[test]
fn value_kinds_follow_property() {
    assert_eq!(PropertyId::BackgroundColor.kind(), ValueKind::Color);
    assert_eq!(PropertyId::Opacity.kind(), ValueKind::Float);
    assert!(PropertyId::Width.affects_layout());
    assert!(!PropertyId::Opacity.affects_layout());
}

#[test]
fn interpolation_requires_matching_kinds() {
    let v = PropertyValue::Float(0.0)
        .interpolate(PropertyValue::Float(100.0), 0.5)
        .unwrap();
    assert_eq!(v, PropertyValue::Float(50.0));

    let c = PropertyValue::Color(Color::new(0, 0, 0, 255))
        .interpolate(PropertyValue::Color(Color::new(200, 0, 0, 255)), 0.5)
        .unwrap();
    assert_eq!(c.as_color(), Some(Color::new(100, 0, 0, 255)));

    assert!(
        PropertyValue::Float(1.0)
            .interpolate(PropertyValue::Color(Color::default()), 0.5)
            .is_err()
    );
}

#[test]
fn property_values_deserialize_untagged() {
    let v: PropertyValue = serde_json::from_str("12.5").unwrap();
    assert_eq!(v, PropertyValue::Float(12.5));
    let v: PropertyValue = serde_json::from_str("\"#00ff00\"").unwrap();
    assert_eq!(v, PropertyValue::Color(Color::new(0, 255, 0, 255)));
}

#[test]
fn alignment_parses_names() {
    assert_eq!(LayoutAlign::parse("Center").unwrap(), LayoutAlign::Center);
    assert!(LayoutAlign::parse("middle").is_err());
}

#[test]
fn new_nodes_start_with_fixed_layout_and_idle_easing() {
    let node = ActorNode::new(Some("a".into()));
    assert_eq!(node.layout.name(), "fixed");
    assert_eq!(node.easing().duration_ms, 0.0);
    assert_eq!(node.opacity, 255);
    assert!(node.visible);
    assert!(!node.reactive);
}
