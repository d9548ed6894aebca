use super::*;

#[test]
fn translate_numbers_become_pixels() {
    assert_eq!(
        Property::Y.coerce(Value::Number(50.0)).unwrap(),
        Value::Length(Length::Px(50.0))
    );
    assert_eq!(
        Property::Y.coerce(Value::Length(Length::Percent(100.0))).unwrap(),
        Value::Length(Length::Percent(100.0))
    );
}

#[test]
fn rejects_values_of_the_wrong_kind() {
    assert!(Property::Opacity.coerce(Value::Length(Length::Px(1.0))).is_err());
    assert!(Property::ClipPath.coerce(Value::Number(1.0)).is_err());
    assert!(Property::Color.coerce(Value::Number(1.0)).is_err());
}

#[test]
fn property_names_match_json_keys() {
    let map: PropertyMap =
        serde_json::from_str(r#"{"opacity": 0, "y": "100%", "clipPath": "polygon(0 0, 1 0, 1 1)"}"#)
            .unwrap();
    let map = coerce_map(map).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map[&Property::Opacity], Value::Number(0.0));
    assert_eq!(Property::ClipPath.to_string(), "clipPath");
}

#[test]
fn initial_values_are_identity_styles() {
    assert_eq!(Property::Opacity.initial_value(), Value::Number(1.0));
    assert_eq!(Property::Scale.initial_value(), Value::Number(1.0));
    assert_eq!(
        Property::X.initial_value(),
        Value::Length(Length::Px(0.0))
    );
}
