use super::*;

#[test]
fn parses_each_value_kind() {
    assert_eq!("0.5".parse::<Value>().unwrap(), Value::Number(0.5));
    assert_eq!(
        "100%".parse::<Value>().unwrap(),
        Value::Length(Length::Percent(100.0))
    );
    assert_eq!("40px".parse::<Value>().unwrap(), Value::Length(Length::Px(40.0)));
    assert!(matches!(
        "#8e189e".parse::<Value>().unwrap(),
        Value::Color(_)
    ));
    let Value::Polygon(p) = "polygon(40% 20%, 60% 20%, 60% 80%, 40% 80%)"
        .parse::<Value>()
        .unwrap()
    else {
        panic!("expected polygon");
    };
    assert_eq!(p.points.len(), 4);
    assert_eq!(p.points[0], (Length::Percent(40.0), Length::Percent(20.0)));
}

#[test]
fn rejects_malformed_polygons() {
    assert!("polygon(0 0, 100% 0)".parse::<ClipPolygon>().is_err());
    assert!("polygon(0 0 0, 1 1, 2 2)".parse::<ClipPolygon>().is_err());
    assert!("rect(0 0 1 1)".parse::<ClipPolygon>().is_err());
}

#[test]
fn rejects_non_finite_numbers() {
    for raw in ["inf", "-inf", "NaN", "infinity"] {
        assert!(raw.parse::<Value>().is_err(), "{raw}");
        assert!(format!("{raw}px").parse::<Length>().is_err(), "{raw}px");
        assert!(format!("{raw}%").parse::<Value>().is_err(), "{raw}%");
    }
    assert!("polygon(0 0, NaN 0, 0 100%)".parse::<ClipPolygon>().is_err());
    assert_eq!("1e3".parse::<Value>().unwrap(), Value::Number(1000.0));
}

#[test]
fn zero_lengths_adopt_the_other_unit() {
    let from = Length::Px(0.0);
    let to = Length::Percent(100.0);
    assert_eq!(from.interpolate(to, 0.5).unwrap(), Length::Percent(50.0));
    assert!(Length::Px(10.0).interpolate(Length::Percent(10.0), 0.5).is_err());
}

#[test]
fn polygon_interpolates_vertexwise() {
    let a: ClipPolygon = "polygon(50% 50%, 50% 50%, 50% 50%, 50% 50%)".parse().unwrap();
    let b = ClipPolygon::full();
    let mid = a.interpolate(&b, 0.5).unwrap();
    assert_eq!(mid.points[0], (Length::Percent(25.0), Length::Percent(25.0)));
    assert_eq!(mid.points[2], (Length::Percent(75.0), Length::Percent(75.0)));
    assert_eq!(a.interpolate(&b, 1.0).unwrap(), b);
}

#[test]
fn mismatched_kinds_do_not_interpolate() {
    let a = Value::Number(1.0);
    let b = Value::Color(Rgba8::WHITE);
    assert!(!a.compatible(&b));
    assert!(a.interpolate(&b, 0.5).is_err());
}

#[test]
fn color_lerp_rounds_channels() {
    let a = Value::Color(Rgba8::WHITE);
    let b = Value::Color(Rgba8::rgb(0x8e, 0x18, 0x9e));
    let Value::Color(mid) = a.interpolate(&b, 0.5).unwrap() else {
        panic!("expected color");
    };
    assert_eq!(mid, Rgba8::rgb(199, 140, 207));
}

#[test]
fn serde_keeps_numbers_numeric_and_strings_textual() {
    let json = serde_json::to_string(&Value::Number(0.25)).unwrap();
    assert_eq!(json, "0.25");
    let json = serde_json::to_string(&Value::Length(Length::Percent(100.0))).unwrap();
    assert_eq!(json, "\"100%\"");
    let back: Value = serde_json::from_str("\"polygon(0 0, 100% 0, 100% 0, 0 0)\"").unwrap();
    assert!(matches!(back, Value::Polygon(_)));
}
