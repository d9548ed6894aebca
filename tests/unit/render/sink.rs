use super::*;

fn opacity(v: f64) -> PropertyMap {
    PropertyMap::from([(Property::Opacity, Value::Number(v))])
}

#[test]
fn recording_sink_keeps_latest_values_and_counts() {
    let mut sink = RecordingSink::new();
    let a = ElementId(1);
    sink.apply_styles(a, &opacity(0.0)).unwrap();
    sink.apply_styles(a, &opacity(0.5)).unwrap();
    sink.apply_styles(
        a,
        &PropertyMap::from([(Property::Scale, Value::Number(2.0))]),
    )
    .unwrap();
    sink.end_frame(0).unwrap();

    assert_eq!(sink.value(a, Property::Opacity), Some(&Value::Number(0.5)));
    assert_eq!(sink.value(a, Property::Scale), Some(&Value::Number(2.0)));
    assert_eq!(sink.updates_for(a), 3);
    assert_eq!(sink.updates_for(ElementId(2)), 0);
    assert_eq!(sink.frames(), 1);

    sink.reset_counts();
    assert_eq!(sink.total_updates(), 0);
    assert_eq!(sink.value(a, Property::Opacity), Some(&Value::Number(0.5)));
}

#[test]
fn recording_sink_tracks_pins() {
    let mut sink = RecordingSink::new();
    sink.apply_pin(ElementId(3), PinState::Pinned { viewport_top: 0.0 })
        .unwrap();
    sink.apply_pin(ElementId(3), PinState::Released { offset: 10.0 })
        .unwrap();
    assert_eq!(sink.pin(ElementId(3)), Some(PinState::Released { offset: 10.0 }));
    assert_eq!(sink.pin(ElementId(4)), None);
}
