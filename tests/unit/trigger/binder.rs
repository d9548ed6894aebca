use super::*;
use crate::{document::ElementDef, foundation::core::Viewport};

fn doc() -> Document {
    let defs = vec![
        ElementDef {
            id: Some("section".into()),
            rect: [0.0, 1000.0, 1440.0, 800.0],
            children: vec![ElementDef {
                id: Some("inner".into()),
                rect: [0.0, 1100.0, 1440.0, 200.0],
                ..ElementDef::default()
            }],
            ..ElementDef::default()
        },
        ElementDef {
            id: Some("hook".into()),
            rect: [0.0, 3000.0, 1440.0, 900.0],
            ..ElementDef::default()
        },
    ];
    Document::from_defs(Viewport::new(1440.0, 900.0).unwrap(), &defs).unwrap()
}

fn spec(doc: &Document, region: &str, start: &str, end: &str) -> TriggerSpec {
    TriggerSpec {
        region: doc.first(region).unwrap(),
        start: start.parse().unwrap(),
        end: end.parse().unwrap(),
        pin: false,
        pin_spacing: true,
        scrub: Scrub::Immediate,
    }
}

#[test]
fn register_resolves_ranges_from_markers() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let id = b.register(spec(&d, "#section", "top bottom", "bottom top"), &d).unwrap();
    let r = b.range(id).unwrap();
    assert_eq!(r.start, 100.0);
    assert_eq!(r.end, 1800.0);
    assert_eq!(b.len(), 1);
}

#[test]
fn relative_start_is_rejected() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let err = b
        .register(spec(&d, "#section", "+=100px", "bottom top"), &d)
        .unwrap_err();
    assert!(matches!(err, StageError::Trigger(_)));
    assert!(b.is_empty());
}

#[test]
fn missing_region_is_inert() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let id = b.register(spec(&d, "#nope", "top top", "bottom top"), &d).unwrap();
    assert!(b.contains(id));
    assert_eq!(b.range(id), None);
    assert_eq!(b.progress(id, 500.0), None);
    assert!(b.update(500.0, 0.016).is_empty());
}

#[test]
fn progress_is_direction_symmetric() {
    let d = doc();
    let mut down = TriggerBinder::new();
    let mut up = TriggerBinder::new();
    let a = down.register(spec(&d, "#section", "top top", "bottom top"), &d).unwrap();
    let b = up.register(spec(&d, "#section", "top top", "bottom top"), &d).unwrap();

    let positions: Vec<f64> = (0..=40).map(|i| i as f64 * 50.0).collect();
    let forward: Vec<f64> = positions
        .iter()
        .map(|&p| down.update(p, 0.016)[0].progress)
        .collect();
    let mut backward: Vec<f64> = positions
        .iter()
        .rev()
        .map(|&p| up.update(p, 0.016)[0].progress)
        .collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(down.progress(a, 1400.0), up.progress(b, 1400.0));
    assert_eq!(down.progress(a, 1400.0), Some(0.5));
}

#[test]
fn phase_changes_emit_events() {
    let d = doc();
    let mut b = TriggerBinder::new();
    b.register(spec(&d, "#section", "top top", "bottom top"), &d).unwrap();

    assert!(b.update(0.0, 0.016)[0].events.is_empty());
    assert_eq!(b.update(1200.0, 0.016)[0].events, vec![TriggerEvent::Enter]);
    assert!(b.update(1300.0, 0.016)[0].events.is_empty());
    assert_eq!(b.update(2000.0, 0.016)[0].events, vec![TriggerEvent::Leave]);
    assert_eq!(
        b.update(0.0, 0.016)[0].events,
        vec![TriggerEvent::EnterBack, TriggerEvent::LeaveBack]
    );
}

#[test]
fn smooth_scrub_lags_then_catches_up() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let mut s = spec(&d, "#section", "top top", "bottom top");
    s.scrub = Scrub::Smooth(1.0);
    b.register(s, &d).unwrap();

    let first = b.update(1800.0, 0.1).remove(0);
    assert_eq!(first.progress, 1.0);
    assert!(first.scrubbed > 0.0 && first.scrubbed < 1.0);

    let mut last = first.scrubbed;
    for _ in 0..200 {
        let u = b.update(1800.0, 0.1).remove(0);
        assert!(u.scrubbed >= last);
        last = u.scrubbed;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn pinned_trigger_reports_pin_state_and_spacing() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let mut s = spec(&d, "#hook", "top top", "+=1300vh");
    s.pin = true;
    let id = b.register(s, &d).unwrap();

    let r = b.range(id).unwrap();
    assert_eq!(r.start, 3000.0);
    assert_eq!(r.end, 3000.0 + 13.0 * 900.0);
    assert_eq!(b.pin_spacing(id), 13.0 * 900.0);

    assert_eq!(b.update(0.0, 0.0)[0].pin, Some(PinState::Unpinned));
    assert_eq!(
        b.update(5000.0, 0.0)[0].pin,
        Some(PinState::Pinned { viewport_top: 0.0 })
    );
    assert_eq!(
        b.update(1e6, 0.0)[0].pin,
        Some(PinState::Released {
            offset: 13.0 * 900.0
        })
    );
}

#[test]
fn kill_within_removes_only_the_subtree() {
    let d = doc();
    let mut b = TriggerBinder::new();
    let outer = b.register(spec(&d, "#section", "top top", "bottom top"), &d).unwrap();
    let inner = b.register(spec(&d, "#inner", "top top", "bottom top"), &d).unwrap();
    let hook = b.register(spec(&d, "#hook", "top top", "bottom top"), &d).unwrap();

    let section = d.first("#section").unwrap().unwrap();
    let killed = b.kill_within(&d, section);
    assert_eq!(killed, vec![outer, inner]);
    assert!(!b.contains(outer));
    assert!(b.contains(hook));
    assert!(!b.kill(outer));
    assert_eq!(b.kill_all(), 1);
    assert!(b.is_empty());
}

#[test]
fn refresh_deactivates_unmounted_regions() {
    let mut d = doc();
    let mut b = TriggerBinder::new();
    let id = b.register(spec(&d, "#inner", "top top", "bottom top"), &d).unwrap();
    let section = d.first("#section").unwrap().unwrap();
    d.unmount(section);
    b.refresh(&d).unwrap();
    assert_eq!(b.range(id), None);
}

#[test]
fn toggle_actions_parse_and_dispatch() {
    let t: ToggleActions = "play none none reverse".parse().unwrap();
    assert_eq!(t.action_for(TriggerEvent::Enter), PlaybackAction::Play);
    assert_eq!(t.action_for(TriggerEvent::LeaveBack), PlaybackAction::Reverse);
    assert_eq!(String::from(t), "play none none reverse");
    assert_eq!(
        ToggleActions::default(),
        "play none none none".parse::<ToggleActions>().unwrap()
    );
    assert!("play none".parse::<ToggleActions>().is_err());
    assert!("play none none jump".parse::<ToggleActions>().is_err());
}

#[test]
fn scrub_deserializes_from_bool_or_seconds() {
    assert_eq!(serde_json::from_str::<Scrub>("false").unwrap(), Scrub::Off);
    assert_eq!(serde_json::from_str::<Scrub>("true").unwrap(), Scrub::Immediate);
    assert_eq!(serde_json::from_str::<Scrub>("1").unwrap(), Scrub::Smooth(1.0));
    assert!(serde_json::from_str::<Scrub>("-2").is_err());
}

#[test]
fn pin_spacing_pushes_later_regions_down() {
    let mut defs = vec![
        ElementDef {
            id: Some("hook".into()),
            rect: [0.0, 0.0, 1440.0, 900.0],
            ..ElementDef::default()
        },
        ElementDef {
            id: Some("footer".into()),
            rect: [0.0, 900.0, 1440.0, 900.0],
            ..ElementDef::default()
        },
    ];
    defs.reverse();
    let d = Document::from_defs(Viewport::new(1440.0, 900.0).unwrap(), &defs).unwrap();
    let mut b = TriggerBinder::new();
    let footer = b.register(spec(&d, "#footer", "top top", "bottom top"), &d).unwrap();
    let mut hook = spec(&d, "#hook", "top top", "+=200vh");
    hook.pin = true;
    b.register(hook, &d).unwrap();

    assert_eq!(b.range(footer).unwrap().start, 900.0);
    b.refresh(&d).unwrap();
    assert_eq!(b.range(footer).unwrap().start, 900.0 + 1800.0);
    assert_eq!(b.total_pin_spacing(), 1800.0);
}
