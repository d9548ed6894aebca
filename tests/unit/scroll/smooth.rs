use super::*;

fn scroller(limit: f64) -> SmoothScroll {
    SmoothScroll::new(SmoothScrollOpts::default(), limit).unwrap()
}

#[test]
fn eases_toward_the_target_and_settles() {
    let mut s = scroller(5000.0);
    s.on_wheel(1000.0);
    let first = s.tick(1.0 / 60.0);
    assert!(first.position > 0.0 && first.position < 1000.0);
    assert!(first.moving);
    assert_eq!(first.direction, ScrollDirection::Down);

    let mut last = first;
    for _ in 0..600 {
        let next = s.tick(1.0 / 60.0);
        assert!(next.position >= last.position);
        last = next;
    }
    assert_eq!(last.position, 1000.0);
    assert!(!last.moving);
}

#[test]
fn lerp_is_the_fraction_covered_per_60hz_frame() {
    let mut s = scroller(5000.0);
    s.on_wheel(1000.0);
    let frame = s.tick(1.0 / 60.0);
    let expected = 1000.0 * (1.0 - (-0.08f64).exp());
    assert!((frame.position - expected).abs() < 1e-9);
}

#[test]
fn clamps_to_limits() {
    let mut s = scroller(300.0);
    s.on_wheel(-50.0);
    assert_eq!(s.target(), 0.0);
    s.on_wheel(10_000.0);
    assert_eq!(s.target(), 300.0);
    s.set_limit(100.0);
    assert_eq!(s.target(), 100.0);
}

#[test]
fn locked_scroller_ignores_input() {
    let mut s = scroller(1000.0);
    let guard = s.lock().acquire();
    s.on_wheel(200.0);
    s.scroll_to(500.0, true);
    assert_eq!(s.target(), 0.0);
    drop(guard);
    s.on_wheel(200.0);
    assert_eq!(s.target(), 200.0);
}

#[test]
fn locking_mid_glide_freezes_the_position() {
    let mut s = scroller(5000.0);
    s.on_wheel(2000.0);
    s.tick(1.0 / 60.0);
    let held = s.position();
    assert!(held > 0.0 && held < 2000.0);

    let guard = s.lock().acquire();
    for _ in 0..60 {
        let frame = s.tick(1.0 / 60.0);
        assert_eq!(frame.velocity, 0.0);
        assert!(!frame.moving);
    }
    assert_eq!(s.position(), held);
    assert_eq!(s.target(), held);

    drop(guard);
    s.tick(1.0 / 60.0);
    assert_eq!(s.position(), held);
}

#[test]
fn immediate_scroll_jumps_and_reports_direction() {
    let mut s = scroller(1000.0);
    s.scroll_to(800.0, true);
    assert_eq!(s.position(), 800.0);
    s.scroll_to(100.0, false);
    let frame = s.tick(1.0 / 60.0);
    assert_eq!(frame.direction, ScrollDirection::Up);
}

#[test]
fn rejects_invalid_options() {
    let opts = SmoothScrollOpts {
        lerp: 0.0,
        ..SmoothScrollOpts::default()
    };
    assert!(SmoothScroll::new(opts, 10.0).is_err());
}
