use super::*;

#[test]
fn damp_converges_and_is_frame_rate_independent() {
    let one_step = damp(0.0, 100.0, 4.8, 1.0 / 30.0);
    let two_steps = damp(damp(0.0, 100.0, 4.8, 1.0 / 60.0), 100.0, 4.8, 1.0 / 60.0);
    assert!((one_step - two_steps).abs() < 1e-9);
    assert!(damp(0.0, 100.0, 4.8, 10.0) > 99.99);
}

#[test]
fn clamp01_handles_nan() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(3.0), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
}
