use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease} at 1");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in Ease::ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn in_out_eases_pass_through_midpoint() {
    for ease in [
        Ease::InOutQuad,
        Ease::InOutCubic,
        Ease::InOutQuart,
        Ease::InOutQuint,
        Ease::InOutSine,
        Ease::InOutExpo,
    ] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-12, "{ease}");
    }
}

#[test]
fn parses_family_and_direction_names() {
    assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
    assert_eq!("power1.out".parse::<Ease>().unwrap(), Ease::OutQuad);
    assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::OutQuart);
    assert_eq!("sine.out".parse::<Ease>().unwrap(), Ease::OutSine);
    assert_eq!("expo.inOut".parse::<Ease>().unwrap(), Ease::InOutExpo);
    assert_eq!("expo".parse::<Ease>().unwrap(), Ease::OutExpo);
    assert!("bounce.out".parse::<Ease>().is_err());
    assert!("power2.sideways".parse::<Ease>().is_err());
}

#[test]
fn serde_uses_string_names() {
    for ease in Ease::ALL {
        let json = serde_json::to_string(&ease).unwrap();
        let back: Ease = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ease);
    }
    assert_eq!(serde_json::to_string(&Ease::OutCubic).unwrap(), "\"power2.out\"");
}

#[test]
fn clamps_out_of_range_input() {
    assert_eq!(Ease::OutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}
