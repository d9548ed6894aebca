use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_temp(name: &str, body: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scrollstage_cfg_{}_{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scrollstage.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn defaults_without_file_or_env() {
    let s = Settings::load_with(Some(&write_temp("empty", "")), env(&[])).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.fps, DEFAULT_FPS);
    assert_eq!(s.emailjs_endpoint, EMAILJS_ENDPOINT);
}

#[test]
fn env_overrides_file() {
    let path = write_temp(
        "layered",
        r#"
fps = 30

[scroll]
lerp = 0.1

[emailjs]
service_id = "svc_file"
template_id = "tpl_file"
"#,
    );
    let s = Settings::load_with(
        Some(&path),
        env(&[("EMAILJS_SERVICE_ID", "svc_env"), ("EMAILJS_PUBLIC_KEY", "pk")]),
    )
    .unwrap();
    assert_eq!(s.fps, 30);
    assert_eq!(s.lerp, Some(0.1));
    let creds = s.credentials().unwrap();
    assert_eq!(creds.service_id, "svc_env");
    assert_eq!(creds.template_id, "tpl_file");
    assert_eq!(creds.public_key, "pk");
}

#[test]
fn missing_credentials_name_every_variable() {
    let s = Settings::load_with(
        Some(&write_temp("creds", "")),
        env(&[("EMAILJS_TEMPLATE_ID", "tpl")]),
    )
    .unwrap();
    let msg = s.credentials().unwrap_err().to_string();
    assert!(msg.contains("EMAILJS_SERVICE_ID"));
    assert!(msg.contains("EMAILJS_PUBLIC_KEY"));
    assert!(!msg.contains("EMAILJS_TEMPLATE_ID"));
}

#[test]
fn bad_values_are_config_errors() {
    let path = write_temp("bad", "");
    for pairs in [
        [("SCROLLSTAGE_FPS", "fast")],
        [("SCROLLSTAGE_FPS", "0")],
        [("SCROLLSTAGE_LERP", "2")],
    ] {
        let err = Settings::load_with(Some(&path), env(&pairs)).unwrap_err();
        assert!(matches!(err, StageError::Config(_)), "{pairs:?}");
    }
    let unknown = write_temp("unknown", "colour = \"red\"\n");
    assert!(matches!(
        Settings::load_with(Some(&unknown), env(&[])),
        Err(StageError::Config(_))
    ));
    assert!(Settings::load_with(Some(Path::new("/nonexistent/scrollstage.toml")), env(&[])).is_err());
}

#[test]
fn configured_lerp_overrides_page_smoothing() {
    let s = Settings {
        lerp: Some(0.2),
        ..Settings::default()
    };
    let opts = s.smooth_scroll(SmoothScrollOpts::default());
    assert_eq!(opts.lerp, 0.2);
    assert_eq!(opts.wheel_multiplier, 1.0);
    assert_eq!(Settings::default().smooth_scroll(opts), opts);
}
