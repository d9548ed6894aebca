use super::*;

fn minimal(scenes: &str) -> String {
    format!(
        r##"{{
            "name": "t",
            "elements": [{{ "id": "a", "rect": [0, 0, 100, 100] }}],
            "triggers": {{ "a": {{ "region": "#a", "scrub": true }} }},
            "scenes": {scenes}
        }}"##
    )
}

#[test]
fn builtin_pages_parse_and_validate() {
    for name in Page::BUILTIN {
        let page = Page::builtin(name).unwrap();
        assert_eq!(page.name(), name);
        page.validate().unwrap();
    }
    assert!(Page::builtin("blog").is_err());
}

#[test]
fn portfolio_declares_the_hook_pin() {
    let page = Page::builtin("portfolio").unwrap();
    let hook = &page.def().triggers["hook"];
    assert!(hook.pin);
    assert_eq!(hook.end.to_string(), "+=1300vh");
    assert_eq!(hook.scrub, crate::trigger::binder::Scrub::Smooth(1.0));
    assert!(page.def().menu.is_some());
}

#[test]
fn unknown_trigger_is_rejected() {
    let src = minimal(
        r##"[{ "name": "s", "drive": { "scrub": { "trigger": "nope" } },
               "steps": [{ "targets": "#a", "to": { "opacity": 1 } }] }]"##,
    );
    let err = Page::from_json(&src).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("unknown trigger"));
}

#[test]
fn after_must_name_another_scene() {
    let src = minimal(
        r##"[{ "name": "s", "drive": { "after": { "scene": "s" } },
               "steps": [{ "targets": "#a", "to": { "opacity": 1 } }] }]"##,
    );
    assert!(Page::from_json(&src).unwrap().validate().is_err());
}

#[test]
fn duplicate_scene_names_are_rejected() {
    let step = r##"{ "targets": "#a", "to": { "opacity": 1 } }"##;
    let src = minimal(&format!(
        r#"[{{ "name": "s", "drive": "manual", "steps": [{step}] }},
            {{ "name": "s", "drive": "manual", "steps": [{step}] }}]"#
    ));
    assert!(Page::from_json(&src).unwrap().validate().is_err());
}

#[test]
fn bad_values_fail_at_parse_time() {
    let src = minimal(
        r##"[{ "name": "s", "drive": "manual",
               "steps": [{ "targets": "#a", "to": { "opacity": 1 }, "ease": "wobbly" }] }]"##,
    );
    assert!(matches!(
        Page::from_json(&src),
        Err(StageError::Validation(_))
    ));
}

#[test]
fn steps_need_properties_and_valid_selectors() {
    let empty = minimal(r##"[{ "name": "s", "drive": "manual", "steps": [{ "targets": "#a" }] }]"##);
    assert!(Page::from_json(&empty).unwrap().validate().is_err());

    let tag = minimal(
        r#"[{ "name": "s", "drive": "manual", "steps": [{ "targets": "div", "to": { "opacity": 1 } }] }]"#,
    );
    assert!(Page::from_json(&tag).unwrap().validate().is_err());
}
