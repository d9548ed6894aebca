use super::*;

fn def(id: Option<&str>, class: &[&str], rect: [f64; 4]) -> ElementDef {
    ElementDef {
        id: id.map(str::to_owned),
        class: class.iter().map(|c| (*c).to_owned()).collect(),
        rect,
        ..ElementDef::default()
    }
}

fn sample_doc() -> Document {
    let mut section = def(None, &["section2"], [0.0, 900.0, 1440.0, 900.0]);
    section.children = vec![
        def(None, &["image"], [0.0, 900.0, 700.0, 600.0]),
        def(None, &["content"], [720.0, 900.0, 700.0, 600.0]),
    ];
    let defs = vec![
        def(Some("hero"), &["section1"], [0.0, 0.0, 1440.0, 900.0]),
        section,
        def(None, &["image"], [0.0, 1800.0, 100.0, 100.0]),
    ];
    Document::from_defs(Viewport::default(), &defs).unwrap()
}

#[test]
fn selects_by_id_class_and_descendant() {
    let doc = sample_doc();
    assert_eq!(doc.select("#hero").unwrap(), vec![ElementId(0)]);
    assert_eq!(doc.select(".image").unwrap().len(), 2);
    assert_eq!(doc.select(".section2 .image").unwrap(), vec![ElementId(2)]);
    assert!(doc.select("#missing").unwrap().is_empty());
}

#[test]
fn unmount_hides_the_whole_subtree() {
    let mut doc = sample_doc();
    let section = doc.first(".section2").unwrap().unwrap();
    let affected = doc.unmount(section);
    assert_eq!(affected.len(), 3);
    assert!(doc.select(".section2 .image").unwrap().is_empty());
    assert_eq!(doc.select(".image").unwrap().len(), 1);
    assert!(doc.unmount(section).is_empty());
}

#[test]
fn split_chars_skips_whitespace() {
    let mut doc = Document::new(Viewport::default());
    let mut heading = def(Some("title"), &[], [0.0, 0.0, 110.0, 40.0]);
    heading.text = Some("Hi, I'm".to_owned());
    heading.split = Some(SplitDef::default());
    let id = doc.add(None, &heading).unwrap();
    let chars = doc.select("#title .char").unwrap();
    assert_eq!(chars.len(), 6);
    assert_eq!(doc.get(chars[0]).unwrap().text.as_deref(), Some("H"));
    assert!(chars.iter().all(|&c| doc.is_within(c, id)));
}

#[test]
fn rejects_duplicate_ids_and_bad_rects() {
    let mut doc = Document::new(Viewport::default());
    doc.add(None, &def(Some("a"), &[], [0.0, 0.0, 1.0, 1.0])).unwrap();
    assert!(doc.add(None, &def(Some("a"), &[], [0.0, 0.0, 1.0, 1.0])).is_err());
    assert!(doc.add(None, &def(None, &[], [0.0, 0.0, -1.0, 1.0])).is_err());
    assert!(
        doc.add(None, &def(None, &[], [0.0, f64::INFINITY, 1.0, 1.0]))
            .is_err()
    );
}

#[test]
fn scroll_height_tracks_mounted_content() {
    let mut doc = sample_doc();
    assert_eq!(doc.scroll_height(), 1900.0);
    assert_eq!(doc.max_scroll(), 1000.0);
    let tail = doc.select(".image").unwrap()[1];
    doc.unmount(tail);
    assert_eq!(doc.scroll_height(), 1800.0);
}
