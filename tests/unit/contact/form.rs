use super::*;

#[test]
fn missing_reports_blank_required_fields() {
    let mut f = FormSubmission::default();
    assert_eq!(f.missing(), Field::ALL.to_vec());
    f.set(Field::Name, "Ada");
    f.set(Field::Message, "   ");
    assert_eq!(f.missing(), vec![Field::Email, Field::Message]);
    f.set(Field::Email, "ada@example.com");
    f.set(Field::Message, "hello");
    assert!(f.missing().is_empty());
}

#[test]
fn clear_empties_every_field() {
    let mut f = FormSubmission {
        name: "a".into(),
        email: "b".into(),
        message: "c".into(),
    };
    assert!(!f.is_empty());
    f.clear();
    assert!(f.is_empty());
}

#[test]
fn field_names_parse() {
    for f in Field::ALL {
        assert_eq!(f.name().parse::<Field>().unwrap(), f);
    }
    assert!("phone".parse::<Field>().is_err());
}
