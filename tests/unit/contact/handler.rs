use std::sync::{Arc, atomic::AtomicUsize};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;
use crate::contact::delivery::{DeliveryError, UNKNOWN_ERROR};

struct FakeDelivery {
    result: Result<(), DeliveryError>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    seen: Mutex<Vec<(String, String, FormSubmission, String)>>,
}

impl FakeDelivery {
    fn new(result: Result<(), DeliveryError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            gate: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmailDelivery for FakeDelivery {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        form: &FormSubmission,
        public_key: &str,
    ) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            service_id.to_owned(),
            template_id.to_owned(),
            form.clone(),
            public_key.to_owned(),
        ));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

fn creds() -> Credentials {
    Credentials {
        service_id: "service_x".into(),
        template_id: "template_y".into(),
        public_key: "pk_z".into(),
    }
}

fn filled(delivery: FakeDelivery) -> ContactHandler<FakeDelivery> {
    let h = ContactHandler::new(delivery, creds());
    h.set_field(Field::Name, "Ada");
    h.set_field(Field::Email, "ada@example.com");
    h.set_field(Field::Message, "Let's build something.");
    h
}

#[tokio::test]
async fn success_clears_the_form_and_releases_the_flag() {
    let h = filled(FakeDelivery::new(Ok(())));
    let outcome = h.submit().await;
    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(
        outcome.notice(),
        Some(Notice::Success(SUCCESS_NOTICE.to_owned()))
    );
    assert!(h.form().is_empty());
    assert!(!h.is_sending());

    let seen = h.delivery().seen.lock().unwrap();
    let (service, template, form, key) = &seen[0];
    assert_eq!(service, "service_x");
    assert_eq!(template, "template_y");
    assert_eq!(form.name, "Ada");
    assert_eq!(key, "pk_z");
}

#[tokio::test]
async fn failure_keeps_the_form_and_surfaces_the_message() {
    let h = filled(FakeDelivery::new(Err(DeliveryError::new(
        Some(412),
        "The template ID is invalid",
    ))));
    let before = h.form();
    let outcome = h.submit().await;
    assert_eq!(
        outcome.notice().unwrap().text(),
        "Oops! Something went wrong: The template ID is invalid"
    );
    assert_eq!(h.form(), before);
    assert!(!h.is_sending());
    assert!(matches!(outcome.into_result(), Err(StageError::Delivery(_))));
}

#[tokio::test]
async fn failure_without_message_uses_the_fallback() {
    let h = filled(FakeDelivery::new(Err(DeliveryError::new(None, ""))));
    let outcome = h.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: UNKNOWN_ERROR.to_owned()
        }
    );
}

#[tokio::test]
async fn blank_required_fields_are_not_sent() {
    let h = ContactHandler::new(FakeDelivery::new(Ok(())), creds());
    h.set_field(Field::Name, "Ada");
    let outcome = h.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Invalid {
            missing: vec![Field::Email, Field::Message]
        }
    );
    assert_eq!(h.delivery().calls.load(Ordering::SeqCst), 0);
    assert!(!h.is_sending());
    assert_eq!(h.form().name, "Ada");
}

#[tokio::test]
async fn overlapping_submissions_are_rejected() {
    let gate = Arc::new(Notify::new());
    let mut delivery = FakeDelivery::new(Ok(()));
    delivery.gate = Some(Arc::clone(&gate));
    let h = filled(delivery);

    let (first, second) = tokio::join!(h.submit(), async {
        assert!(h.is_sending());
        assert!(!h.set_field(Field::Name, "Eve"));
        let outcome = h.submit().await;
        gate.notify_one();
        outcome
    });

    assert_eq!(first, SubmitOutcome::Sent);
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(h.delivery().calls.load(Ordering::SeqCst), 1);
    assert!(!h.is_sending());
}
