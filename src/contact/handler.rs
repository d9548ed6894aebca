use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    contact::{
        delivery::EmailDelivery,
        form::{Field, FormSubmission},
    },
    foundation::error::{StageError, StageResult},
};

/// Shown after a successful send.
pub const SUCCESS_NOTICE: &str = "Message sent successfully! I will get back to you shortly.";

/// Identifiers passed to the delivery service with every message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

/// What the user is told after a submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(t) | Self::Failure(t) => t,
        }
    }
}

/// Result of [`ContactHandler::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered; the form was cleared.
    Sent,
    /// Delivery failed; the form is unchanged.
    Failed { message: String },
    /// Another submission is in flight.
    Busy,
    /// Required fields are blank; nothing was sent.
    Invalid { missing: Vec<Field> },
}

impl SubmitOutcome {
    /// Notice to show, if the outcome warrants one.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Sent => Some(Notice::Success(SUCCESS_NOTICE.to_owned())),
            Self::Failed { message } => Some(Notice::Failure(format!(
                "Oops! Something went wrong: {message}"
            ))),
            Self::Busy | Self::Invalid { .. } => None,
        }
    }

    pub fn into_result(self) -> StageResult<()> {
        match self {
            Self::Sent => Ok(()),
            Self::Failed { message } => Err(StageError::delivery(message)),
            Self::Busy => Err(StageError::delivery("a submission is already in flight")),
            Self::Invalid { missing } => {
                let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
                Err(StageError::validation(format!(
                    "required fields missing: {}",
                    names.join(", ")
                )))
            }
        }
    }
}

/// Clears the sending flag when dropped, whatever the outcome.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn begin(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Contact form state plus the submit flow.
///
/// Submitting never navigates; it yields a [`SubmitOutcome`]. Overlapping submissions are
/// rejected, not queued, and an in-flight send is never cancelled.
pub struct ContactHandler<D> {
    delivery: D,
    credentials: Credentials,
    form: Mutex<FormSubmission>,
    sending: AtomicBool,
}

impl<D: EmailDelivery> ContactHandler<D> {
    pub fn new(delivery: D, credentials: Credentials) -> Self {
        Self {
            delivery,
            credentials,
            form: Mutex::new(FormSubmission::default()),
            sending: AtomicBool::new(false),
        }
    }

    fn lock_form(&self) -> MutexGuard<'_, FormSubmission> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Edit a field. Inputs are disabled while sending, so this returns `false` then.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> bool {
        if self.is_sending() {
            return false;
        }
        self.lock_form().set(field, value);
        true
    }

    /// Current form values.
    pub fn form(&self) -> FormSubmission {
        self.lock_form().clone()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Send the current form values.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = InFlight::begin(&self.sending) else {
            tracing::debug!("contact submission rejected: already sending");
            return SubmitOutcome::Busy;
        };

        let submission = self.form();
        let missing = submission.missing();
        if !missing.is_empty() {
            return SubmitOutcome::Invalid { missing };
        }

        let creds = &self.credentials;
        let result = self
            .delivery
            .send(
                &creds.service_id,
                &creds.template_id,
                &submission,
                &creds.public_key,
            )
            .await;
        match result {
            Ok(()) => {
                tracing::info!(email = %submission.email, "contact message sent");
                self.lock_form().clear();
                SubmitOutcome::Sent
            }
            Err(err) => {
                tracing::warn!(status = ?err.status, error = %err, "contact message failed");
                SubmitOutcome::Failed {
                    message: err.display_message().to_owned(),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/contact/handler.rs"]
mod tests;
