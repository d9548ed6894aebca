use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::contact::form::FormSubmission;

/// EmailJS REST endpoint for template sends.
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Shown when a failure carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Rejection reported by the delivery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    /// HTTP status, when the service answered.
    pub status: Option<u16>,
    /// Best-effort reason (response text or transport error).
    pub message: Option<String>,
}

impl DeliveryError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            message: (!message.trim().is_empty()).then_some(message),
        }
    }

    /// The reason, or [`UNKNOWN_ERROR`].
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(UNKNOWN_ERROR)
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_message())
    }
}

impl std::error::Error for DeliveryError {}

/// External message delivery: `send(serviceId, templateId, formData, publicKey)`.
///
/// Resolves whenever the service responds; there is no timeout and calls are never cancelled.
#[async_trait]
pub trait EmailDelivery: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        form: &FormSubmission,
        public_key: &str,
    ) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a FormSubmission,
}

/// [`EmailDelivery`] backed by the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots).
    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for EmailJsClient {
    fn default() -> Self {
        Self::new(EMAILJS_ENDPOINT)
    }
}

#[async_trait]
impl EmailDelivery for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        form: &FormSubmission,
        public_key: &str,
    ) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&SendRequest {
                service_id,
                template_id,
                user_id: public_key,
                template_params: form,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::new(None, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(DeliveryError::new(Some(status.as_u16()), text))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/contact/delivery.rs"]
mod tests;
