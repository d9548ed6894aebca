/// Convenience result type used across the crate.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error type for page definition, choreography and delivery failures.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// Invalid page or document definition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid animation data (ease, property value, position, timeline).
    #[error("animation error: {0}")]
    Animation(String),

    /// Malformed selector.
    #[error("selector error: {0}")]
    Selector(String),

    /// Invalid scroll trigger definition or unknown trigger id.
    #[error("trigger error: {0}")]
    Trigger(String),

    /// Missing or malformed configuration.
    #[error("config error: {0}")]
    Config(String),

    /// External delivery service failure.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// (De)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StageError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`StageError::Selector`] value.
    pub fn selector(msg: impl Into<String>) -> Self {
        Self::Selector(msg.into())
    }

    /// Build a [`StageError::Trigger`] value.
    pub fn trigger(msg: impl Into<String>) -> Self {
        Self::Trigger(msg.into())
    }

    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
