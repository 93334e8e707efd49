/// Convenience result type used across the crate.
pub type RevealResult<T> = Result<T, RevealError>;

/// Error taxonomy for the fallible setup surface (configuration, fonts, serialization).
///
/// Per-frame engine paths never return errors; they clamp or defer instead.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Invalid user-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font bytes could not be registered or shaped.
    #[error("font error: {0}")]
    Font(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`RevealError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
