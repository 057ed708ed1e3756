/// Convenience result type used across cinereveal.
pub type CineResult<T> = Result<T, CineError>;

/// Top-level error taxonomy used by library APIs.
///
/// Asset load failures are deliberately absent: a failed image still counts as settled
/// and is only logged.
#[derive(thiserror::Error, Debug)]
pub enum CineError {
    /// Invalid caller-provided data (timelines, viewports, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable configuration documents.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while painting frames onto a CPU surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CineError {
    /// Build a [`CineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CineError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
