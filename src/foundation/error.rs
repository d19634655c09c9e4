/// Convenience result type used across codereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the animation, render and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided document, settings or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cooperative cancellation. Not a defect; batch jobs report it as `cancelled`.
    #[error("export aborted")]
    Aborted,

    /// The requested export format has no registered encoder.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The underlying format sink rejected a frame or failed to finalize.
    #[error("{format} encoding failed: {message}")]
    EncodingBackend {
        /// Format the failing sink was producing.
        format: String,
        /// Backend failure detail.
        message: String,
    },

    /// The renderer was used before a document was set.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// An easing id outside the closed easing set.
    #[error("unknown easing '{0}'")]
    UnknownEasing(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::UnsupportedFormat`] value.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Build a [`ReelError::EncodingBackend`] value.
    pub fn encoding(format: impl std::fmt::Display, msg: impl Into<String>) -> Self {
        Self::EncodingBackend {
            format: format.to_string(),
            message: msg.into(),
        }
    }

    /// Build a [`ReelError::InvalidDocument`] value.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for cooperative cancellation.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
