/// Convenience result type used across the crate.
pub type StippleResult<T> = Result<T, StippleError>;

/// Top-level error taxonomy used by rendering and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum StippleError {
    /// Malformed or zero-area pixel input, rejected before processing.
    #[error("input error: {0}")]
    Input(String),

    /// The frame source is gone or can no longer produce frames.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The encoder rejected a frame or failed to finalize.
    #[error("sink error: {0}")]
    Sink(String),

    /// Requested output format or resolution cannot be produced.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The job was stopped through its cancellation token.
    #[error("export cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StippleError {
    /// Build a [`StippleError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`StippleError::SourceUnavailable`] value.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Build a [`StippleError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`StippleError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error ends an export job as a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
