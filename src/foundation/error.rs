/// Crate-wide result alias.
pub type CountdownResult<T> = Result<T, CountdownError>;

/// Error type shared by every fallible countdown API.
///
/// Fallbacks (unknown style, language, or timezone) are never errors; only malformed
/// boundary input and violated encoder/renderer preconditions surface here.
#[derive(thiserror::Error, Debug)]
pub enum CountdownError {
    /// Malformed input at the record boundary (color, date, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Frame rendering precondition failed.
    #[error("render error: {0}")]
    Render(String),

    /// Container encoding precondition failed or the codec reported an error.
    #[error("encode error: {0}")]
    Encode(String),

    /// The persistence collaborator could not answer a lookup.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Any other error, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CountdownError {
    /// Build a [`CountdownError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CountdownError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CountdownError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CountdownError::Lookup`].
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
