//! Failure and outcome types for streaming handlers.

use thiserror::Error;

/// A business or request failure inside a handler.
///
/// Cancellation is deliberately not a variant: a cancelled call is reported
/// as [`Outcome::Cancelled`] or as a stream that simply ends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A request failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The handler failed with an application error.
    #[error("{code}: {message}")]
    Failed { code: String, message: String },

    /// The inbound request stream ended abnormally.
    #[error("request stream failed: {0}")]
    Source(String),
}

impl StreamError {
    /// Creates an application failure.
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for a single streamed item.
pub type Result<T> = std::result::Result<T, StreamError>;

/// The result of a unary-shaped call (unary or client stream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The call produced a value.
    Completed(T),
    /// The call failed.
    Failed(StreamError),
    /// The call was cancelled before it produced a value.
    Cancelled,
}

impl<T> Outcome<T> {
    /// Returns whether the call completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns whether the call was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&StreamError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Maps the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Completed(value) => Outcome::Completed(f(value)),
            Self::Failed(err) => Outcome::Failed(err),
            Self::Cancelled => Outcome::Cancelled,
        }
    }

    /// Chains a fallible step onto a completed value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Completed(value) => f(value),
            Self::Failed(err) => Outcome::Failed(err),
            Self::Cancelled => Outcome::Cancelled,
        }
    }

    /// Converts to an optional result; `None` means cancelled.
    pub fn into_result(self) -> Option<Result<T>> {
        match self {
            Self::Completed(value) => Some(Ok(value)),
            Self::Failed(err) => Some(Err(err)),
            Self::Cancelled => None,
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(err) => Self::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        let ok: Outcome<i32> = Ok(2).into();
        assert_eq!(ok.clone().map(|v| v * 2), Outcome::Completed(4));
        assert_eq!(ok.into_result(), Some(Ok(2)));

        let failed: Outcome<i32> = Err(StreamError::Validation("empty".into())).into();
        assert!(failed.failure().is_some());
        assert_eq!(
            failed.and_then(|v| Outcome::Completed(v + 1)),
            Outcome::Failed(StreamError::Validation("empty".into()))
        );

        let cancelled: Outcome<i32> = Outcome::Cancelled;
        assert!(cancelled.is_cancelled());
        assert!(cancelled.failure().is_none());
        assert_eq!(cancelled.into_result(), None);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StreamError::failed("not_found", "order 7").to_string(),
            "not_found: order 7"
        );
    }
}
