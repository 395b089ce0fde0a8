use crate::OpError;
use std::time::Duration;

/// Conversion from an operation's return value into a normalized outcome.
///
/// Operations may hand back a bare value, a `Result` with any displayable
/// error, or an `Option` (where `None` is the fixed fallback failure).
pub trait IntoOutcome<T: Clone> {
    fn into_outcome(self) -> Result<T, OpError>;
}

impl<T: Clone> IntoOutcome<T> for T {
    fn into_outcome(self) -> Result<T, OpError> {
        Ok(self)
    }
}

impl<T: Clone, E> IntoOutcome<T> for Result<T, E>
where
    E: ToString,
{
    fn into_outcome(self) -> Result<T, OpError> {
        self.map_err(|error| OpError::Message(error.to_string()))
    }
}

impl<T: Clone> IntoOutcome<T> for Option<T> {
    fn into_outcome(self) -> Result<T, OpError> {
        self.ok_or(OpError::Empty)
    }
}

/// Fixed-delay bounded retry. `max_attempts` counts the additional attempts
/// after the first invocation; the attempt counter is local to one execution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        RetryPolicy::default()
    }
}
