//! Call failures raised by the reference VM.
//!
//! The VM never returns these directly: `call` formats them into the
//! context's error slot and reports `false`, like any native failure.

use tether_common::TypeTag;
use thiserror::Error;

/// Reasons a call can fail before the callee runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The value below the arguments is not a function.
    #[error("{0} is not callable")]
    NotCallable(TypeTag),

    /// Argument count differs from the declared arity.
    #[error("{function} expects {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: u8,
        got: usize,
    },

    /// Nested native calls exceeded the configured limit.
    #[error("call depth exceeded limit {limit}")]
    CallDepthExceeded { limit: usize },

    /// Fewer values in the frame than the callable plus its arguments.
    #[error("call with {arg_count} arguments but only {available} values in frame")]
    MissingOperands { arg_count: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            CallError::NotCallable(TypeTag::Null).to_string(),
            "null is not callable"
        );
        assert_eq!(
            CallError::ArityMismatch {
                function: "make".to_string(),
                expected: 0,
                got: 2
            }
            .to_string(),
            "make expects 0 arguments, got 2"
        );
        assert_eq!(
            CallError::CallDepthExceeded { limit: 8 }.to_string(),
            "call depth exceeded limit 8"
        );
        assert_eq!(
            CallError::MissingOperands {
                arg_count: 2,
                available: 1
            }
            .to_string(),
            "call with 2 arguments but only 1 values in frame"
        );
    }
}
