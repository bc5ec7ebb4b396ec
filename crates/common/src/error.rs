//! Errors shared across the interop crates.

use crate::type_tag::TypeTag;
use thiserror::Error;

/// A raw type tag that does not name any [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Tag value is not below the tag count.
    #[error("type tag {0} out of range")]
    OutOfRange(u32),
}

/// A native function argument whose type tag did not match.
///
/// The `Display` form is the diagnostic text stored in the VM's error slot.
/// Embedders parse it, so the wording is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{function} expects {expected} for argument {argument}, got {actual}")]
pub struct ArgumentMismatch {
    /// Name of the native function being called.
    pub function: String,
    /// Tag the function asked for.
    pub expected: TypeTag,
    /// 1-based argument position.
    pub argument: isize,
    /// Tag actually found on the stack.
    pub actual: TypeTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_range() {
        assert_eq!(TagError::OutOfRange(12).to_string(), "type tag 12 out of range");
    }

    #[test]
    fn display_argument_mismatch() {
        let e = ArgumentMismatch {
            function: "open".to_string(),
            expected: TypeTag::String,
            argument: 2,
            actual: TypeTag::Integer,
        };
        assert_eq!(
            e.to_string(),
            "open expects string for argument 2, got integer"
        );
    }

    #[test]
    fn display_argument_mismatch_invalid_slot() {
        let e = ArgumentMismatch {
            function: "len".to_string(),
            expected: TypeTag::List,
            argument: 1,
            actual: TypeTag::Invalid,
        };
        assert_eq!(e.to_string(), "len expects list for argument 1, got INVALID");
    }
}
