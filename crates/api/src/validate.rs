//! Argument validation for native functions.
//!
//! A native function checks its arguments before reading them. On a
//! mismatch the checker stores a diagnostic in the VM's error slot and
//! returns `false`; the function should then return without touching slot 0.

use tether_common::{ArgumentMismatch, TypeTag, ValueStack};

/// Name used in diagnostics when no native frame is active.
pub const HOST_CALLER: &str = "<host>";

/// Describes how the argument at `index` fails to be `expected`, or `None`
/// if it matches. Does not touch the error slot.
pub fn argument_mismatch<S>(stack: &S, index: isize, expected: TypeTag) -> Option<ArgumentMismatch>
where
    S: ValueStack + ?Sized,
{
    let actual = stack.type_of(index);
    if actual == expected {
        return None;
    }
    Some(ArgumentMismatch {
        function: stack.function_name().unwrap_or(HOST_CALLER).to_string(),
        expected,
        argument: index,
        actual,
    })
}

/// Checks that the value at `index` has tag `expected`.
///
/// On mismatch raises `"<fn> expects <type> for argument <n>, got <type>"`
/// and returns false.
pub fn check_argument<S>(stack: &mut S, index: isize, expected: TypeTag) -> bool
where
    S: ValueStack + ?Sized,
{
    match argument_mismatch(stack, index, expected) {
        None => true,
        Some(mismatch) => {
            stack.raise(mismatch.to_string());
            false
        }
    }
}

/// Checks arguments `1..=expected.len()` in order.
///
/// Stops at the first mismatch, so only that argument is reported.
pub fn check_arguments<S>(stack: &mut S, expected: &[TypeTag]) -> bool
where
    S: ValueStack + ?Sized,
{
    expected
        .iter()
        .zip(1isize..)
        .all(|(&tag, index)| check_argument(stack, index, tag))
}
