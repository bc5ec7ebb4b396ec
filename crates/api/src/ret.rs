//! Returning values from native functions.
//!
//! Slot 0 of a native frame is the result slot. Each helper pushes a value
//! and moves it into slot 0; dropping the argument slots is left to the VM.

use tether_common::ValueStack;

/// Moves the current top value into the result slot.
pub fn return_top<S: ValueStack + ?Sized>(stack: &mut S) {
    stack.replace(0);
}

/// Returns null.
pub fn return_null<S: ValueStack + ?Sized>(stack: &mut S) {
    stack.push_null();
    return_top(stack);
}

/// Returns an integer.
pub fn return_integer<S: ValueStack + ?Sized>(stack: &mut S, value: i64) {
    stack.push_integer(value);
    return_top(stack);
}

/// Returns a copy of `bytes` as a string. An empty slice returns the empty
/// string, not null.
pub fn return_string<S: ValueStack + ?Sized>(stack: &mut S, bytes: &[u8]) {
    stack.push_string(bytes);
    return_top(stack);
}
