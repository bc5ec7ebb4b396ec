//! Stack addressing policy.
//!
//! Every stack index crossing the boundary is a signed `isize` relative to
//! the current call frame:
//!
//! - `0` is the frame's result/receiver slot,
//! - positive indices count upward from it (`1` is the first argument),
//! - negative indices count down from the top of the stack (`-1` is the top).
//!
//! Both helpers below are the only place this arithmetic lives. VMs use
//! [`resolve`] to map an index to an absolute slot; callers that must pin an
//! index before pushing more values use [`to_frame_relative`].

/// Rewrites a possibly-negative index as a non-negative frame-relative one.
///
/// `stack_size` is the number of entries in the current frame at the moment
/// of the call. Non-negative indices are returned unchanged. Returns `None`
/// if a negative index reaches below the frame base.
pub fn to_frame_relative(index: isize, stack_size: usize) -> Option<isize> {
    if index >= 0 {
        return Some(index);
    }
    let relative = stack_size as isize + index;
    (relative >= 0).then_some(relative)
}

/// Resolves a frame-relative index to an absolute slot in a stack of
/// `stack_len` entries whose current frame starts at `frame_base`.
///
/// Returns `None` if the index does not address a live slot of the frame.
pub fn resolve(index: isize, frame_base: usize, stack_len: usize) -> Option<usize> {
    let size = stack_len.checked_sub(frame_base)?;
    let relative = to_frame_relative(index, size)? as usize;
    (relative < size).then_some(frame_base + relative)
}
