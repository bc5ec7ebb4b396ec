//! Tether common types for the native/VM boundary.
//!
//! This crate holds the vocabulary every other Tether crate speaks:
//!
//! - [`TypeTag`]: the closed set of value kinds, with diagnostic names
//! - [`ValueStack`]: the stack protocol a VM exposes to native code
//! - [`NativeFn`] and [`OpaqueData`]: what native code hands to the VM
//! - [`addressing`]: the signed stack-index policy
//! - [`ArgumentMismatch`] and [`TagError`]: shared error types
//!
//! It knows nothing about any particular VM; `tether-vm` is one
//! implementation of [`ValueStack`].

pub mod addressing;
pub mod error;
pub mod stack;
pub mod type_tag;

// Re-export commonly used types at the crate root.
pub use error::{ArgumentMismatch, TagError};
pub use stack::{NativeFn, OpaqueData, ValueStack};
pub use type_tag::{TypeTag, ALL_TYPE_TAGS, TYPE_NAMES, TYPE_TAG_COUNT};
