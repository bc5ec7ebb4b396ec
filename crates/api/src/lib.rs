//! Tether API: the helpers native code uses to talk to a VM.
//!
//! Everything here works through [`tether_common::ValueStack`], so it runs
//! against any VM that implements the protocol.
//!
//! - [`validate`]: check argument types, raising formatted diagnostics
//! - [`declare`]: turn descriptor tables into module variables
//! - [`ret`]: hand a result back through slot 0
//! - [`raw`]: the C-layout descriptor table used by extension libraries
//! - [`extension`]: load an extension library and declare its table
//!
//! # Writing a native function
//!
//! ```
//! use tether_api::{check_arguments, return_integer};
//! use tether_common::{TypeTag, ValueStack};
//!
//! fn add(vm: &mut dyn ValueStack) {
//!     if !check_arguments(vm, &[TypeTag::Integer, TypeTag::Integer]) {
//!         return;
//!     }
//!     let a = vm.get_integer(1).unwrap_or(0);
//!     let b = vm.get_integer(2).unwrap_or(0);
//!     return_integer(vm, a.wrapping_add(b));
//! }
//! # let _ = add;
//! ```

pub mod declare;
pub mod error;
pub mod extension;
pub mod raw;
pub mod ret;
pub mod validate;

pub use declare::{
    declare_variables, declare_variables_with, Binding, ConstructorFailurePolicy,
    VariableDescriptor,
};
pub use error::{DeclareError, ExtensionError};
pub use extension::{Extension, MODULE_TABLE_SYMBOL};
pub use raw::RawVariableDescriptor;
pub use ret::{return_integer, return_null, return_string, return_top};
pub use validate::{argument_mismatch, check_argument, check_arguments, HOST_CALLER};
