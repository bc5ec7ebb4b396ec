//! Tether reference VM: a value stack that speaks the Tether protocol.
//!
//! The machine is deliberately small. It has:
//! - A value stack addressed through frame-relative signed indices
//! - Call frames for native function invocation
//! - Module objects holding named variables
//! - A context-local error slot
//!
//! It has no compiler and no bytecode; everything it runs is native code
//! registered through [`tether_common::ValueStack`].
//!
//! # Usage
//!
//! ```
//! use tether_common::ValueStack;
//! use tether_vm::{Machine, Value};
//!
//! fn double(vm: &mut dyn ValueStack) {
//!     let n = vm.get_integer(1).unwrap_or(0);
//!     vm.push_integer(n * 2);
//!     vm.replace(0);
//! }
//!
//! let mut vm = Machine::new();
//! vm.push_module();
//! vm.push_function(double, "double", 1, 0);
//! vm.push_integer(21);
//! assert!(vm.call(1));
//! assert_eq!(vm.value(-1), Some(&Value::Integer(42)));
//! ```
//!
//! A machine is single-threaded: values share state through `Rc`, so it is
//! neither `Send` nor `Sync`.

pub mod error;
pub mod machine;
pub mod protocol;
pub mod value;

pub use error::CallError;
pub use machine::{CallFrame, Machine, MachineConfig, MAX_CALL_DEPTH, MAX_STACK_DEPTH};
pub use value::{Closure, Object, Value, MODULE_CLASS};
