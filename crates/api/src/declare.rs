//! Declarative bindings: turn a table of descriptors into module variables.
//!
//! A native module describes everything it exports in one slice of
//! [`VariableDescriptor`]s and hands it to [`declare_variables`] once, at
//! module initialization.
//!
//! ```
//! use tether_api::{declare_variables, VariableDescriptor};
//! use tether_common::ValueStack;
//! use tether_vm::{Machine, Value};
//!
//! fn origin(vm: &mut dyn ValueStack) {
//!     tether_api::return_integer(vm, 0);
//! }
//!
//! static GEOMETRY: &[VariableDescriptor<'static>] = &[
//!     VariableDescriptor::integer("DIMENSIONS", 2),
//!     VariableDescriptor::function("origin", origin, 0),
//!     VariableDescriptor::object("ORIGIN", "origin"),
//! ];
//!
//! let mut vm = Machine::new();
//! vm.push_module();
//! declare_variables(&mut vm, -1, GEOMETRY).unwrap();
//! assert_eq!(vm.module_variable(0, "ORIGIN"), Some(Value::Integer(0)));
//! ```

use std::fmt;

use log::{debug, warn};
use tether_common::{addressing, NativeFn, OpaqueData, TypeTag, ValueStack};

use crate::error::DeclareError;

/// The value a descriptor binds, with exactly the payload its tag needs.
#[derive(Clone, Copy)]
pub enum Binding<'a> {
    /// Null.
    Null,
    /// An integer.
    Integer(i64),
    /// A string, copied into the VM.
    String(&'a [u8]),
    /// A fresh empty dictionary.
    Dict,
    /// A fresh empty list.
    List,
    /// A native function with its declared arity.
    Function { entry: NativeFn, arity: u8 },
    /// The result of calling the module variable `constructor` with no
    /// arguments.
    Object { constructor: &'a str },
    /// An opaque pointer with no finalizer.
    Data(OpaqueData),
}

impl Binding<'_> {
    /// Tag of the value this binding produces when it succeeds.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Binding::Null => TypeTag::Null,
            Binding::Integer(_) => TypeTag::Integer,
            Binding::String(_) => TypeTag::String,
            Binding::Dict => TypeTag::Dict,
            Binding::List => TypeTag::List,
            Binding::Function { .. } => TypeTag::Function,
            Binding::Object { .. } => TypeTag::Object,
            Binding::Data(_) => TypeTag::Data,
        }
    }
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Null => f.write_str("Null"),
            Binding::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Binding::String(s) => f
                .debug_tuple("String")
                .field(&String::from_utf8_lossy(s))
                .finish(),
            Binding::Dict => f.write_str("Dict"),
            Binding::List => f.write_str("List"),
            Binding::Function { entry, arity } => f
                .debug_struct("Function")
                .field("entry", &(*entry as *const ()))
                .field("arity", arity)
                .finish(),
            Binding::Object { constructor } => f
                .debug_struct("Object")
                .field("constructor", constructor)
                .finish(),
            Binding::Data(d) => f.debug_tuple("Data").field(&d.as_ptr()).finish(),
        }
    }
}

/// One variable to create in a module.
///
/// The name must not be empty. Raw extension tables use an empty name as
/// their terminator, so an empty name is a malformed descriptor here too.
#[derive(Debug, Clone, Copy)]
pub struct VariableDescriptor<'a> {
    /// Variable name inside the module.
    pub name: &'a str,
    /// What to bind.
    pub binding: Binding<'a>,
}

impl<'a> VariableDescriptor<'a> {
    /// Null.
    pub const fn null(name: &'a str) -> Self {
        Self {
            name,
            binding: Binding::Null,
        }
    }

    /// An integer.
    pub const fn integer(name: &'a str, value: i64) -> Self {
        Self {
            name,
            binding: Binding::Integer(value),
        }
    }

    /// A string; the bytes are copied when declared.
    pub const fn string(name: &'a str, value: &'a [u8]) -> Self {
        Self {
            name,
            binding: Binding::String(value),
        }
    }

    /// A fresh empty dictionary.
    pub const fn dict(name: &'a str) -> Self {
        Self {
            name,
            binding: Binding::Dict,
        }
    }

    /// A fresh empty list.
    pub const fn list(name: &'a str) -> Self {
        Self {
            name,
            binding: Binding::List,
        }
    }

    /// A native function visible as `name`.
    pub const fn function(name: &'a str, entry: NativeFn, arity: u8) -> Self {
        Self {
            name,
            binding: Binding::Function { entry, arity },
        }
    }

    /// An object built by calling the module variable `constructor`, which
    /// is usually a function declared earlier in the same table.
    pub const fn object(name: &'a str, constructor: &'a str) -> Self {
        Self {
            name,
            binding: Binding::Object { constructor },
        }
    }

    /// An opaque pointer, bound without a finalizer.
    pub const fn data(name: &'a str, data: OpaqueData) -> Self {
        Self {
            name,
            binding: Binding::Data(data),
        }
    }
}

/// What to do when an object constructor fails during declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructorFailurePolicy {
    /// Discard the error and bind null. Initialization keeps going.
    #[default]
    SubstituteNull,
    /// Stop and return the constructor's error.
    Propagate,
}

/// Declares `descriptors` as variables of the module at `module_index`,
/// binding null for any constructor that fails.
///
/// See [`declare_variables_with`].
pub fn declare_variables<S>(
    stack: &mut S,
    module_index: isize,
    descriptors: &[VariableDescriptor<'_>],
) -> Result<(), DeclareError>
where
    S: ValueStack + ?Sized,
{
    declare_variables_with(
        stack,
        module_index,
        descriptors,
        ConstructorFailurePolicy::default(),
    )
}

/// Declares `descriptors`, in order, as variables of the module at
/// `module_index`.
///
/// A negative `module_index` is resolved against the stack size before the
/// first push, so `-1` keeps meaning the module even as values come and go.
/// The stack is balanced on return, whether or not it succeeds. An error
/// leaves the variables declared before the failing one in place.
///
/// An error already pending in the context is set aside while constructors
/// run and restored before returning.
///
/// # Panics
///
/// Panics if a descriptor has an empty name.
pub fn declare_variables_with<S>(
    stack: &mut S,
    module_index: isize,
    descriptors: &[VariableDescriptor<'_>],
    policy: ConstructorFailurePolicy,
) -> Result<(), DeclareError>
where
    S: ValueStack + ?Sized,
{
    let size = stack.stack_size();
    let module = addressing::to_frame_relative(module_index, size)
        .filter(|&index| (index as usize) < size)
        .ok_or(DeclareError::InvalidModuleIndex {
            index: module_index,
        })?;
    let actual = stack.type_of(module);
    if actual != TypeTag::Object {
        return Err(DeclareError::NotAModule {
            index: module_index,
            actual,
        });
    }

    let pending = stack.take_error();
    let result = declare_each(stack, module, descriptors, policy);
    if let Some(message) = pending {
        stack.raise(message);
    }
    result
}

fn declare_each<S>(
    stack: &mut S,
    module: isize,
    descriptors: &[VariableDescriptor<'_>],
    policy: ConstructorFailurePolicy,
) -> Result<(), DeclareError>
where
    S: ValueStack + ?Sized,
{
    for descriptor in descriptors {
        let name = descriptor.name;
        assert!(!name.is_empty(), "malformed variable descriptor: empty name");
        if !stack.ensure_capacity(1) {
            return Err(DeclareError::CapacityExhausted {
                name: name.to_string(),
            });
        }

        match descriptor.binding {
            Binding::Null => stack.push_null(),
            Binding::Integer(value) => stack.push_integer(value),
            Binding::String(bytes) => stack.push_string(bytes),
            Binding::Dict => stack.push_dict(),
            Binding::List => stack.push_list(),
            Binding::Function { entry, arity } => stack.push_function(entry, name, arity, module),
            Binding::Object { constructor } => {
                construct(stack, module, name, constructor, policy)?;
            }
            Binding::Data(data) => stack.push_data(data),
        }

        stack.set_variable(module, name);
        debug!("declared {name} ({})", descriptor.binding.type_tag());
    }

    Ok(())
}

/// Leaves the constructed object (or null) on top of the stack.
fn construct<S>(
    stack: &mut S,
    module: isize,
    name: &str,
    constructor: &str,
    policy: ConstructorFailurePolicy,
) -> Result<(), DeclareError>
where
    S: ValueStack + ?Sized,
{
    stack.get_variable(module, constructor);
    if stack.call(0) {
        return Ok(());
    }

    stack.pop();
    let message = stack.take_error().unwrap_or_default();
    match policy {
        ConstructorFailurePolicy::SubstituteNull => {
            warn!("constructor {constructor} for {name} failed, binding null: {message}");
            stack.push_null();
            Ok(())
        }
        ConstructorFailurePolicy::Propagate => Err(DeclareError::ConstructorFailed {
            name: name.to_string(),
            constructor: constructor.to_string(),
            message,
        }),
    }
}
