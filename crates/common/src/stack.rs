//! The value exchange protocol a VM exposes to native code.
//!
//! Native code never owns stack entries. It pushes values, inspects tags,
//! and moves the top of the stack into other slots through [`ValueStack`].
//! Indices follow the policy in [`crate::addressing`].

use std::ffi::c_void;

use crate::type_tag::TypeTag;

/// Entry point of a native function.
///
/// Arguments sit at stack indices `1..=arity`; the function reports its
/// result by replacing slot 0 and its failure by raising an error.
pub type NativeFn = fn(&mut dyn ValueStack);

/// A native pointer carried through the VM without interpretation.
///
/// The VM never dereferences or frees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpaqueData(*mut c_void);

// SAFETY: OpaqueData is an address that this layer never dereferences.
// Whoever created the pointer keeps the obligations for what it points to.
unsafe impl Send for OpaqueData {}
unsafe impl Sync for OpaqueData {}

impl OpaqueData {
    /// Wraps a raw pointer.
    pub const fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// A data value holding the null pointer.
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// Returns the wrapped pointer.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    /// Returns true if the wrapped pointer is null.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Stack operations a VM provides to the interop layer.
///
/// All operations act on the active call context. Implementations are
/// single-threaded and non-reentrant per VM instance.
pub trait ValueStack {
    /// Pushes null.
    fn push_null(&mut self);

    /// Pushes an integer.
    fn push_integer(&mut self, value: i64);

    /// Pushes a copy of `bytes` as a string. The caller's buffer may be
    /// reused as soon as this returns.
    fn push_string(&mut self, bytes: &[u8]);

    /// Pushes a new empty dictionary.
    fn push_dict(&mut self);

    /// Pushes a new empty list.
    fn push_list(&mut self);

    /// Pushes a function object wrapping a native entry point, owned by the
    /// module at `module_index`.
    fn push_function(&mut self, entry: NativeFn, name: &str, arity: u8, module_index: isize);

    /// Pushes an opaque data value with no finalizer.
    fn push_data(&mut self, data: OpaqueData);

    /// Returns the tag of the value at `index`, or [`TypeTag::Invalid`] if
    /// the index addresses nothing.
    fn type_of(&self, index: isize) -> TypeTag;

    /// Returns the integer at `index`, if that slot holds one.
    fn get_integer(&self, index: isize) -> Option<i64>;

    /// Returns the bytes of the string at `index`, if that slot holds one.
    fn get_string(&self, index: isize) -> Option<&[u8]>;

    /// Removes the top value.
    fn pop(&mut self);

    /// Overwrites the slot at `index` with the top value, then pops the top.
    fn replace(&mut self, index: isize);

    /// Reserves room for `additional` more entries. Returns false if the VM
    /// refuses to grow.
    fn ensure_capacity(&mut self, additional: usize) -> bool;

    /// Number of entries in the current frame, slot 0 included.
    fn stack_size(&self) -> usize;

    /// Pushes the variable `name` of the module at `module_index`, or null
    /// if the module has no such variable.
    fn get_variable(&mut self, module_index: isize, name: &str);

    /// Pops the top value and binds it as variable `name` of the module at
    /// `module_index`.
    fn set_variable(&mut self, module_index: isize, name: &str);

    /// Calls the value sitting below the top `arg_count` entries.
    ///
    /// Afterwards exactly one slot replaces the callable and its arguments.
    /// On success it holds the result. On failure this returns false and
    /// the error slot describes why.
    fn call(&mut self, arg_count: usize) -> bool;

    /// Name of the function in the innermost call frame, if any.
    fn function_name(&self) -> Option<&str>;

    /// Stores `message` in the context's error slot.
    fn raise(&mut self, message: String);

    /// The pending error message, if any.
    fn error(&self) -> Option<&str>;

    /// Clears and returns the pending error message.
    fn take_error(&mut self) -> Option<String>;
}
