//! Runtime value representation for the reference VM.
//!
//! Values are what live on the stack and in module variables.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tether_common::{NativeFn, OpaqueData, TypeTag};

/// Runtime value.
///
/// Containers and objects are shared by reference; strings are owned byte
/// buffers so embedded NUL bytes survive.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null value.
    Null,
    /// Signed 64-bit integer.
    Integer(i64),
    /// Byte string.
    String(Vec<u8>),
    /// Dictionary as ordered key/value pairs.
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    /// List.
    List(Rc<RefCell<Vec<Value>>>),
    /// Native function object.
    Function(Rc<Closure>),
    /// Object instance. Modules are objects of class [`MODULE_CLASS`].
    Object(Rc<RefCell<Object>>),
    /// Opaque native pointer.
    Data(OpaqueData),
}

/// Class name given to module objects.
pub const MODULE_CLASS: &str = "Module";

// Strings and containers compare by content. Functions and objects compare
// by identity: two distinct modules with equal fields are different modules.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Data(a), Value::Data(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Integer(_) => TypeTag::Integer,
            Value::String(_) => TypeTag::String,
            Value::Dict(_) => TypeTag::Dict,
            Value::List(_) => TypeTag::List,
            Value::Function(_) => TypeTag::Function,
            Value::Object(_) => TypeTag::Object,
            Value::Data(_) => TypeTag::Data,
        }
    }

    /// Builds a string value from anything byte-like.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Value::String(bytes.into())
    }

    /// A fresh empty dictionary.
    pub fn new_dict() -> Self {
        Value::Dict(Rc::new(RefCell::new(Vec::new())))
    }

    /// A fresh empty list.
    pub fn new_list() -> Self {
        Value::List(Rc::new(RefCell::new(Vec::new())))
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::String(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Dict(d) => write!(f, "{{{} entries}}", d.borrow().len()),
            Value::List(l) => write!(f, "[{} elements]", l.borrow().len()),
            Value::Function(c) => write!(f, "<function {}/{}>", c.name(), c.arity()),
            Value::Object(o) => write!(f, "<{} object>", o.borrow().class()),
            Value::Data(d) => write!(f, "<data {:p}>", d.as_ptr()),
        }
    }
}

/// An object: a class name plus named fields in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: String,
    fields: Vec<(String, Value)>,
}

impl Object {
    /// Creates an object with no fields.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    /// Class name.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns true if this object is a module.
    pub fn is_module(&self) -> bool {
        self.class == MODULE_CLASS
    }

    /// Looks up a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Sets a field, replacing any previous value but keeping its position.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// All fields in the order they were first set.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// A native function bound into a module.
pub struct Closure {
    name: String,
    arity: u8,
    entry: NativeFn,
    module: Weak<RefCell<Object>>,
}

impl Closure {
    /// Creates a closure owned by `module`.
    pub fn new(name: &str, arity: u8, entry: NativeFn, module: Weak<RefCell<Object>>) -> Self {
        Self {
            name: name.to_string(),
            arity,
            entry,
            module,
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared argument count.
    pub fn arity(&self) -> u8 {
        self.arity
    }

    /// Native entry point.
    pub fn entry(&self) -> NativeFn {
        self.entry
    }

    /// The owning module, if it is still alive.
    pub fn module(&self) -> Option<Rc<RefCell<Object>>> {
        self.module.upgrade()
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("entry", &(self.entry as *const ()))
            .finish_non_exhaustive()
    }
}
