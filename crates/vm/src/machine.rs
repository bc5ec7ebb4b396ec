//! VM state management: stack, call frames, error slot, limits.

use std::cell::RefCell;
use std::rc::Rc;

use tether_common::addressing;

use crate::value::{Closure, Object, Value, MODULE_CLASS};

/// Default maximum stack depth.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Default maximum number of nested native calls.
pub const MAX_CALL_DEPTH: usize = 256;

/// Limits applied by a [`Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Largest number of stack entries `ensure_capacity` will grant.
    pub max_stack_depth: usize,
    /// Largest number of nested native calls.
    pub max_call_depth: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: MAX_STACK_DEPTH,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}

/// A call frame for native function invocation.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// The function being run. `None` for the host's root frame.
    pub closure: Option<Rc<Closure>>,
    /// Absolute stack slot of the frame's slot 0.
    pub base: usize,
}

/// The reference virtual machine.
///
/// Holds one execution context: a value stack, the frames of in-progress
/// native calls, and the context-local error slot. A root frame based at
/// slot 0 is always present, so host code addresses the stack the same way
/// native functions do.
#[derive(Debug)]
pub struct Machine {
    pub(crate) config: MachineConfig,
    /// Value stack.
    pub(crate) stack: Vec<Value>,
    /// Call frames; index 0 is the root frame.
    pub(crate) frames: Vec<CallFrame>,
    /// Pending error of the active context.
    pub(crate) error: Option<String>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Create a machine with default limits.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create a machine with the given limits.
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            frames: vec![CallFrame {
                closure: None,
                base: 0,
            }],
            error: None,
        }
    }

    /// The limits this machine enforces.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The innermost call frame.
    pub fn frame(&self) -> &CallFrame {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    /// Number of active frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Total entries on the stack across all frames.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if the stack holds no values.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Push an arbitrary value.
    pub fn push_value(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Push a new, empty module object.
    pub fn push_module(&mut self) {
        self.push_value(Value::Object(Rc::new(RefCell::new(Object::new(
            MODULE_CLASS,
        )))));
    }

    /// The value at a frame-relative index.
    pub fn value(&self, index: isize) -> Option<&Value> {
        self.slot(index).map(|slot| &self.stack[slot])
    }

    /// The module object at `module_index`, if that slot holds one.
    pub fn module(&self, module_index: isize) -> Option<Rc<RefCell<Object>>> {
        match self.value(module_index)? {
            Value::Object(o) if o.borrow().is_module() => Some(Rc::clone(o)),
            _ => None,
        }
    }

    /// A copy of variable `name` of the module at `module_index`.
    pub fn module_variable(&self, module_index: isize, name: &str) -> Option<Value> {
        let module = self.module(module_index)?;
        let value = module.borrow().get(name).cloned();
        value
    }

    /// All variables of the module at `module_index`, in binding order.
    pub fn module_variables(&self, module_index: isize) -> Vec<(String, Value)> {
        self.module(module_index)
            .map(|m| m.borrow().fields().to_vec())
            .unwrap_or_default()
    }

    /// Resolve a frame-relative index to an absolute stack slot.
    pub(crate) fn slot(&self, index: isize) -> Option<usize> {
        addressing::resolve(index, self.frame().base, self.stack.len())
    }
}
