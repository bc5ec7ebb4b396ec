//! The stack protocol as implemented by [`Machine`].

use std::rc::{Rc, Weak};

use log::trace;
use tether_common::{NativeFn, OpaqueData, TypeTag, ValueStack};

use crate::error::CallError;
use crate::machine::{CallFrame, Machine};
use crate::value::{Closure, Value};

impl Machine {
    /// Collapse the callable and its arguments into one slot and record
    /// `error` as the context's failure.
    fn fail_call(&mut self, callee_slot: usize, error: CallError) -> bool {
        trace!("call failed: {error}");
        self.stack.truncate(callee_slot + 1);
        self.error = Some(error.to_string());
        false
    }
}

impl ValueStack for Machine {
    fn push_null(&mut self) {
        self.push_value(Value::Null);
    }

    fn push_integer(&mut self, value: i64) {
        self.push_value(Value::Integer(value));
    }

    fn push_string(&mut self, bytes: &[u8]) {
        self.push_value(Value::String(bytes.to_vec()));
    }

    fn push_dict(&mut self) {
        self.push_value(Value::new_dict());
    }

    fn push_list(&mut self) {
        self.push_value(Value::new_list());
    }

    fn push_function(&mut self, entry: NativeFn, name: &str, arity: u8, module_index: isize) {
        let module = self
            .module(module_index)
            .map(|m| Rc::downgrade(&m))
            .unwrap_or_else(Weak::new);
        self.push_value(Value::Function(Rc::new(Closure::new(
            name, arity, entry, module,
        ))));
    }

    fn push_data(&mut self, data: OpaqueData) {
        self.push_value(Value::Data(data));
    }

    fn type_of(&self, index: isize) -> TypeTag {
        self.value(index)
            .map(Value::type_tag)
            .unwrap_or(TypeTag::Invalid)
    }

    fn get_integer(&self, index: isize) -> Option<i64> {
        match self.value(index)? {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn get_string(&self, index: isize) -> Option<&[u8]> {
        match self.value(index)? {
            Value::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    fn pop(&mut self) {
        debug_assert!(self.stack.len() > self.frame().base, "pop below frame base");
        if self.stack.len() > self.frame().base {
            self.stack.pop();
        }
    }

    fn replace(&mut self, index: isize) {
        let slot = self.slot(index);
        debug_assert!(slot.is_some(), "replace of unaddressable index {index}");
        if let (Some(slot), Some(top)) = (slot, self.stack.pop()) {
            // Replacing the top with itself leaves it popped.
            if slot < self.stack.len() {
                self.stack[slot] = top;
            }
        }
    }

    fn ensure_capacity(&mut self, additional: usize) -> bool {
        let wanted = self.stack.len().saturating_add(additional);
        if wanted > self.config.max_stack_depth {
            return false;
        }
        self.stack.reserve(additional);
        true
    }

    fn stack_size(&self) -> usize {
        self.stack.len() - self.frame().base
    }

    fn get_variable(&mut self, module_index: isize, name: &str) {
        let value = self.module_variable(module_index, name).unwrap_or(Value::Null);
        self.push_value(value);
    }

    fn set_variable(&mut self, module_index: isize, name: &str) {
        // Resolve the module before popping so negative indices still
        // count the value being bound.
        let module = self.module(module_index);
        debug_assert!(module.is_some(), "no module at index {module_index}");
        let value = self.stack.pop().unwrap_or(Value::Null);
        if let Some(module) = module {
            module.borrow_mut().set(name, value);
        }
    }

    fn call(&mut self, arg_count: usize) -> bool {
        let available = self.stack_size();
        let Some(callee_slot) = self
            .stack
            .len()
            .checked_sub(arg_count.saturating_add(1))
            .filter(|&slot| slot >= self.frame().base)
        else {
            self.error = Some(
                CallError::MissingOperands {
                    arg_count,
                    available,
                }
                .to_string(),
            );
            return false;
        };

        let closure = match &self.stack[callee_slot] {
            Value::Function(c) => Rc::clone(c),
            other => {
                let tag = other.type_tag();
                return self.fail_call(callee_slot, CallError::NotCallable(tag));
            }
        };

        if usize::from(closure.arity()) != arg_count {
            let error = CallError::ArityMismatch {
                function: closure.name().to_string(),
                expected: closure.arity(),
                got: arg_count,
            };
            return self.fail_call(callee_slot, error);
        }

        if self.frames.len() > self.config.max_call_depth {
            let limit = self.config.max_call_depth;
            return self.fail_call(callee_slot, CallError::CallDepthExceeded { limit });
        }

        trace!("calling {} with {arg_count} arguments", closure.name());
        let entry = closure.entry();
        self.frames.push(CallFrame {
            closure: Some(closure),
            base: callee_slot,
        });
        entry(self);
        self.frames.pop();

        self.stack.truncate(callee_slot + 1);
        self.error.is_none()
    }

    fn function_name(&self) -> Option<&str> {
        self.frame().closure.as_deref().map(Closure::name)
    }

    fn raise(&mut self, message: String) {
        self.error = Some(message);
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineConfig;

    fn answer(vm: &mut dyn ValueStack) {
        vm.push_integer(42);
        vm.replace(0);
    }

    fn sum(vm: &mut dyn ValueStack) {
        let a = vm.get_integer(1).unwrap_or(0);
        let b = vm.get_integer(2).unwrap_or(0);
        vm.push_integer(a + b);
        vm.replace(0);
    }

    fn fails(vm: &mut dyn ValueStack) {
        vm.raise("boom".to_string());
    }

    fn recurse(vm: &mut dyn ValueStack) {
        vm.push_function(recurse, "recurse", 0, 0);
        vm.call(0);
    }

    fn whoami(vm: &mut dyn ValueStack) {
        let name = vm.function_name().unwrap_or("?").to_string();
        vm.push_string(name.as_bytes());
        vm.replace(0);
    }

    #[test]
    fn pushes_report_tags() {
        let mut vm = Machine::new();
        vm.push_null();
        vm.push_integer(1);
        vm.push_string(b"s");
        vm.push_dict();
        vm.push_list();
        vm.push_function(answer, "answer", 0, 0);
        vm.push_module();
        vm.push_data(OpaqueData::null());
        let tags: Vec<TypeTag> = (0..8).map(|i| vm.type_of(i)).collect();
        assert_eq!(
            tags,
            [
                TypeTag::Null,
                TypeTag::Integer,
                TypeTag::String,
                TypeTag::Dict,
                TypeTag::List,
                TypeTag::Function,
                TypeTag::Object,
                TypeTag::Data,
            ]
        );
        assert_eq!(vm.type_of(8), TypeTag::Invalid);
        assert_eq!(vm.type_of(-9), TypeTag::Invalid);
    }

    #[test]
    fn push_string_copies_buffer() {
        let mut vm = Machine::new();
        let mut buf = b"hi".to_vec();
        vm.push_string(&buf);
        buf[0] = b'X';
        buf.clear();
        assert_eq!(vm.get_string(-1), Some(&b"hi"[..]));
    }

    #[test]
    fn replace_moves_top_into_slot() {
        let mut vm = Machine::new();
        vm.push_integer(1);
        vm.push_integer(2);
        vm.push_integer(3);
        vm.replace(0);
        assert_eq!(vm.stack_size(), 2);
        assert_eq!(vm.get_integer(0), Some(3));
        assert_eq!(vm.get_integer(1), Some(2));
    }

    #[test]
    fn ensure_capacity_respects_limit() {
        let mut vm = Machine::with_config(MachineConfig {
            max_stack_depth: 2,
            ..MachineConfig::default()
        });
        assert!(vm.ensure_capacity(2));
        vm.push_null();
        assert!(vm.ensure_capacity(1));
        assert!(!vm.ensure_capacity(2));
        assert!(!vm.ensure_capacity(usize::MAX));
    }

    #[test]
    fn variables_roundtrip_through_module() {
        let mut vm = Machine::new();
        vm.push_module();
        vm.push_integer(5);
        vm.set_variable(-2, "five");
        assert_eq!(vm.stack_size(), 1);
        vm.get_variable(0, "five");
        assert_eq!(vm.get_integer(-1), Some(5));
        vm.get_variable(0, "absent");
        assert_eq!(vm.type_of(-1), TypeTag::Null);
    }

    #[test]
    fn call_leaves_result_in_callee_slot() {
        let mut vm = Machine::new();
        vm.push_module();
        vm.push_function(sum, "sum", 2, 0);
        vm.push_integer(3);
        vm.push_integer(4);
        assert!(vm.call(2));
        assert_eq!(vm.stack_size(), 2);
        assert_eq!(vm.get_integer(-1), Some(7));
        assert_eq!(vm.depth(), 1);
    }

    #[test]
    fn call_failure_leaves_one_slot_and_error() {
        let mut vm = Machine::new();
        vm.push_function(fails, "fails", 0, 0);
        assert!(!vm.call(0));
        assert_eq!(vm.stack_size(), 1);
        assert_eq!(vm.error(), Some("boom"));
        assert_eq!(vm.take_error(), Some("boom".to_string()));
        assert_eq!(vm.error(), None);
    }

    #[test]
    fn call_non_function() {
        let mut vm = Machine::new();
        vm.push_null();
        vm.push_integer(1);
        assert!(!vm.call(1));
        assert_eq!(vm.stack_size(), 1);
        assert_eq!(vm.error(), Some("null is not callable"));
    }

    #[test]
    fn call_arity_mismatch() {
        let mut vm = Machine::new();
        vm.push_function(answer, "answer", 0, 0);
        vm.push_integer(1);
        assert!(!vm.call(1));
        assert_eq!(vm.error(), Some("answer expects 0 arguments, got 1"));
    }

    #[test]
    fn call_without_operands() {
        let mut vm = Machine::new();
        assert!(!vm.call(0));
        assert_eq!(
            vm.error(),
            Some("call with 0 arguments but only 0 values in frame")
        );
    }

    #[test]
    fn call_with_huge_arg_count() {
        let mut vm = Machine::new();
        vm.push_function(answer, "answer", 0, 0);
        assert!(!vm.call(usize::MAX));
        assert_eq!(
            vm.error(),
            Some(format!("call with {} arguments but only 1 values in frame", usize::MAX).as_str())
        );
        assert_eq!(vm.stack_size(), 1);
    }

    #[test]
    fn call_depth_is_bounded() {
        let mut vm = Machine::with_config(MachineConfig {
            max_call_depth: 4,
            ..MachineConfig::default()
        });
        vm.push_function(recurse, "recurse", 0, 0);
        assert!(!vm.call(0));
        assert_eq!(vm.error(), Some("call depth exceeded limit 4"));
        assert_eq!(vm.depth(), 1);
        assert_eq!(vm.stack_size(), 1);
    }

    #[test]
    fn function_name_comes_from_top_frame() {
        let mut vm = Machine::new();
        assert_eq!(vm.function_name(), None);
        vm.push_function(whoami, "whoami", 0, 0);
        assert!(vm.call(0));
        assert_eq!(vm.get_string(-1), Some(&b"whoami"[..]));
    }

    #[test]
    fn native_frame_addresses_arguments_from_one() {
        fn first_arg_tag(vm: &mut dyn ValueStack) {
            let tag = vm.type_of(1) as i64;
            let size = vm.stack_size() as i64;
            vm.push_integer(tag * 100 + size);
            vm.replace(0);
        }
        let mut vm = Machine::new();
        vm.push_integer(99);
        vm.push_function(first_arg_tag, "first_arg_tag", 1, 0);
        vm.push_string(b"x");
        assert!(vm.call(1));
        // String tag (3) and a frame of callee + one argument.
        assert_eq!(vm.get_integer(-1), Some(302));
        assert_eq!(vm.get_integer(0), Some(99));
    }
}
