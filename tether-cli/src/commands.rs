//! CLI command implementations.

use std::path::Path;

use tether_api::{ConstructorFailurePolicy, Extension, ExtensionError};
use tether_loader::{LibraryLoader, PlatformLoader};
use tether_vm::Machine;

/// Print the shared library suffix for this platform.
pub fn suffix(args: &[String]) -> Result<(), i32> {
    if !args.is_empty() {
        eprintln!("error: suffix takes no arguments");
        eprintln!("Usage: tether suffix");
        return Err(1);
    }
    println!("{}", PlatformLoader::SUFFIX);
    Ok(())
}

/// Load a library and report which of the given symbols it exports.
pub fn probe(args: &[String]) -> Result<(), i32> {
    let Some(library) = args.first() else {
        eprintln!("error: probe requires a library path");
        eprintln!("Usage: tether probe <library> [symbol...]");
        return Err(1);
    };

    let loader = PlatformLoader::default();
    let handle = loader.load(Path::new(library)).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let mut missing = 0usize;
    for symbol in &args[1..] {
        match loader.symbol(&handle, symbol) {
            Some(address) => println!("{symbol}: found at {:p}", address.as_ptr()),
            None => {
                println!("{symbol}: missing");
                missing += 1;
            }
        }
    }
    loader.unload(Some(handle));

    if missing > 0 {
        eprintln!("error: {missing} of {} symbols missing from '{library}'", args.len() - 1);
        return Err(2);
    }
    println!("OK: {library}");
    Ok(())
}

/// Open an extension, declare its variables into a fresh module, and list
/// them.
pub fn inspect(args: &[String]) -> Result<(), i32> {
    let Some(library) = args.first() else {
        eprintln!("error: inspect requires a library path");
        eprintln!("Usage: tether inspect <library> [--strict]");
        return Err(1);
    };

    let mut policy = ConstructorFailurePolicy::default();
    for flag in &args[1..] {
        match flag.as_str() {
            "--strict" => policy = ConstructorFailurePolicy::Propagate,
            other => {
                eprintln!("error: unknown option '{other}'");
                eprintln!("Usage: tether inspect <library> [--strict]");
                return Err(1);
            }
        }
    }

    let extension = Extension::open(PlatformLoader::default(), Path::new(library)).map_err(|e| {
        eprintln!("error: {e}");
        match e {
            ExtensionError::Load(_) => 1,
            ExtensionError::MissingTable { .. } => 2,
        }
    })?;

    // Declared after the extension so it is dropped first: its values may
    // point into the library.
    let mut vm = Machine::new();
    vm.push_module();
    let count = extension.declare(&mut vm, 0, policy).map_err(|e| {
        eprintln!("error: {e}");
        3
    })?;

    for line in describe(&vm, 0) {
        println!("{line}");
    }
    eprintln!("declared {count} variables from {library}");
    Ok(())
}

/// One `name: type = value` line per variable of the module at
/// `module_index`.
fn describe(vm: &Machine, module_index: isize) -> Vec<String> {
    vm.module_variables(module_index)
        .into_iter()
        .map(|(name, value)| format!("{name}: {} = {value}", value.type_tag()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_api::{declare_variables, return_integer, VariableDescriptor};
    use tether_common::ValueStack;
    use tether_vm::Value;

    fn make_origin(vm: &mut dyn ValueStack) {
        return_integer(vm, 0);
    }

    #[test]
    fn describe_lists_in_declaration_order() {
        let mut vm = Machine::new();
        vm.push_module();
        declare_variables(
            &mut vm,
            0,
            &[
                VariableDescriptor::integer("Dimensions", 2),
                VariableDescriptor::string("Name", b"geometry"),
                VariableDescriptor::null("Nothing"),
                VariableDescriptor::list("Shapes"),
            ],
        )
        .unwrap();
        assert_eq!(
            describe(&vm, 0),
            [
                "Dimensions: integer = 2",
                "Name: string = \"geometry\"",
                "Nothing: null = null",
                "Shapes: list = [0 elements]",
            ]
        );
    }

    #[test]
    fn describe_shows_functions_and_constructed_objects() {
        let mut vm = Machine::new();
        vm.push_module();
        declare_variables(
            &mut vm,
            0,
            &[
                VariableDescriptor::function("Point", make_origin, 0),
                VariableDescriptor::object("Origin", "Point"),
            ],
        )
        .unwrap();
        assert_eq!(vm.module_variable(0, "Origin"), Some(Value::Integer(0)));
        assert_eq!(
            describe(&vm, 0),
            ["Point: function = <function Point/0>", "Origin: integer = 0"]
        );
    }

    #[test]
    fn describe_empty_module() {
        let mut vm = Machine::new();
        vm.push_module();
        assert!(describe(&vm, 0).is_empty());
    }
}
