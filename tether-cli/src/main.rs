//! Tether CLI: probe shared libraries and inspect extension modules.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage or load error
//! - 2: Missing symbol or variable table
//! - 3: Declaration failure

mod commands;
mod logger;

use std::process;

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let before = args.len();
    args.retain(|a| a != "-v" && a != "--verbose");
    logger::init(args.len() != before);

    if args.is_empty() {
        print_usage();
        process::exit(1);
    }

    let result = match args[0].as_str() {
        "suffix" => commands::suffix(&args[1..]),
        "probe" => commands::probe(&args[1..]),
        "inspect" => commands::inspect(&args[1..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: tether [-v] <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  suffix                           Print the shared library suffix");
    eprintln!("  probe <library> [symbol...]      Load a library and look up symbols");
    eprintln!("  inspect <library> [--strict]     Declare an extension's variables and list them");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --verbose                    Log loader and binding activity");
}
