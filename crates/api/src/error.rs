//! Error types for bindings and extensions.

use std::path::PathBuf;

use tether_common::TypeTag;
use tether_loader::LoadError;
use thiserror::Error;

/// Errors from declaring variables into a module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclareError {
    /// The module index reaches below the current frame.
    #[error("module index {index} is outside the current frame")]
    InvalidModuleIndex { index: isize },

    /// The module index addresses a value that is not a module.
    #[error("module index {index} holds {actual}, not a module")]
    NotAModule { index: isize, actual: TypeTag },

    /// The VM refused to grow the stack for the next binding.
    #[error("no stack space to declare '{name}'")]
    CapacityExhausted { name: String },

    /// An object constructor failed and the policy asked to propagate it.
    #[error("constructor '{constructor}' for '{name}' failed: {message}")]
    ConstructorFailed {
        name: String,
        constructor: String,
        message: String,
    },
}

/// Errors from opening a native extension.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    /// The library itself could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The library loaded but exports no variable table.
    #[error("'{}' does not export {symbol}", path.display())]
    MissingTable { path: PathBuf, symbol: &'static str },
}
