//! Error types for the library loader.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a shared library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The platform loader refused the library. `reason` is the platform's
    /// own message, unparsed.
    #[error("cannot load '{}': {reason}", path.display())]
    Open { path: PathBuf, reason: String },
}
