//! Tether loader: load shared libraries and resolve their symbols.
//!
//! One [`LibraryLoader`] implementation exists per platform family and is
//! picked at build time as [`PlatformLoader`]. This crate knows nothing
//! about the VM.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use tether_loader::{LibraryLoader, PlatformLoader};
//!
//! let loader = PlatformLoader::default();
//! let handle = loader.load(Path::new("./libgeometry.so")).unwrap();
//! let init = loader.symbol(&handle, "tether_module_variables");
//! assert!(init.is_some());
//! loader.unload(Some(handle));
//! ```
//!
//! # Ownership
//!
//! A handle belongs to whoever called `load`. `unload` consumes it, so a
//! handle cannot be used or unloaded again afterwards; passing `None` is a
//! no-op. Dropping a handle also unloads the library. Addresses obtained
//! through `symbol` dangle once their library is unloaded.

pub mod error;

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

pub use error::LoadError;

use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;

/// The loader for the platform this crate was built for.
#[cfg(unix)]
pub type PlatformLoader = unix::UnixLoader;
/// The loader for the platform this crate was built for.
#[cfg(windows)]
pub type PlatformLoader = windows::WindowsLoader;

/// Load, resolve, and unload shared libraries.
pub trait LibraryLoader {
    /// File name suffix of shared libraries on this platform, dot included.
    const SUFFIX: &'static str;

    /// Owned handle to a loaded library.
    type Handle;

    /// Opens the library at `path`.
    fn load(&self, path: &Path) -> Result<Self::Handle, LoadError>;

    /// Address of the exported symbol `name`, or `None` if it is absent.
    fn symbol(&self, handle: &Self::Handle, name: &str) -> Option<SymbolAddress>;

    /// Releases a library. `None` is accepted and ignored.
    fn unload(&self, handle: Option<Self::Handle>);
}

/// Non-null address of a resolved symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddress(NonNull<c_void>);

impl SymbolAddress {
    /// Wraps a raw address; `None` for null.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// The raw address.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// The address reinterpreted as a pointer to `T`.
    pub fn cast<T>(&self) -> *const T {
        self.0.as_ptr().cast_const().cast()
    }
}

/// File name a search-path builder should try for `module` on the platform
/// served by `L`.
pub fn candidate_file_name<L: LibraryLoader>(module: &str) -> String {
    format!("{module}{}", L::SUFFIX)
}
