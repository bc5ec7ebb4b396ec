//! Shared libraries on Unix-like platforms, through `dlopen`.

use std::ffi::c_void;
use std::path::Path;

use libloading::os::unix::{Library, RTLD_LOCAL, RTLD_NOW};
use log::{debug, warn};

use crate::error::LoadError;
use crate::{LibraryLoader, SymbolAddress};

/// `dlopen`-based loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixLoader;

impl LibraryLoader for UnixLoader {
    #[cfg(target_os = "macos")]
    const SUFFIX: &'static str = ".dylib";
    #[cfg(not(target_os = "macos"))]
    const SUFFIX: &'static str = ".so";

    type Handle = Library;

    fn load(&self, path: &Path) -> Result<Library, LoadError> {
        // RTLD_NOW surfaces unresolved dependencies here rather than at the
        // first call into the library.
        // SAFETY: running the library's initializers is the documented
        // contract of loading it; callers choose which paths to trust.
        let library = unsafe { Library::open(Some(path), RTLD_NOW | RTLD_LOCAL) }.map_err(|e| {
            LoadError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        debug!("loaded {}", path.display());
        Ok(library)
    }

    fn symbol(&self, handle: &Library, name: &str) -> Option<SymbolAddress> {
        // SAFETY: the symbol is read as an untyped address; nothing is
        // called or dereferenced here.
        match unsafe { handle.get::<*mut c_void>(name.as_bytes()) } {
            Ok(symbol) => SymbolAddress::new(*symbol),
            Err(e) => {
                debug!("symbol {name} not found: {e}");
                None
            }
        }
    }

    fn unload(&self, handle: Option<Library>) {
        let Some(library) = handle else {
            return;
        };
        match library.close() {
            Ok(()) => debug!("unloaded library"),
            Err(e) => warn!("dlclose failed: {e}"),
        }
    }
}
