//! Shared libraries on Windows, through `LoadLibrary`.

use std::ffi::c_void;
use std::path::Path;

use libloading::os::windows::Library;
use log::{debug, warn};

use crate::error::LoadError;
use crate::{LibraryLoader, SymbolAddress};

/// `LoadLibrary`-based loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLoader;

impl LibraryLoader for WindowsLoader {
    const SUFFIX: &'static str = ".dll";

    type Handle = Library;

    fn load(&self, path: &Path) -> Result<Library, LoadError> {
        // SAFETY: see the Unix loader; DllMain runs as part of loading.
        let library = unsafe { Library::new(path) }.map_err(|e| LoadError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("loaded {}", path.display());
        Ok(library)
    }

    fn symbol(&self, handle: &Library, name: &str) -> Option<SymbolAddress> {
        // SAFETY: the address is only read, never called here.
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
            Err(e) => warn!("FreeLibrary failed: {e}"),
        }
    }
}
