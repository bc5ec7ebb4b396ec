//! Native extension modules loaded from shared libraries.
//!
//! An extension is a shared library exporting [`MODULE_TABLE_SYMBOL`]: a
//! sentinel-terminated array of [`RawVariableDescriptor`]s describing the
//! variables it contributes to a module.

use std::path::{Path, PathBuf};

use log::info;
use tether_common::ValueStack;
use tether_loader::{LibraryLoader, PlatformLoader};

use crate::declare::{declare_variables_with, ConstructorFailurePolicy, VariableDescriptor};
use crate::error::{DeclareError, ExtensionError};
use crate::raw::{read_table, RawVariableDescriptor};

/// Symbol every extension exports its variable table under.
pub const MODULE_TABLE_SYMBOL: &str = "tether_module_variables";

/// A loaded extension library.
///
/// Functions, strings, and data pointers bound from an extension point into
/// its library. Keep the `Extension` alive for as long as the VM may use
/// them.
pub struct Extension<L: LibraryLoader = PlatformLoader> {
    loader: L,
    handle: Option<L::Handle>,
    table: *const RawVariableDescriptor,
    path: PathBuf,
}

impl<L: LibraryLoader> Extension<L> {
    /// Loads the library at `path` and locates its variable table.
    pub fn open(loader: L, path: &Path) -> Result<Self, ExtensionError> {
        let handle = loader.load(path)?;
        let Some(table) = loader.symbol(&handle, MODULE_TABLE_SYMBOL) else {
            loader.unload(Some(handle));
            return Err(ExtensionError::MissingTable {
                path: path.to_path_buf(),
                symbol: MODULE_TABLE_SYMBOL,
            });
        };
        info!("opened extension {}", path.display());
        Ok(Self {
            loader,
            handle: Some(handle),
            table: table.cast(),
            path: path.to_path_buf(),
        })
    }

    /// Path the extension was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The extension's variable table.
    ///
    /// # Panics
    ///
    /// Panics if the table is malformed; see [`crate::raw`].
    pub fn descriptors(&self) -> Vec<VariableDescriptor<'_>> {
        // SAFETY: the table symbol lives in the library, which stays loaded
        // while `self` is borrowed.
        unsafe { read_table(self.table) }
    }

    /// Declares the extension's variables into the module at
    /// `module_index`. Returns how many variables were declared.
    pub fn declare<S>(
        &self,
        stack: &mut S,
        module_index: isize,
        policy: ConstructorFailurePolicy,
    ) -> Result<usize, DeclareError>
    where
        S: ValueStack + ?Sized,
    {
        let descriptors = self.descriptors();
        declare_variables_with(stack, module_index, &descriptors, policy)?;
        Ok(descriptors.len())
    }

    /// Unloads the library.
    pub fn close(mut self) {
        self.loader.unload(self.handle.take());
    }
}

impl<L: LibraryLoader> Drop for Extension<L> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.loader.unload(Some(handle));
        }
    }
}
