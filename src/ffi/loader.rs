//! Dynamic Library Loader
//!
//! Safe wrapper around libloading for opening a shared library and looking
//! up export addresses.

use std::ffi::CString;
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use super::TableError;

/// A dynamically loaded library. Dropping it unloads the library.
pub struct DynamicLibrary {
    /// Path to the library
    path: PathBuf,
    /// The loaded library handle
    library: Library,
}

impl DynamicLibrary {
    /// Load a library from the given path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref().to_path_buf();

        // Safety: loading a library runs its initializers. The caller names
        // the library and is trusted to provide one built for this component.
        let library = unsafe {
            Library::new(&path).map_err(|e| TableError::CouldNotLoadLibrary {
                path: path.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(Self { path, library })
    }

    /// Get the path to this library
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of an exported symbol, or `None` if the library does not
    /// export it
    pub fn symbol_address(&self, name: &str) -> Option<usize> {
        let c_name = CString::new(name).ok()?;

        // Safety: the symbol is only read as an address and never called here.
        let symbol: Symbol<*const ()> =
            unsafe { self.library.get(c_name.as_bytes_with_nul()).ok()? };

        let addr = *symbol as usize;
        (addr != 0).then_some(addr)
    }
}

impl fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("path", &self.path)
            .finish()
    }
}
