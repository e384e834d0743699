//! Dynamic wrapper table
//!
//! A [`WrapperTable`] mirrors the generated `s<NS>DynamicWrapperTable`: a
//! library handle plus one address slot per class method and global method.
//! The three procedures take `Option` arguments so the null-argument
//! contract of the C rendition carries over unchanged.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::DynamicLibrary;
use crate::marshal::naming;
use crate::model::{ComponentDefinition, ReservedError};

/// Failures of the table procedures, one per reserved result code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("invalid parameter")]
    InvalidParam,

    #[error("could not load library {}: {reason}", path.display())]
    CouldNotLoadLibrary { path: PathBuf, reason: String },

    #[error("could not find library export {symbol}")]
    CouldNotFindLibraryExport { symbol: String },
}

impl TableError {
    pub fn reserved(&self) -> ReservedError {
        match self {
            TableError::InvalidParam => ReservedError::InvalidParam,
            TableError::CouldNotLoadLibrary { .. } => ReservedError::CouldNotLoadLibrary,
            TableError::CouldNotFindLibraryExport { .. } => {
                ReservedError::CouldNotFindLibraryExport
            }
        }
    }
}

/// Lifecycle of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// Constructed, never initialized
    Uninitialized,
    /// Zeroed: no library, no resolved slots
    Initialized,
    /// Every slot resolved and the library handle stored
    Loaded,
}

/// One function-pointer field of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSlot {
    /// Field name in the generated table struct
    pub field: String,
    /// Flat export resolved into this slot
    pub symbol: String,
    address: Option<usize>,
}

impl TableSlot {
    pub fn address(&self) -> Option<usize> {
        self.address
    }
}

/// Runtime rendition of the dynamic function-pointer table
#[derive(Debug)]
pub struct WrapperTable {
    library: Option<DynamicLibrary>,
    slots: Vec<TableSlot>,
    state: TableState,
    codes: Vec<(ReservedError, i32)>,
}

impl WrapperTable {
    /// Build the slot list for a component, in table order
    pub fn new(component: &ComponentDefinition) -> Self {
        let ns = component.name_space.as_str();
        let slots = component
            .methods_in_table_order()
            .into_iter()
            .map(|(scope, method)| TableSlot {
                field: naming::table_field(scope, method),
                symbol: naming::export_name(ns, scope, method),
                address: None,
            })
            .collect();
        let codes = component.reserved_codes();

        Self {
            library: None,
            slots,
            state: TableState::Uninitialized,
            codes,
        }
    }

    /// Zero the library handle and every slot
    pub fn init(table: Option<&mut WrapperTable>) -> Result<(), TableError> {
        let table = table.ok_or(TableError::InvalidParam)?;
        table.library = None;
        for slot in &mut table.slots {
            slot.address = None;
        }
        table.state = TableState::Initialized;
        debug!(slots = table.slots.len(), "wrapper table initialized");
        Ok(())
    }

    /// Unload the library if one is bound, then re-initialize
    pub fn release(table: Option<&mut WrapperTable>) -> Result<(), TableError> {
        let table = table.ok_or(TableError::InvalidParam)?;
        match table.library.take() {
            Some(library) => {
                debug!(path = %library.path().display(), "releasing wrapper table");
                drop(library);
                Self::init(Some(table))
            }
            None => Ok(()),
        }
    }

    /// Open a library and resolve every slot in table order
    ///
    /// A missing export closes the new library and re-initializes the table,
    /// so the table ends up either fully populated or zeroed. The library
    /// handle is stored last.
    pub fn load(table: Option<&mut WrapperTable>, path: Option<&Path>) -> Result<(), TableError> {
        let (table, path) = match (table, path) {
            (Some(table), Some(path)) => (table, path),
            _ => return Err(TableError::InvalidParam),
        };

        let library = DynamicLibrary::load(path)?;

        for index in 0..table.slots.len() {
            match library.symbol_address(&table.slots[index].symbol) {
                Some(address) => table.slots[index].address = Some(address),
                None => {
                    let symbol = table.slots[index].symbol.clone();
                    debug!(%symbol, path = %path.display(), "missing library export");
                    drop(library);
                    Self::init(Some(table))?;
                    return Err(TableError::CouldNotFindLibraryExport { symbol });
                }
            }
        }

        debug!(
            path = %path.display(),
            slots = table.slots.len(),
            "wrapper table loaded"
        );
        table.library = Some(library);
        table.state = TableState::Loaded;
        Ok(())
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn slots(&self) -> &[TableSlot] {
        &self.slots
    }

    /// Path of the bound library, if any
    pub fn library_path(&self) -> Option<&Path> {
        self.library.as_ref().map(DynamicLibrary::path)
    }

    /// Resolved address of a slot by field name
    pub fn address(&self, field: &str) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| slot.field == field)
            .and_then(TableSlot::address)
    }

    /// No library bound and no slot resolved
    pub fn is_zeroed(&self) -> bool {
        self.library.is_none() && self.slots.iter().all(|slot| slot.address.is_none())
    }

    /// Result code the component assigns to a table error
    pub fn result_code(&self, error: &TableError) -> i32 {
        let reserved = error.reserved();
        self.codes
            .iter()
            .find(|(r, _)| *r == reserved)
            .map(|(_, code)| *code)
            .unwrap_or_else(|| reserved.default_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Method, Param, ParamPass, ParamType};

    fn component() -> ComponentDefinition {
        ComponentDefinition::new("Ex", "Example Library", "ex")
            .with_class(
                Class::new("Widget")
                    .with_method(Method::new("GetName"))
                    .with_method(Method::new("SetName")),
            )
            .with_global_method(Method::new("GetVersion").with_suffix("_V2").with_param(
                Param::new("Major", ParamType::Uint32, ParamPass::Out),
            ))
            .with_error("COULDNOTLOADLIBRARY", 106)
    }

    #[test]
    fn test_slots_in_table_order() {
        let table = WrapperTable::new(&component());
        let fields: Vec<_> = table.slots().iter().map(|s| s.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["m_Widget_GetName", "m_Widget_SetName", "m_GetVersion"]
        );
        assert_eq!(table.slots()[2].symbol, "ex_getversion_V2");
        assert_eq!(table.state(), TableState::Uninitialized);
    }

    #[test]
    fn test_null_table_is_invalid_param() {
        assert_eq!(WrapperTable::init(None), Err(TableError::InvalidParam));
        assert_eq!(WrapperTable::release(None), Err(TableError::InvalidParam));
        assert_eq!(
            WrapperTable::load(None, Some(Path::new("libex.so"))),
            Err(TableError::InvalidParam)
        );
    }

    #[test]
    fn test_null_path_is_invalid_param() {
        let mut table = WrapperTable::new(&component());
        WrapperTable::init(Some(&mut table)).unwrap();
        assert_eq!(
            WrapperTable::load(Some(&mut table), None),
            Err(TableError::InvalidParam)
        );
        assert!(table.is_zeroed());
    }

    #[test]
    fn test_release_on_zeroed_table_is_noop() {
        let mut table = WrapperTable::new(&component());
        WrapperTable::init(Some(&mut table)).unwrap();
        WrapperTable::release(Some(&mut table)).unwrap();
        assert_eq!(table.state(), TableState::Initialized);
        assert!(table.is_zeroed());
    }

    #[test]
    fn test_result_codes_honor_model() {
        let table = WrapperTable::new(&component());
        let load = TableError::CouldNotLoadLibrary {
            path: PathBuf::from("x"),
            reason: String::new(),
        };
        assert_eq!(table.result_code(&load), 106);
        assert_eq!(table.result_code(&TableError::InvalidParam), 2);
        let missing = TableError::CouldNotFindLibraryExport {
            symbol: "ex_x".to_string(),
        };
        assert_eq!(table.result_code(&missing), 7);
    }

    #[test]
    fn test_result_codes_distinct_from_declared_errors() {
        let component = ComponentDefinition::new("Ex", "Example Library", "ex")
            .with_error("GenericException", 6);
        let table = WrapperTable::new(&component);
        let load = TableError::CouldNotLoadLibrary {
            path: PathBuf::from("x"),
            reason: String::new(),
        };
        assert_eq!(table.result_code(&load), 8);
        assert_eq!(table.result_code(&TableError::InvalidParam), 2);
    }

    #[test]
    fn test_missing_library_leaves_table_zeroed() {
        let mut table = WrapperTable::new(&component());
        WrapperTable::init(Some(&mut table)).unwrap();
        let result = WrapperTable::load(
            Some(&mut table),
            Some(Path::new("/nonexistent/libex.so")),
        );
        assert!(matches!(result, Err(TableError::CouldNotLoadLibrary { .. })));
        assert!(table.is_zeroed());
        assert_eq!(table.state(), TableState::Initialized);
    }
}
