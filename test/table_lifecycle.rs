//! Integration Tests for the Runtime Wrapper Table
//!
//! Drives Init/Load/Release against real system libraries. The `Inet`
//! component names exports that the C library really provides
//! (`inet_addr`, `inet_ntoa`), so a full load can succeed without building
//! a test library.

use bindforge::ffi::{TableError, TableState, WrapperTable};
use bindforge::model::{ComponentDefinition, Method};
use std::path::Path;

fn inet(extra: Option<&str>) -> ComponentDefinition {
    let mut component = ComponentDefinition::new("Inet", "Internet Helpers", "inet")
        .with_global_method(Method::new("Addr"))
        .with_global_method(Method::new("Ntoa"));
    if let Some(name) = extra {
        component = component.with_global_method(Method::new(name));
    }
    component
}

fn initialized(component: &ComponentDefinition) -> WrapperTable {
    let mut table = WrapperTable::new(component);
    WrapperTable::init(Some(&mut table)).unwrap();
    table
}

#[cfg(target_os = "linux")]
const SYSTEM_LIBRARY: &str = "libc.so.6";
#[cfg(target_os = "macos")]
const SYSTEM_LIBRARY: &str = "/usr/lib/libSystem.B.dylib";

#[test]
fn test_init_zeroes_table() {
    let table = initialized(&inet(None));
    assert_eq!(table.state(), TableState::Initialized);
    assert!(table.is_zeroed());
    assert_eq!(table.slots().len(), 2);
    assert_eq!(table.slots()[0].symbol, "inet_addr");
    assert_eq!(table.slots()[1].field, "m_Ntoa");
}

#[test]
fn test_missing_library_path() {
    let component = inet(None);
    let mut table = initialized(&component);
    let err = WrapperTable::load(
        Some(&mut table),
        Some(Path::new("/definitely/not/here/libinet.so")),
    )
    .unwrap_err();

    assert!(matches!(err, TableError::CouldNotLoadLibrary { .. }));
    assert_eq!(table.result_code(&err), 6);
    assert!(table.is_zeroed());
}

#[test]
fn test_null_arguments() {
    let component = inet(None);
    let mut table = initialized(&component);
    assert_eq!(
        WrapperTable::load(Some(&mut table), None),
        Err(TableError::InvalidParam)
    );
    assert_eq!(WrapperTable::release(None), Err(TableError::InvalidParam));
    assert_eq!(table.result_code(&TableError::InvalidParam), 2);
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn test_load_and_release() {
    let component = inet(None);
    let mut table = initialized(&component);

    WrapperTable::load(Some(&mut table), Some(Path::new(SYSTEM_LIBRARY))).unwrap();
    assert_eq!(table.state(), TableState::Loaded);
    assert!(table.slots().iter().all(|slot| slot.address().is_some()));
    assert!(table.address("m_Addr").is_some());
    assert_eq!(table.library_path(), Some(Path::new(SYSTEM_LIBRARY)));

    WrapperTable::release(Some(&mut table)).unwrap();
    assert_eq!(table.state(), TableState::Initialized);
    assert!(table.is_zeroed());

    // Release on a zeroed table is a no-op
    WrapperTable::release(Some(&mut table)).unwrap();
    assert!(table.is_zeroed());
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn test_missing_export_leaves_table_zeroed() {
    let component = inet(Some("NoSuchExportAnywhere"));
    let mut table = initialized(&component);

    let err = WrapperTable::load(Some(&mut table), Some(Path::new(SYSTEM_LIBRARY))).unwrap_err();
    assert_eq!(
        err,
        TableError::CouldNotFindLibraryExport {
            symbol: "inet_nosuchexportanywhere".to_string()
        }
    );
    assert_eq!(table.result_code(&err), 7);
    assert!(table.is_zeroed());
    assert_eq!(table.state(), TableState::Initialized);
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn test_load_twice_replaces_binding() {
    let component = inet(None);
    let mut table = initialized(&component);
    let path = Path::new(SYSTEM_LIBRARY);

    WrapperTable::load(Some(&mut table), Some(path)).unwrap();
    let first = table.address("m_Ntoa");
    WrapperTable::load(Some(&mut table), Some(path)).unwrap();
    assert_eq!(table.state(), TableState::Loaded);
    assert_eq!(table.address("m_Ntoa"), first);

    WrapperTable::release(Some(&mut table)).unwrap();
}
