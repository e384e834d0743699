//! Runtime Wrapper Table
//!
//! The dynamic function-pointer table as a Rust value: one slot per class
//! method and global method of a component, filled by resolving the flat
//! export names from a shared library at runtime.
//!
//! # Architecture
//!
//! ```text
//! ComponentDefinition
//!       │  marshal::naming (field + export name per method)
//!       ▼
//! WrapperTable::new ──► init ──► load(path) ──► release
//!                                   │
//!                                   ▼
//!                       Dynamic Loader (libloading)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut table = WrapperTable::new(&component);
//! WrapperTable::init(Some(&mut table))?;
//! WrapperTable::load(Some(&mut table), Some(Path::new("libex.so")))?;
//! let addr = table.address("m_Widget_GetName");
//! WrapperTable::release(Some(&mut table))?;
//! ```

mod loader;
mod table;

pub use loader::DynamicLibrary;
pub use table::{TableError, TableSlot, TableState, WrapperTable};
