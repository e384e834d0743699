//! Bindforge - Interface-Definition-Driven Binding Generator
//!
//! Reads one language-neutral description of a library's API (classes,
//! methods, typed parameters, enums, structs, callbacks, error codes) and
//! renders consistent binding surfaces from it.
//!
//! # Features
//!
//! - **Flat C ABI**: a types header plus one exported declaration per method
//! - **Dynamic loading**: a function-pointer table with Init/Release/Load
//! - **C++ wrapper**: RAII instance types, exceptions and the two-call string idiom
//! - **Runtime table**: the same Init/Release/Load contract in Rust over libloading
//!
//! # Example
//!
//! ```
//! use bindforge::codegen::{generate_all, CodeGenOptions, Target};
//! use bindforge::model::{Class, ComponentDefinition, Method, Param, ParamPass, ParamType};
//!
//! let component = ComponentDefinition::new("Ex", "Example Library", "ex")
//!     .with_class(Class::new("Widget").with_method(
//!         Method::new("GetName").with_param(Param::new("Name", ParamType::String, ParamPass::Out)),
//!     ));
//!
//! let artifacts = generate_all(&component, &Target::ALL, &CodeGenOptions::default()).unwrap();
//! assert!(artifacts.iter().any(|a| a.file_name == "ex_dynamic.hpp"));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  JSON / TOML    │  Interface definition
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │     model       │  Parse + validate
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │    marshal      │  Logical param -> physical C params, ABI names
//! └────────┬────────┘
//!     ┌────┴─────┐
//!     ▼          ▼
//! ┌───────┐  ┌───────┐
//! │codegen│  │  ffi  │  Text surfaces / runtime table
//! └───────┘  └───────┘
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod codegen;
pub mod config;
pub mod ffi;
pub mod marshal;
pub mod model;

// Re-export commonly used types
pub use codegen::{
    generate_all, write_artifacts, Artifact, BindingGenerator, CodeGenError, CodeGenOptions,
    CodeGenResult, Target,
};
pub use config::{BindforgeConfig, ConfigError};
pub use ffi::{DynamicLibrary, TableError, TableSlot, TableState, WrapperTable};
pub use marshal::{expand, expand_method, Direction, PhysicalParam, Role};
pub use model::{
    Class, ComponentDefinition, Method, Param, ParamPass, ParamType, ReservedError, Scope,
};
