//! Binding Generation
//!
//! Renders the binding surfaces of a [`ComponentDefinition`]. Each surface is
//! a generator implementing [`BindingGenerator`]; all of them read the model
//! and the marshaling engine and never each other.
//!
//! # Artifacts
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │            ComponentDefinition (validated)             │
//! └───────────────────────┬───────────────────────────────┘
//!                         │  marshal::expand / naming
//!                         ▼
//! ┌───────────────────────────────────────────────────────┐
//! │              BindingGenerator Trait                    │
//! └──────┬──────────┬──────────┬───────────┬──────────┬───┘
//!        │          │          │           │          │
//!   <b>_types.h  <b>.h   <b>_dynamic.h <b>_dynamic.cc <b>_dynamic.hpp
//! ```
//!
//! Targets select artifacts: `c` writes the types and flat headers,
//! `dynamic` the types header and the table pair, `cpp` the types header,
//! the table header and the wrapper.

pub mod c_header;
pub mod c_types;
pub mod common;
pub mod cpp_wrapper;
pub mod dynamic;

pub use c_header::CHeaderGenerator;
pub use c_types::TypesHeaderGenerator;
pub use common::{CodeGenOptions, IndentWriter};
pub use cpp_wrapper::CppWrapperGenerator;
pub use dynamic::{DynamicHeaderGenerator, DynamicImplGenerator};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::model::validate::validate_component;
use crate::model::{ComponentDefinition, ParamPass, ParamType};

/// Errors that can occur during binding generation
#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("{owner}.{method}: parameter {param} of type {param_type} cannot be passed as \"{pass}\"")]
    InvalidPassing {
        owner: String,
        method: String,
        param: String,
        param_type: ParamType,
        pass: ParamPass,
    },

    #[error("{owner}.{method}: return parameter {param} has unsupported type {param_type}")]
    UnsupportedReturn {
        owner: String,
        method: String,
        param: String,
        param_type: ParamType,
    },

    #[error("{owner}.{method}: return parameter {param} must be the last parameter")]
    MisplacedReturn {
        owner: String,
        method: String,
        param: String,
    },

    #[error("{owner}.{method}: parameter {param} of type {param_type} requires a ParamClass")]
    MissingParamClass {
        owner: String,
        method: String,
        param: String,
        param_type: ParamType,
    },

    #[error("{owner}.{method}: parameter {param} references unknown {kind} {name}")]
    UnknownReference {
        owner: String,
        method: String,
        param: String,
        kind: ParamType,
        name: String,
    },

    #[error("struct {struct_name}: member {member} has type {member_type}; only scalar and enum members are allowed")]
    InvalidStructMember {
        struct_name: String,
        member: String,
        member_type: ParamType,
    },

    #[error("class {class}: unknown parent class {parent}")]
    UnknownParentClass { class: String, parent: String },

    #[error("class {0}: inheritance cycle")]
    InheritanceCycle(String),

    #[error("unknown release method: {0}")]
    UnknownReleaseMethod(String),

    #[error("release method {method}: {reason}")]
    InvalidReleaseMethod { method: String, reason: String },

    #[error("errors {first} and {second} share code {code}")]
    DuplicateErrorCode {
        first: String,
        second: String,
        code: i32,
    },

    #[error("invalid version string: {0:?}")]
    InvalidVersion(String),

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON model error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML model error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Code generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type for code generation operations
pub type CodeGenResult<T> = Result<T, CodeGenError>;

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory
    pub file_name: String,
    pub contents: String,
}

/// Trait for rendering one binding surface from a component
///
/// Implementations must be deterministic: the same model always yields the
/// same text.
pub trait BindingGenerator {
    /// Get the surface name
    fn target_name(&self) -> &'static str;

    /// Output file name for this component
    fn file_name(&self, component: &ComponentDefinition) -> String;

    /// Render the complete file. The component must already be validated.
    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String>;

    /// Render into an [`Artifact`]
    fn artifact(&mut self, component: &ComponentDefinition) -> CodeGenResult<Artifact> {
        let contents = self.generate(component)?;
        debug!(surface = self.target_name(), bytes = contents.len(), "rendered surface");
        Ok(Artifact {
            file_name: self.file_name(component),
            contents,
        })
    }
}

/// Selectable output group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Types header and flat C header
    C,
    /// Types header and dynamic table header/implementation
    Dynamic,
    /// Types header, dynamic table header and wrapper header
    Cpp,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::C, Target::Dynamic, Target::Cpp];

    pub fn name(&self) -> &'static str {
        match self {
            Target::C => "c",
            Target::Dynamic => "dynamic",
            Target::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = CodeGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Target::C),
            "dynamic" => Ok(Target::Dynamic),
            "cpp" | "c++" => Ok(Target::Cpp),
            _ => Err(CodeGenError::UnknownTarget(s.to_string())),
        }
    }
}

/// Surfaces in artifact order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Surface {
    Types,
    CHeader,
    DynamicHeader,
    DynamicImpl,
    Wrapper,
}

impl Surface {
    fn for_target(target: Target) -> &'static [Surface] {
        match target {
            Target::C => &[Surface::Types, Surface::CHeader],
            Target::Dynamic => &[Surface::Types, Surface::DynamicHeader, Surface::DynamicImpl],
            Target::Cpp => &[Surface::Types, Surface::DynamicHeader, Surface::Wrapper],
        }
    }

    fn generator(self, options: &CodeGenOptions) -> Box<dyn BindingGenerator> {
        let options = options.clone();
        match self {
            Surface::Types => Box::new(TypesHeaderGenerator::with_options(options)),
            Surface::CHeader => Box::new(CHeaderGenerator::with_options(options)),
            Surface::DynamicHeader => Box::new(DynamicHeaderGenerator::with_options(options)),
            Surface::DynamicImpl => Box::new(DynamicImplGenerator::with_options(options)),
            Surface::Wrapper => Box::new(CppWrapperGenerator::with_options(options)),
        }
    }
}

/// Validate the component, then render every artifact the targets select.
/// Shared artifacts are rendered once; the order is fixed regardless of the
/// order the targets are given in.
pub fn generate_all(
    component: &ComponentDefinition,
    targets: &[Target],
    options: &CodeGenOptions,
) -> CodeGenResult<Vec<Artifact>> {
    validate_component(component)?;

    let mut surfaces: Vec<Surface> = targets
        .iter()
        .flat_map(|t| Surface::for_target(*t).iter().copied())
        .collect();
    surfaces.sort();
    surfaces.dedup();

    surfaces
        .into_iter()
        .map(|surface| surface.generator(options).artifact(component))
        .collect()
}

/// Write artifacts into `dir`, creating it if needed. Returns the written paths.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> CodeGenResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        info!("Creating {}", path.display());
        std::fs::write(&path, &artifact.contents)?;
        written.push(path);
    }
    Ok(written)
}

/// Quick function to render the types header
pub fn to_types_header(component: &ComponentDefinition) -> CodeGenResult<String> {
    validate_component(component)?;
    TypesHeaderGenerator::new().generate(component)
}

/// Quick function to render the flat C header
pub fn to_c_header(component: &ComponentDefinition) -> CodeGenResult<String> {
    validate_component(component)?;
    CHeaderGenerator::new().generate(component)
}

/// Quick function to render the dynamic table header
pub fn to_dynamic_header(component: &ComponentDefinition) -> CodeGenResult<String> {
    validate_component(component)?;
    DynamicHeaderGenerator::new().generate(component)
}

/// Quick function to render the dynamic table implementation
pub fn to_dynamic_impl(component: &ComponentDefinition) -> CodeGenResult<String> {
    validate_component(component)?;
    DynamicImplGenerator::new().generate(component)
}

/// Quick function to render the wrapper header
pub fn to_cpp_wrapper(component: &ComponentDefinition) -> CodeGenResult<String> {
    validate_component(component)?;
    CppWrapperGenerator::new().generate(component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Method, Param};

    fn widget_component() -> ComponentDefinition {
        ComponentDefinition::new("Ex", "Example Library", "ex").with_class(
            Class::new("Widget").with_method(
                Method::new("GetName")
                    .with_param(Param::new("Name", ParamType::String, ParamPass::Out)),
            ),
        )
    }

    fn names(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("c".parse::<Target>().unwrap(), Target::C);
        assert_eq!("Dynamic".parse::<Target>().unwrap(), Target::Dynamic);
        assert_eq!("c++".parse::<Target>().unwrap(), Target::Cpp);
        assert!(matches!(
            "python".parse::<Target>(),
            Err(CodeGenError::UnknownTarget(_))
        ));
    }

    #[test]
    fn test_generate_all_targets() {
        let artifacts =
            generate_all(&widget_component(), &Target::ALL, &CodeGenOptions::default()).unwrap();
        assert_eq!(
            names(&artifacts),
            vec!["ex_types.h", "ex.h", "ex_dynamic.h", "ex_dynamic.cc", "ex_dynamic.hpp"]
        );
    }

    #[test]
    fn test_generate_single_target() {
        let options = CodeGenOptions::default();
        let c = generate_all(&widget_component(), &[Target::C], &options).unwrap();
        assert_eq!(names(&c), vec!["ex_types.h", "ex.h"]);

        let cpp = generate_all(&widget_component(), &[Target::Cpp], &options).unwrap();
        assert_eq!(names(&cpp), vec!["ex_types.h", "ex_dynamic.h", "ex_dynamic.hpp"]);
    }

    #[test]
    fn test_target_order_irrelevant() {
        let options = CodeGenOptions::default();
        let a = generate_all(&widget_component(), &[Target::Cpp, Target::C], &options).unwrap();
        let b = generate_all(&widget_component(), &[Target::C, Target::Cpp], &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_model_produces_nothing() {
        let component = ComponentDefinition::new("Ex", "Ex", "ex").with_class(
            Class::new("Widget").with_method(
                Method::new("Values").with_param(
                    Param::new("V", ParamType::BasicArray, ParamPass::Return).with_class("uint8"),
                ),
            ),
        );
        let result = generate_all(&component, &Target::ALL, &CodeGenOptions::default());
        assert!(matches!(result, Err(CodeGenError::UnsupportedReturn { .. })));
    }

    #[test]
    fn test_error_message_names_site() {
        let err = CodeGenError::MissingParamClass {
            owner: "Widget".into(),
            method: "SetColor".into(),
            param: "Color".into(),
            param_type: ParamType::Enum,
        };
        let msg = err.to_string();
        assert!(msg.contains("Widget.SetColor"));
        assert!(msg.contains("Color"));
        assert!(msg.contains("enum"));
    }

    #[test]
    fn test_write_artifacts() {
        let dir = std::env::temp_dir().join(format!("bindforge-write-{}", std::process::id()));
        let artifacts = vec![Artifact {
            file_name: "ex.h".to_string(),
            contents: "/* ex */\n".to_string(),
        }];
        let written = write_artifacts(&dir, &artifacts).unwrap();
        assert_eq!(written, vec![dir.join("ex.h")]);
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "/* ex */\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
