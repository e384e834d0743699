//! Interface Definition Model
//!
//! The immutable, language-neutral description of a library's API that every
//! emitter reads. A model is produced once per run (from JSON or TOML), validated,
//! and then only ever borrowed.
//!
//! # Example
//!
//! ```
//! use bindforge::model::{Class, ComponentDefinition, Method, Param, ParamPass, ParamType};
//!
//! let component = ComponentDefinition::new("Ex", "Example Library", "ex")
//!     .with_class(Class::new("Widget").with_method(
//!         Method::new("GetName").with_param(Param::new("Name", ParamType::String, ParamPass::Out)),
//!     ));
//!
//! assert!(component.find_class("Widget").is_some());
//! ```

pub mod types;
pub mod validate;

pub use types::{ParamPass, ParamType, TypeCategory};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codegen::{CodeGenError, CodeGenResult};

/// Name of the implicit root of every class chain
pub const BASE_CLASS_NAME: &str = "BaseClass";

/// Owner name used in diagnostics for library-level methods
pub const GLOBAL_OWNER_NAME: &str = "Wrapper";

/// Root of the interface model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentDefinition {
    pub name_space: String,
    pub library_name: String,
    pub base_name: String,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub functions: Vec<FunctionType>,
}

/// Semantic version of the described library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

/// A declared class; forms a single-inheritance chain through `parent_class`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Class {
    pub class_name: String,
    #[serde(default)]
    pub class_description: String,
    /// Empty means the implicit root base type
    #[serde(default)]
    pub parent_class: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

/// Library-level functions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Global {
    /// Global method every wrapper destructor calls to release its instance
    #[serde(default)]
    pub release_method: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Method {
    pub method_name: String,
    #[serde(default)]
    pub method_description: String,
    #[serde(default, rename = "DLLSuffix")]
    pub dll_suffix: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Param {
    pub param_name: String,
    #[serde(default)]
    pub param_description: String,
    pub param_type: ParamType,
    pub param_pass: ParamPass,
    /// Referenced enum / struct / class / element type / function type
    #[serde(default)]
    pub param_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Struct {
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Member {
    pub name: String,
    #[serde(rename = "Type")]
    pub member_type: ParamType,
    /// Enum name for enum members
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub columns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub options: Vec<EnumOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumOption {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorCode {
    pub name: String,
    pub code: i32,
    #[serde(default)]
    pub description: String,
}

/// A named function-pointer type usable as a callback parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionType {
    pub function_name: String,
    #[serde(default)]
    pub function_description: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

/// Result codes every generated surface relies on, present even when the
/// model does not declare them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedError {
    InvalidParam,
    CouldNotLoadLibrary,
    CouldNotFindLibraryExport,
}

impl ReservedError {
    pub const ALL: [ReservedError; 3] = [
        ReservedError::InvalidParam,
        ReservedError::CouldNotLoadLibrary,
        ReservedError::CouldNotFindLibraryExport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReservedError::InvalidParam => "INVALIDPARAM",
            ReservedError::CouldNotLoadLibrary => "COULDNOTLOADLIBRARY",
            ReservedError::CouldNotFindLibraryExport => "COULDNOTFINDLIBRARYEXPORT",
        }
    }

    /// Conventional code used when the model does not declare one
    pub fn default_code(&self) -> i32 {
        match self {
            ReservedError::InvalidParam => 2,
            ReservedError::CouldNotLoadLibrary => 6,
            ReservedError::CouldNotFindLibraryExport => 7,
        }
    }
}

/// Which part of the component a method belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Class(&'a str),
    Global,
}

impl Scope<'_> {
    /// Owner name for diagnostics
    pub fn owner(&self) -> &str {
        match self {
            Scope::Class(name) => name,
            Scope::Global => GLOBAL_OWNER_NAME,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

impl ComponentDefinition {
    pub fn new(
        name_space: impl Into<String>,
        library_name: impl Into<String>,
        base_name: impl Into<String>,
    ) -> Self {
        Self {
            name_space: name_space.into(),
            library_name: library_name.into(),
            base_name: base_name.into(),
            version: Version::default(),
            classes: Vec::new(),
            global: Global::default(),
            errors: Vec::new(),
            enums: Vec::new(),
            structs: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_global_method(mut self, method: Method) -> Self {
        self.global.methods.push(method);
        self
    }

    pub fn with_release_method(mut self, name: impl Into<String>) -> Self {
        self.global.release_method = name.into();
        self
    }

    pub fn with_error(mut self, name: impl Into<String>, code: i32) -> Self {
        self.errors.push(ErrorCode {
            name: name.into(),
            code,
            description: String::new(),
        });
        self
    }

    pub fn with_enum(mut self, e: Enum) -> Self {
        self.enums.push(e);
        self
    }

    pub fn with_struct(mut self, s: Struct) -> Self {
        self.structs.push(s);
        self
    }

    pub fn with_function(mut self, f: FunctionType) -> Self {
        self.functions.push(f);
        self
    }

    /// Parse a model from JSON text
    pub fn from_json_str(s: &str) -> CodeGenResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a model from TOML text
    pub fn from_toml_str(s: &str) -> CodeGenResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a model file; `.toml` files are read as TOML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> CodeGenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.class_name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn find_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionType> {
        self.functions.iter().find(|f| f.function_name == name)
    }

    pub fn find_global_method(&self, name: &str) -> Option<&Method> {
        self.global.methods.iter().find(|m| m.method_name == name)
    }

    /// Whether `name` may be referenced by a handle parameter
    pub fn is_handle_class(&self, name: &str) -> bool {
        name == BASE_CLASS_NAME || self.find_class(name).is_some()
    }

    /// Code of a reserved error, honoring a model override
    pub fn reserved_code(&self, reserved: ReservedError) -> i32 {
        self.reserved_codes()
            .into_iter()
            .find(|(r, _)| *r == reserved)
            .map(|(_, code)| code)
            .unwrap_or_else(|| reserved.default_code())
    }

    /// Codes of every reserved error. A declared code wins. An undeclared
    /// reserved error keeps its default unless a declared error already owns
    /// that value, in which case it takes the next code above all codes in use.
    pub fn reserved_codes(&self) -> Vec<(ReservedError, i32)> {
        let declared = |reserved: ReservedError| {
            self.errors
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(reserved.name()))
                .map(|e| e.code)
        };
        let candidates: Vec<(ReservedError, Option<i32>)> = ReservedError::ALL
            .iter()
            .map(|&reserved| {
                let default = reserved.default_code();
                let code = declared(reserved).or_else(|| {
                    (!self.errors.iter().any(|e| e.code == default)).then_some(default)
                });
                (reserved, code)
            })
            .collect();

        let mut next = self
            .errors
            .iter()
            .map(|e| e.code)
            .chain(candidates.iter().filter_map(|(_, code)| *code))
            .max()
            .unwrap_or(0);
        candidates
            .into_iter()
            .map(|(reserved, code)| {
                let code = code.unwrap_or_else(|| {
                    next = next.saturating_add(1);
                    next
                });
                (reserved, code)
            })
            .collect()
    }

    /// Every error constant to render: declared errors in model order, then
    /// any reserved error the model left out
    pub fn error_constants(&self) -> Vec<(String, i32)> {
        let mut constants: Vec<(String, i32)> = self
            .errors
            .iter()
            .map(|e| (e.name.to_uppercase(), e.code))
            .collect();
        for (reserved, code) in self.reserved_codes() {
            if !constants.iter().any(|(name, _)| name == reserved.name()) {
                constants.push((reserved.name().to_string(), code));
            }
        }
        constants
    }

    /// Every method in table order: class methods in declaration order, then
    /// global methods
    pub fn methods_in_table_order(&self) -> Vec<(Scope<'_>, &Method)> {
        self.classes
            .iter()
            .flat_map(|class| {
                class
                    .methods
                    .iter()
                    .map(move |m| (Scope::Class(class.class_name.as_str()), m))
            })
            .chain(self.global.methods.iter().map(|m| (Scope::Global, m)))
            .collect()
    }
}

impl Version {
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }
}

impl FromStr for Version {
    type Err = CodeGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodeGenError::InvalidVersion(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u32, CodeGenError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u32>()
                .map_err(|_| invalid())
        };
        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl TryFrom<String> for Version {
    type Error = CodeGenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl Class {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            class_description: String::new(),
            parent_class: String::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_class = parent.into();
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Parent name with the implicit root filled in
    pub fn parent_name(&self) -> &str {
        if self.parent_class.is_empty() {
            BASE_CLASS_NAME
        } else {
            &self.parent_class
        }
    }
}

impl Method {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            method_description: String::new(),
            dll_suffix: String::new(),
            params: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.method_description = description.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.dll_suffix = suffix.into();
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// The `return`-passed parameter, if any
    pub fn return_param(&self) -> Option<&Param> {
        self.params.iter().find(|p| p.param_pass == ParamPass::Return)
    }

    /// Whether any parameter needs the size-query call
    pub fn uses_two_call(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.param_type.uses_two_call(p.param_pass))
    }
}

impl Param {
    pub fn new(name: impl Into<String>, param_type: ParamType, param_pass: ParamPass) -> Self {
        Self {
            param_name: name.into(),
            param_description: String::new(),
            param_type,
            param_pass,
            param_class: String::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.param_class = class.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.param_description = description.into();
        self
    }
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

impl Member {
    pub fn new(name: impl Into<String>, member_type: ParamType) -> Self {
        Self {
            name: name.into(),
            member_type,
            class: String::new(),
            rows: 0,
            columns: 0,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Fixed-size embedded array; `columns == 0` means one dimension
    pub fn with_extent(mut self, rows: u32, columns: u32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: i64) -> Self {
        self.options.push(EnumOption {
            name: name.into(),
            value,
        });
        self
    }
}

impl FunctionType {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            function_description: String::new(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL_JSON: &str = r#"{
        "NameSpace": "Ex",
        "LibraryName": "Example Library",
        "BaseName": "ex",
        "Version": "1.2.3",
        "Classes": [
            {
                "ClassName": "Widget",
                "Methods": [
                    {
                        "MethodName": "GetName",
                        "DLLSuffix": "_v2",
                        "Params": [
                            { "ParamName": "Name", "ParamType": "string", "ParamPass": "out" }
                        ]
                    }
                ]
            }
        ],
        "Global": { "ReleaseMethod": "ReleaseInstance", "Methods": [] },
        "Errors": [ { "Name": "NotImplemented", "Code": 1 } ]
    }"#;

    #[test]
    fn test_parse_json_model() {
        let component = ComponentDefinition::from_json_str(MODEL_JSON).unwrap();
        assert_eq!(component.name_space, "Ex");
        assert_eq!(component.version, Version::new(1, 2, 3));
        let widget = component.find_class("Widget").unwrap();
        assert_eq!(widget.parent_name(), BASE_CLASS_NAME);
        let method = &widget.methods[0];
        assert_eq!(method.dll_suffix, "_v2");
        assert_eq!(method.params[0].param_type, ParamType::String);
        assert_eq!(method.params[0].param_pass, ParamPass::Out);
        assert!(method.uses_two_call());
        assert_eq!(component.global.release_method, "ReleaseInstance");
    }

    #[test]
    fn test_parse_toml_model() {
        let toml_str = r#"
NameSpace = "Ex"
LibraryName = "Example"
BaseName = "ex"
Version = "0.4.0"

[[Classes]]
ClassName = "Widget"
ParentClass = "Base"
"#;
        let component = ComponentDefinition::from_toml_str(toml_str).unwrap();
        assert_eq!(component.version.minor, 4);
        assert_eq!(component.classes[0].parent_name(), "Base");
    }

    #[test]
    fn test_invalid_version_rejected() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.x".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert_eq!("10.0.7".parse::<Version>().unwrap().to_string(), "10.0.7");
    }

    #[test]
    fn test_error_constants_include_reserved() {
        let component = ComponentDefinition::from_json_str(MODEL_JSON).unwrap();
        let constants = component.error_constants();
        assert_eq!(constants[0], ("NOTIMPLEMENTED".to_string(), 1));
        assert!(constants.contains(&("INVALIDPARAM".to_string(), 2)));
        assert!(constants.contains(&("COULDNOTLOADLIBRARY".to_string(), 6)));
        assert!(constants.contains(&("COULDNOTFINDLIBRARYEXPORT".to_string(), 7)));
    }

    #[test]
    fn test_model_declared_reserved_code_wins() {
        let component = ComponentDefinition::new("Ex", "Ex", "ex").with_error("InvalidParam", 42);
        assert_eq!(component.reserved_code(ReservedError::InvalidParam), 42);
        let constants = component.error_constants();
        assert_eq!(
            constants
                .iter()
                .filter(|(name, _)| name == "INVALIDPARAM")
                .count(),
            1
        );
    }

    #[test]
    fn test_reserved_default_moves_off_declared_code() {
        let component = ComponentDefinition::new("Ex", "Ex", "ex")
            .with_error("NotImplemented", 1)
            .with_error("GenericException", 6);
        assert_eq!(component.reserved_code(ReservedError::InvalidParam), 2);
        assert_eq!(component.reserved_code(ReservedError::CouldNotLoadLibrary), 8);
        assert_eq!(component.reserved_code(ReservedError::CouldNotFindLibraryExport), 7);

        let constants = component.error_constants();
        let mut codes: Vec<i32> = constants.iter().map(|(_, code)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), constants.len());
        assert!(constants.contains(&("GENERICEXCEPTION".to_string(), 6)));
        assert!(constants.contains(&("COULDNOTLOADLIBRARY".to_string(), 8)));
    }

    #[test]
    fn test_table_order() {
        let component = ComponentDefinition::new("Ex", "Ex", "ex")
            .with_class(Class::new("A").with_method(Method::new("One")))
            .with_class(Class::new("B").with_method(Method::new("Two")))
            .with_global_method(Method::new("Three"));
        let order: Vec<String> = component
            .methods_in_table_order()
            .iter()
            .map(|(scope, m)| format!("{}.{}", scope.owner(), m.method_name))
            .collect();
        assert_eq!(order, vec!["A.One", "B.Two", "Wrapper.Three"]);
    }
}
