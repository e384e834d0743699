//! Parameter Type System
//!
//! The closed vocabulary of parameter kinds and passing directions, plus the
//! classification every emitter consults to decide a type's physical shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared kind of a method parameter or struct member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Bool,
    /// 32-bit floating point
    Single,
    /// 64-bit floating point
    Double,
    String,
    Enum,
    Struct,
    /// Opaque pointer to a library-side class instance
    Handle,
    /// Variable-length array of a scalar element type
    BasicArray,
    /// Variable-length array of a declared struct
    StructArray,
    /// Named function-pointer type (callback)
    FunctionType,
}

/// How a parameter travels across the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamPass {
    In,
    Out,
    Return,
}

/// Shape classes that drive marshaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    /// Fixed width, pass-by-value when "in"
    Scalar,
    /// Variable length; two-call protocol when "out" or "return"
    Buffer,
    /// Opaque pointer; ownership handled by the wrapper layer
    Handle,
    /// Struct or enum value
    Compound,
    /// Function-pointer type, "in" only
    Callback,
}

impl ParamType {
    pub const ALL: [ParamType; 18] = [
        ParamType::Uint8,
        ParamType::Uint16,
        ParamType::Uint32,
        ParamType::Uint64,
        ParamType::Int8,
        ParamType::Int16,
        ParamType::Int32,
        ParamType::Int64,
        ParamType::Bool,
        ParamType::Single,
        ParamType::Double,
        ParamType::String,
        ParamType::Enum,
        ParamType::Struct,
        ParamType::Handle,
        ParamType::BasicArray,
        ParamType::StructArray,
        ParamType::FunctionType,
    ];

    /// Classify this type. Single source of truth for every emitter.
    pub fn category(&self) -> TypeCategory {
        match self {
            ParamType::Uint8
            | ParamType::Uint16
            | ParamType::Uint32
            | ParamType::Uint64
            | ParamType::Int8
            | ParamType::Int16
            | ParamType::Int32
            | ParamType::Int64
            | ParamType::Bool
            | ParamType::Single
            | ParamType::Double => TypeCategory::Scalar,
            ParamType::String | ParamType::BasicArray | ParamType::StructArray => {
                TypeCategory::Buffer
            }
            ParamType::Handle => TypeCategory::Handle,
            ParamType::Enum | ParamType::Struct => TypeCategory::Compound,
            ParamType::FunctionType => TypeCategory::Callback,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.category() == TypeCategory::Scalar
    }

    /// Check if this type is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ParamType::Uint8
                | ParamType::Uint16
                | ParamType::Uint32
                | ParamType::Uint64
                | ParamType::Int8
                | ParamType::Int16
                | ParamType::Int32
                | ParamType::Int64
        )
    }

    pub fn is_buffer(&self) -> bool {
        self.category() == TypeCategory::Buffer
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ParamType::BasicArray | ParamType::StructArray)
    }

    pub fn is_handle(&self) -> bool {
        self.category() == TypeCategory::Handle
    }

    /// Kinds that name another declaration through `ParamClass`
    pub fn requires_class(&self) -> bool {
        matches!(
            self,
            ParamType::Enum
                | ParamType::Struct
                | ParamType::Handle
                | ParamType::BasicArray
                | ParamType::StructArray
                | ParamType::FunctionType
        )
    }

    /// Whether a `return`-passed parameter may have this kind
    pub fn supports_return(&self) -> bool {
        !self.is_array() && *self != ParamType::FunctionType
    }

    /// Whether a struct may embed a member of this kind
    pub fn is_struct_member(&self) -> bool {
        self.is_scalar() || *self == ParamType::Enum
    }

    /// Whether passing this type as `pass` uses the two-call idiom
    pub fn uses_two_call(&self, pass: ParamPass) -> bool {
        self.is_buffer() && pass.is_output()
    }

    /// The model spelling of the type (`"uint8"`, `"basicarray"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Uint8 => "uint8",
            ParamType::Uint16 => "uint16",
            ParamType::Uint32 => "uint32",
            ParamType::Uint64 => "uint64",
            ParamType::Int8 => "int8",
            ParamType::Int16 => "int16",
            ParamType::Int32 => "int32",
            ParamType::Int64 => "int64",
            ParamType::Bool => "bool",
            ParamType::Single => "single",
            ParamType::Double => "double",
            ParamType::String => "string",
            ParamType::Enum => "enum",
            ParamType::Struct => "struct",
            ParamType::Handle => "handle",
            ParamType::BasicArray => "basicarray",
            ParamType::StructArray => "structarray",
            ParamType::FunctionType => "functiontype",
        }
    }

    /// Parse from the model spelling
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.name() == s)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ParamPass {
    pub fn is_output(&self) -> bool {
        !matches!(self, ParamPass::In)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamPass::In => "in",
            ParamPass::Out => "out",
            ParamPass::Return => "return",
        }
    }
}

impl fmt::Display for ParamPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category() {
        assert_eq!(ParamType::Uint32.category(), TypeCategory::Scalar);
        assert_eq!(ParamType::Bool.category(), TypeCategory::Scalar);
        assert_eq!(ParamType::String.category(), TypeCategory::Buffer);
        assert_eq!(ParamType::StructArray.category(), TypeCategory::Buffer);
        assert_eq!(ParamType::Handle.category(), TypeCategory::Handle);
        assert_eq!(ParamType::Enum.category(), TypeCategory::Compound);
        assert_eq!(ParamType::FunctionType.category(), TypeCategory::Callback);
    }

    #[test]
    fn test_two_call_only_for_outputs() {
        assert!(ParamType::String.uses_two_call(ParamPass::Out));
        assert!(ParamType::String.uses_two_call(ParamPass::Return));
        assert!(!ParamType::String.uses_two_call(ParamPass::In));
        assert!(ParamType::BasicArray.uses_two_call(ParamPass::Out));
        assert!(!ParamType::Handle.uses_two_call(ParamPass::Out));
    }

    #[test]
    fn test_return_support() {
        assert!(ParamType::Handle.supports_return());
        assert!(ParamType::String.supports_return());
        assert!(!ParamType::BasicArray.supports_return());
        assert!(!ParamType::StructArray.supports_return());
        assert!(!ParamType::FunctionType.supports_return());
    }

    #[test]
    fn test_name_parsing() {
        for ty in ParamType::ALL {
            assert_eq!(ParamType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ParamType::from_name("float"), None);
    }

    #[test]
    fn test_serde_spelling() {
        let ty: ParamType = serde_json::from_str("\"basicarray\"").unwrap();
        assert_eq!(ty, ParamType::BasicArray);
        let pass: ParamPass = serde_json::from_str("\"return\"").unwrap();
        assert_eq!(pass, ParamPass::Return);
        assert!(serde_json::from_str::<ParamPass>("\"inout\"").is_err());
    }
}
