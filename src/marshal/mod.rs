//! Marshaling Rule Engine
//!
//! Expands one declared parameter into the ordered list of physical ABI
//! parameters it occupies. The flat C header, the dynamic table typedefs and
//! the wrapper call sites are all rendered from [`expand`], so the three
//! surfaces cannot drift apart.
//!
//! # Rules
//!
//! ```text
//! kind            in                          out / return
//! ─────────────── ─────────────────────────── ──────────────────────────────────────
//! scalar, enum    T nX                        T* pX
//! struct          const S* pX                 S* pX
//! string          u32 nXBufferSize,           u32 nXBufferSize, u32* pXNeededChars,
//!                 const char* pXBuffer        char* pXBuffer
//! array           u64 nXBufferSize,           u64 nXBufferSize, u64* pXNeededCount,
//!                 const T* pXBuffer           T* pXBuffer          (no return)
//! handle          Ns_Class pX                 Ns_Class* pX
//! function type   NsFunc pX                   (rejected)
//! ```

pub mod naming;

use std::fmt;

use crate::codegen::{CodeGenError, CodeGenResult};
use crate::model::{FunctionType, Method, Param, ParamPass, ParamType, Scope, TypeCategory};

/// Physical direction of one ABI parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// What a physical parameter carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The value itself, or a const pointer to it
    Value,
    /// Capacity of a caller-provided buffer
    SizeIn,
    /// Receives the needed / written element count
    NeededOut,
    /// Caller-provided buffer, may be null when querying the size
    BufferOut,
    /// Receives a single value
    PointerOut,
}

/// One concrete ABI-level parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalParam {
    pub name: String,
    pub c_type: String,
    pub role: Role,
    pub direction: Direction,
    /// Doc text for the parameter comment
    pub description: String,
}

/// Where a parameter is declared, for diagnostics
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub owner: &'a str,
    pub method: &'a str,
}

impl PhysicalParam {
    fn new(
        name: String,
        c_type: String,
        role: Role,
        direction: Direction,
        description: String,
    ) -> Self {
        Self {
            name,
            c_type,
            role,
            direction,
            description,
        }
    }

    /// `type name` as it appears in a parameter list
    pub fn declaration(&self) -> String {
        format!("{} {}", self.c_type, self.name)
    }

    /// Doxygen line for this parameter
    pub fn doc_line(&self) -> String {
        format!("* @param[{}] {} - {}", self.direction, self.name, self.description)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => f.write_str("in"),
            Direction::Out => f.write_str("out"),
        }
    }
}

impl<'a> Site<'a> {
    pub fn new(owner: &'a str, method: &'a str) -> Self {
        Self { owner, method }
    }

    fn invalid_passing(&self, param: &Param) -> CodeGenError {
        CodeGenError::InvalidPassing {
            owner: self.owner.to_string(),
            method: self.method.to_string(),
            param: param.param_name.clone(),
            param_type: param.param_type,
            pass: param.param_pass,
        }
    }
}

/// C type of one element/value of `param`, before any pointer decoration
pub fn c_value_type(namespace: &str, param: &Param, site: Site<'_>) -> CodeGenResult<String> {
    let ty = param.param_type;
    if ty.requires_class() && param.param_class.is_empty() {
        return Err(CodeGenError::MissingParamClass {
            owner: site.owner.to_string(),
            method: site.method.to_string(),
            param: param.param_name.clone(),
            param_type: ty,
        });
    }

    let class = param.param_class.as_str();
    let c_type = match ty {
        ParamType::String => "char".to_string(),
        ParamType::Enum => naming::enum_type(namespace, class),
        ParamType::Struct | ParamType::StructArray => naming::struct_type(namespace, class),
        ParamType::Handle => naming::class_handle_type(namespace, class),
        ParamType::FunctionType => naming::function_type(namespace, class),
        ParamType::BasicArray => ParamType::from_name(class)
            .and_then(|element| naming::scalar_type(namespace, element))
            .ok_or_else(|| CodeGenError::UnknownReference {
                owner: site.owner.to_string(),
                method: site.method.to_string(),
                param: param.param_name.clone(),
                kind: ty,
                name: class.to_string(),
            })?,
        scalar => naming::scalar_type(namespace, scalar)
            .ok_or_else(|| CodeGenError::GenerationFailed(format!("no C type for {}", scalar)))?,
    };
    Ok(c_type)
}

/// Name prefix of a single-value "in" parameter
fn value_prefix(ty: ParamType) -> &'static str {
    match ty {
        ParamType::Bool => "b",
        ParamType::Single => "f",
        ParamType::Double => "d",
        ParamType::Enum => "e",
        t if t.is_integer() => "n",
        _ => "p",
    }
}

/// Expand one declared parameter into its physical ABI parameters
pub fn expand(namespace: &str, param: &Param, site: Site<'_>) -> CodeGenResult<Vec<PhysicalParam>> {
    let ty = param.param_type;
    let name = &param.param_name;
    let description = param.param_description.clone();
    let value_type = c_value_type(namespace, param, site)?;

    let params = match (param.param_pass, ty.category()) {
        (ParamPass::In, TypeCategory::Buffer) => {
            let size_type = buffer_size_type(namespace, ty);
            let what = if ty == ParamType::String {
                "Number of bytes in buffer"
            } else {
                "Number of elements in buffer"
            };
            vec![
                PhysicalParam::new(
                    format!("n{}BufferSize", name),
                    size_type,
                    Role::SizeIn,
                    Direction::In,
                    what.to_string(),
                ),
                PhysicalParam::new(
                    format!("p{}Buffer", name),
                    format!("const {}*", value_type),
                    Role::Value,
                    Direction::In,
                    buffer_description(param),
                ),
            ]
        }
        (ParamPass::In, TypeCategory::Compound) if ty == ParamType::Struct => {
            vec![PhysicalParam::new(
                format!("p{}", name),
                format!("const {}*", value_type),
                Role::Value,
                Direction::In,
                description,
            )]
        }
        (ParamPass::In, _) => vec![PhysicalParam::new(
            format!("{}{}", value_prefix(ty), name),
            value_type,
            Role::Value,
            Direction::In,
            description,
        )],
        (ParamPass::Return, TypeCategory::Buffer) if ty.is_array() => {
            return Err(CodeGenError::UnsupportedReturn {
                owner: site.owner.to_string(),
                method: site.method.to_string(),
                param: name.clone(),
                param_type: ty,
            });
        }
        (_, TypeCategory::Callback) => return Err(site.invalid_passing(param)),
        (_, TypeCategory::Buffer) => {
            let size_type = buffer_size_type(namespace, ty);
            let (needed_name, capacity_doc, needed_doc) = if ty == ParamType::String {
                (
                    format!("p{}NeededChars", name),
                    "size of the buffer (including trailing 0)",
                    "will be filled with the count of the written bytes, or needed buffer size.",
                )
            } else {
                (
                    format!("p{}NeededCount", name),
                    "Number of elements in buffer",
                    "will be filled with the count of the written elements, or needed buffer size.",
                )
            };
            let mut buffer_doc = buffer_description(param);
            if ty == ParamType::String {
                buffer_doc.push_str(", may be NULL");
            }
            vec![
                PhysicalParam::new(
                    format!("n{}BufferSize", name),
                    size_type.clone(),
                    Role::SizeIn,
                    Direction::In,
                    capacity_doc.to_string(),
                ),
                PhysicalParam::new(
                    needed_name,
                    format!("{}*", size_type),
                    Role::NeededOut,
                    Direction::Out,
                    needed_doc.to_string(),
                ),
                PhysicalParam::new(
                    format!("p{}Buffer", name),
                    format!("{}*", value_type),
                    Role::BufferOut,
                    Direction::Out,
                    buffer_doc,
                ),
            ]
        }
        (_, _) => vec![PhysicalParam::new(
            format!("p{}", name),
            format!("{}*", value_type),
            Role::PointerOut,
            Direction::Out,
            description,
        )],
    };

    Ok(params)
}

/// Capacity type: byte counts for strings, element counts for arrays
fn buffer_size_type(namespace: &str, ty: ParamType) -> String {
    if ty == ParamType::String {
        format!("{}_uint32", namespace)
    } else {
        format!("{}_uint64", namespace)
    }
}

fn buffer_description(param: &Param) -> String {
    let element = if param.param_type == ParamType::String {
        "char"
    } else {
        param.param_class.as_str()
    };
    format!("{} buffer of {}", element, param.param_description)
}

/// Implicit leading `this` parameter of a class method
pub fn instance_param(namespace: &str, class: &str) -> PhysicalParam {
    PhysicalParam::new(
        format!("p{}", class),
        naming::class_handle_type(namespace, class),
        Role::Value,
        Direction::In,
        format!("{} instance.", class),
    )
}

/// Physical parameter list of a method: the implicit instance handle (class
/// methods only) followed by every declared parameter's expansion, in order
pub fn expand_method(
    namespace: &str,
    scope: Scope<'_>,
    method: &Method,
) -> CodeGenResult<Vec<PhysicalParam>> {
    let site = Site::new(scope.owner(), &method.method_name);
    let mut params = Vec::new();
    if let Scope::Class(class) = scope {
        params.push(instance_param(namespace, class));
    }
    for param in &method.params {
        params.extend(expand(namespace, param, site)?);
    }
    Ok(params)
}

/// Physical parameter list of a function-pointer type
pub fn expand_function_type(
    namespace: &str,
    function: &FunctionType,
) -> CodeGenResult<Vec<PhysicalParam>> {
    let site = Site::new(&function.function_name, "");
    let mut params = Vec::new();
    for param in &function.params {
        params.extend(expand(namespace, param, site)?);
    }
    Ok(params)
}

/// Comma-joined declarations for a parameter list
pub fn render_params(params: &[PhysicalParam]) -> String {
    params
        .iter()
        .map(PhysicalParam::declaration)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Wrapper-layer naming
// ============================================================================

/// Locals the wrapper declares for a two-call parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLocals {
    /// Receives the size from the query call
    pub needed: String,
    /// Receives the written count from the real call
    pub written: String,
    /// Receiving buffer (strings only; arrays fill the caller's vector)
    pub buffer: String,
    /// C type of the counters
    pub counter_type: String,
}

/// Two-call locals for a buffer-bearing output parameter
pub fn buffer_locals(namespace: &str, param: &Param) -> Option<BufferLocals> {
    if !param.param_type.uses_two_call(param.param_pass) {
        return None;
    }
    let name = &param.param_name;
    let counter_type = buffer_size_type(namespace, param.param_type);
    let locals = if param.param_type == ParamType::String {
        BufferLocals {
            needed: format!("bytesNeeded{}", name),
            written: format!("bytesWritten{}", name),
            buffer: format!("buffer{}", name),
            counter_type,
        }
    } else {
        BufferLocals {
            needed: format!("elementsNeeded{}", name),
            written: format!("elementsWritten{}", name),
            buffer: cpp_variable_name(param),
            counter_type,
        }
    };
    Some(locals)
}

/// Local receiving a raw handle before it is wrapped
pub fn handle_local(param: &Param) -> String {
    format!("h{}", param.param_name)
}

/// Local receiving a returned scalar/enum/struct
pub fn result_local(param: &Param) -> String {
    format!("result{}", param.param_name)
}

/// Wrapper-layer variable name of a declared parameter
pub fn cpp_variable_name(param: &Param) -> String {
    let name = &param.param_name;
    match param.param_type {
        ParamType::String => format!("s{}", name),
        ParamType::BasicArray | ParamType::StructArray => format!("{}Buffer", name),
        ParamType::Struct => name.clone(),
        ty => format!("{}{}", value_prefix(ty), name),
    }
}

/// Wrapper-layer type of a declared parameter. Handles are raw instance
/// pointers when passed in and owning shared pointers when received.
pub fn cpp_param_type(namespace: &str, param: &Param, site: Site<'_>) -> CodeGenResult<String> {
    let class = param.param_class.as_str();
    let cpp_type = match param.param_type {
        ParamType::String => "std::string".to_string(),
        ParamType::BasicArray | ParamType::StructArray => {
            format!("std::vector<{}>", c_value_type(namespace, param, site)?)
        }
        ParamType::Handle if param.param_pass == ParamPass::In => {
            format!("{} *", naming::cpp_class(namespace, class))
        }
        ParamType::Handle => naming::cpp_ptr(namespace, class),
        _ => c_value_type(namespace, param, site)?,
    };
    Ok(cpp_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site<'static> {
        Site::new("Widget", "Test")
    }

    fn decls(params: &[PhysicalParam]) -> Vec<String> {
        params.iter().map(PhysicalParam::declaration).collect()
    }

    #[test]
    fn test_scalar_in_by_value() {
        let p = expand("Ex", &Param::new("Count", ParamType::Uint32, ParamPass::In), site()).unwrap();
        assert_eq!(decls(&p), vec!["Ex_uint32 nCount"]);
        assert_eq!(p[0].role, Role::Value);

        let p = expand("Ex", &Param::new("Flag", ParamType::Bool, ParamPass::In), site()).unwrap();
        assert_eq!(decls(&p), vec!["bool bFlag"]);
    }

    #[test]
    fn test_scalar_out_by_pointer() {
        let p = expand("Ex", &Param::new("Value", ParamType::Double, ParamPass::Out), site()).unwrap();
        assert_eq!(decls(&p), vec!["Ex_double* pValue"]);
        assert_eq!(p[0].role, Role::PointerOut);
        assert_eq!(p[0].direction, Direction::Out);
    }

    #[test]
    fn test_struct_in_const_pointer() {
        let param = Param::new("Origin", ParamType::Struct, ParamPass::In).with_class("Point");
        let p = expand("Ex", &param, site()).unwrap();
        assert_eq!(decls(&p), vec!["const sExPoint* pOrigin"]);
    }

    #[test]
    fn test_enum_out() {
        let param = Param::new("Color", ParamType::Enum, ParamPass::Return).with_class("Color");
        let p = expand("Ex", &param, site()).unwrap();
        assert_eq!(decls(&p), vec!["eExColor* pColor"]);
    }

    #[test]
    fn test_string_in_count_precedes_pointer() {
        let p = expand("Ex", &Param::new("Path", ParamType::String, ParamPass::In), site()).unwrap();
        assert_eq!(decls(&p), vec!["Ex_uint32 nPathBufferSize", "const char* pPathBuffer"]);
        assert_eq!(p[0].role, Role::SizeIn);
        assert_eq!(p[1].role, Role::Value);
    }

    #[test]
    fn test_string_out_three_params() {
        let p = expand("Ex", &Param::new("Name", ParamType::String, ParamPass::Out), site()).unwrap();
        assert_eq!(
            decls(&p),
            vec![
                "Ex_uint32 nNameBufferSize",
                "Ex_uint32* pNameNeededChars",
                "char* pNameBuffer"
            ]
        );
        let roles: Vec<Role> = p.iter().map(|x| x.role).collect();
        assert_eq!(roles, vec![Role::SizeIn, Role::NeededOut, Role::BufferOut]);
        assert_eq!(p[0].direction, Direction::In);
    }

    #[test]
    fn test_array_out_uses_element_counts() {
        let param = Param::new("Factors", ParamType::StructArray, ParamPass::Out).with_class("Factor");
        let p = expand("Ex", &param, site()).unwrap();
        assert_eq!(
            decls(&p),
            vec![
                "Ex_uint64 nFactorsBufferSize",
                "Ex_uint64* pFactorsNeededCount",
                "sExFactor* pFactorsBuffer"
            ]
        );
    }

    #[test]
    fn test_basicarray_in() {
        let param = Param::new("Values", ParamType::BasicArray, ParamPass::In).with_class("int16");
        let p = expand("Ex", &param, site()).unwrap();
        assert_eq!(decls(&p), vec!["Ex_uint64 nValuesBufferSize", "const Ex_int16* pValuesBuffer"]);
    }

    #[test]
    fn test_handle_in_and_out() {
        let param = Param::new("Other", ParamType::Handle, ParamPass::In).with_class("Widget");
        assert_eq!(decls(&expand("Ex", &param, site()).unwrap()), vec!["Ex_Widget pOther"]);
        let param = Param::new("Other", ParamType::Handle, ParamPass::Return).with_class("Widget");
        assert_eq!(decls(&expand("Ex", &param, site()).unwrap()), vec!["Ex_Widget* pOther"]);
    }

    #[test]
    fn test_function_type_in_only() {
        let param = Param::new("Progress", ParamType::FunctionType, ParamPass::In).with_class("ProgressCallback");
        assert_eq!(
            decls(&expand("Ex", &param, site()).unwrap()),
            vec!["ExProgressCallback pProgress"]
        );
        let param = Param::new("Progress", ParamType::FunctionType, ParamPass::Out).with_class("ProgressCallback");
        let err = expand("Ex", &param, site()).unwrap_err();
        assert!(err.to_string().contains("Widget.Test"));
        assert!(err.to_string().contains("Progress"));
    }

    #[test]
    fn test_array_return_fails() {
        let param = Param::new("Values", ParamType::BasicArray, ParamPass::Return).with_class("uint8");
        assert!(matches!(
            expand("Ex", &param, site()),
            Err(CodeGenError::UnsupportedReturn { .. })
        ));
    }

    #[test]
    fn test_missing_class_fails() {
        let param = Param::new("Color", ParamType::Enum, ParamPass::In);
        assert!(matches!(
            expand("Ex", &param, site()),
            Err(CodeGenError::MissingParamClass { .. })
        ));
    }

    #[test]
    fn test_expand_method_prefixes_instance() {
        let method = Method::new("GetName").with_param(Param::new("Name", ParamType::String, ParamPass::Out));
        let params = expand_method("Ex", Scope::Class("Widget"), &method).unwrap();
        assert_eq!(
            render_params(&params),
            "Ex_Widget pWidget, Ex_uint32 nNameBufferSize, Ex_uint32* pNameNeededChars, char* pNameBuffer"
        );
        let global = expand_method("Ex", Scope::Global, &method).unwrap();
        assert_eq!(global.len(), 3);
    }

    #[test]
    fn test_buffer_locals() {
        let string = Param::new("Name", ParamType::String, ParamPass::Out);
        let locals = buffer_locals("Ex", &string).unwrap();
        assert_eq!(locals.needed, "bytesNeededName");
        assert_eq!(locals.written, "bytesWrittenName");
        assert_eq!(locals.buffer, "bufferName");
        assert_eq!(locals.counter_type, "Ex_uint32");

        let array = Param::new("Values", ParamType::BasicArray, ParamPass::Out).with_class("uint8");
        let locals = buffer_locals("Ex", &array).unwrap();
        assert_eq!(locals.needed, "elementsNeededValues");
        assert_eq!(locals.buffer, "ValuesBuffer");
        assert_eq!(locals.counter_type, "Ex_uint64");

        assert!(buffer_locals("Ex", &Param::new("Path", ParamType::String, ParamPass::In)).is_none());
    }

    #[test]
    fn test_cpp_param_types() {
        let handle_in = Param::new("Other", ParamType::Handle, ParamPass::In).with_class("Widget");
        assert_eq!(cpp_param_type("Ex", &handle_in, site()).unwrap(), "CExWidget *");
        let handle_out = Param::new("Other", ParamType::Handle, ParamPass::Out).with_class("Widget");
        assert_eq!(cpp_param_type("Ex", &handle_out, site()).unwrap(), "PExWidget");
        let array = Param::new("Values", ParamType::BasicArray, ParamPass::Out).with_class("uint8");
        assert_eq!(cpp_param_type("Ex", &array, site()).unwrap(), "std::vector<Ex_uint8>");
        let string = Param::new("Name", ParamType::String, ParamPass::In);
        assert_eq!(cpp_param_type("Ex", &string, site()).unwrap(), "std::string");
        assert_eq!(cpp_variable_name(&string), "sName");
    }
}
