//! ABI naming formulas
//!
//! Every symbol and type name the generated surfaces agree on is derived here
//! as a pure function of model strings. The dynamic table resolves exports by
//! the exact strings [`export_name`] returns.

use crate::model::{Method, ParamType, Scope};

/// Flat ABI export: `lower(ns)_[lower(class)_]lower(method)<suffix>`
pub fn export_name(namespace: &str, scope: Scope<'_>, method: &Method) -> String {
    match scope {
        Scope::Class(class) => format!(
            "{}_{}_{}{}",
            namespace.to_lowercase(),
            class.to_lowercase(),
            method.method_name.to_lowercase(),
            method.dll_suffix
        ),
        Scope::Global => format!(
            "{}_{}{}",
            namespace.to_lowercase(),
            method.method_name.to_lowercase(),
            method.dll_suffix
        ),
    }
}

/// Field of the dynamic table holding a method's function pointer
pub fn table_field(scope: Scope<'_>, method: &Method) -> String {
    match scope {
        Scope::Class(class) => format!("m_{}_{}", class, method.method_name),
        Scope::Global => format!("m_{}", method.method_name),
    }
}

/// Function-pointer typedef of a method in the dynamic header
pub fn fn_ptr_typedef(namespace: &str, scope: Scope<'_>, method: &Method) -> String {
    match scope {
        Scope::Class(class) => format!("P{}{}_{}Ptr", namespace, class, method.method_name),
        Scope::Global => format!("P{}{}Ptr", namespace, method.method_name),
    }
}

/// Upper-cased namespace used for macros and constants
pub fn macro_prefix(namespace: &str) -> String {
    namespace.to_uppercase()
}

pub fn result_type(namespace: &str) -> String {
    format!("{}Result", namespace)
}

pub fn handle_type(namespace: &str) -> String {
    format!("{}Handle", namespace)
}

/// Opaque alias of one class (`Ex_Widget`)
pub fn class_handle_type(namespace: &str, class: &str) -> String {
    format!("{}_{}", namespace, class)
}

pub fn enum_type(namespace: &str, name: &str) -> String {
    format!("e{}{}", namespace, name)
}

/// Enum option constant (`eColorRed`)
pub fn enum_option(enum_name: &str, option: &str) -> String {
    format!("e{}{}", enum_name, option)
}

/// 4-byte union companion of an enum for struct embedding
pub fn enum_union_type(namespace: &str, name: &str) -> String {
    format!("structEnum{}{}", namespace, name)
}

pub fn struct_type(namespace: &str, name: &str) -> String {
    format!("s{}{}", namespace, name)
}

pub fn function_type(namespace: &str, name: &str) -> String {
    format!("{}{}", namespace, name)
}

/// C spelling of a scalar (`Ex_uint32`, `bool`, `Ex_double`)
pub fn scalar_type(namespace: &str, ty: ParamType) -> Option<String> {
    match ty {
        ParamType::Bool => Some("bool".to_string()),
        t if t.is_scalar() => Some(format!("{}_{}", namespace, t.name())),
        _ => None,
    }
}

pub fn success_constant(namespace: &str) -> String {
    format!("{}_SUCCESS", macro_prefix(namespace))
}

pub fn error_constant(namespace: &str, name: &str) -> String {
    format!("{}_ERROR_{}", macro_prefix(namespace), name.to_uppercase())
}

pub fn table_type(namespace: &str) -> String {
    format!("s{}DynamicWrapperTable", namespace)
}

pub fn init_table_fn(namespace: &str) -> String {
    format!("Init{}WrapperTable", namespace)
}

pub fn release_table_fn(namespace: &str) -> String {
    format!("Release{}WrapperTable", namespace)
}

pub fn load_table_fn(namespace: &str) -> String {
    format!("Load{}WrapperTable", namespace)
}

/// Wrapper-layer class (`CExWidget`, `CExBaseClass`, `CExWrapper`)
pub fn cpp_class(namespace: &str, class: &str) -> String {
    format!("C{}{}", namespace, class)
}

/// Shared-pointer alias of a wrapper-layer class
pub fn cpp_ptr(namespace: &str, class: &str) -> String {
    format!("P{}{}", namespace, class)
}

pub fn cpp_wrapper(namespace: &str) -> String {
    cpp_class(namespace, "Wrapper")
}

pub fn cpp_exception(namespace: &str) -> String {
    format!("E{}Exception", namespace)
}

/// Artifact file names, keyed by the component base name
pub fn types_header_file(base_name: &str) -> String {
    format!("{}_types.h", base_name)
}

pub fn c_header_file(base_name: &str) -> String {
    format!("{}.h", base_name)
}

pub fn dynamic_header_file(base_name: &str) -> String {
    format!("{}_dynamic.h", base_name)
}

pub fn dynamic_impl_file(base_name: &str) -> String {
    format!("{}_dynamic.cc", base_name)
}

pub fn cpp_wrapper_file(base_name: &str) -> String {
    format!("{}_dynamic.hpp", base_name)
}
