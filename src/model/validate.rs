//! Generation-time validation
//!
//! Every check here runs before any text is rendered. The first violation
//! aborts the run with an error naming the offending class, method and
//! parameter (or struct and member).

use std::collections::HashSet;

use super::{
    Class, ComponentDefinition, FunctionType, Method, Param, ParamPass, ParamType, Scope, Struct,
    BASE_CLASS_NAME,
};
use crate::codegen::{CodeGenError, CodeGenResult};

/// Validate the whole component in declaration order
pub fn validate_component(component: &ComponentDefinition) -> CodeGenResult<()> {
    validate_error_codes(component)?;

    for s in &component.structs {
        validate_struct(component, s)?;
    }

    for function in &component.functions {
        validate_function_type(component, function)?;
    }

    for class in &component.classes {
        resolve_ancestors(component, class)?;
        for method in &class.methods {
            validate_method(component, Scope::Class(&class.class_name), method)?;
        }
    }

    for method in &component.global.methods {
        validate_method(component, Scope::Global, method)?;
    }

    if !component.global.release_method.is_empty() {
        validate_release_method(component)?;
    }

    Ok(())
}

/// Declared errors must not share a code; every one becomes a distinct
/// constant and a distinct `case` in the exception's name lookup
pub fn validate_error_codes(component: &ComponentDefinition) -> CodeGenResult<()> {
    for (index, error) in component.errors.iter().enumerate() {
        if let Some(earlier) = component.errors[..index]
            .iter()
            .find(|e| e.code == error.code)
        {
            return Err(CodeGenError::DuplicateErrorCode {
                first: earlier.name.clone(),
                second: error.name.clone(),
                code: error.code,
            });
        }
    }
    Ok(())
}

/// Structs may only hold scalar and enum members
pub fn validate_struct(component: &ComponentDefinition, s: &Struct) -> CodeGenResult<()> {
    let struct_name = format!("s{}{}", component.name_space, s.name);
    for member in &s.members {
        if !member.member_type.is_struct_member() {
            return Err(CodeGenError::InvalidStructMember {
                struct_name,
                member: member.name.clone(),
                member_type: member.member_type,
            });
        }
        if member.member_type == ParamType::Enum && component.find_enum(&member.class).is_none() {
            return Err(CodeGenError::UnknownReference {
                owner: struct_name,
                method: String::new(),
                param: member.name.clone(),
                kind: ParamType::Enum,
                name: member.class.clone(),
            });
        }
        if member.columns > 0 && member.rows == 0 {
            return Err(CodeGenError::GenerationFailed(format!(
                "member {} of struct {} declares columns without rows",
                member.name, struct_name
            )));
        }
    }
    Ok(())
}

/// Function types take "in"/"out" parameters with the same rules as methods
pub fn validate_function_type(
    component: &ComponentDefinition,
    function: &FunctionType,
) -> CodeGenResult<()> {
    for param in &function.params {
        if param.param_pass == ParamPass::Return {
            return Err(CodeGenError::InvalidPassing {
                owner: function.function_name.clone(),
                method: String::new(),
                param: param.param_name.clone(),
                param_type: param.param_type,
                pass: param.param_pass,
            });
        }
        validate_param(component, &function.function_name, "", param)?;
    }
    Ok(())
}

/// Check one method: parameter references, kind/direction combinations and
/// the placement of its `return` parameter
pub fn validate_method(
    component: &ComponentDefinition,
    scope: Scope<'_>,
    method: &Method,
) -> CodeGenResult<()> {
    let owner = scope.owner();
    let mut names = HashSet::new();

    for (index, param) in method.params.iter().enumerate() {
        if !names.insert(param.param_name.as_str()) {
            return Err(CodeGenError::GenerationFailed(format!(
                "duplicate parameter {} in {}.{}",
                param.param_name, owner, method.method_name
            )));
        }

        if param.param_pass == ParamPass::Return {
            if index + 1 != method.params.len() {
                return Err(CodeGenError::MisplacedReturn {
                    owner: owner.to_string(),
                    method: method.method_name.clone(),
                    param: param.param_name.clone(),
                });
            }
            if !param.param_type.supports_return() {
                return Err(CodeGenError::UnsupportedReturn {
                    owner: owner.to_string(),
                    method: method.method_name.clone(),
                    param: param.param_name.clone(),
                    param_type: param.param_type,
                });
            }
        }

        validate_param(component, owner, &method.method_name, param)?;
    }

    Ok(())
}

/// Check the `ParamClass` reference of a parameter and its passing mode
pub fn validate_param(
    component: &ComponentDefinition,
    owner: &str,
    method: &str,
    param: &Param,
) -> CodeGenResult<()> {
    let ty = param.param_type;

    if ty == ParamType::FunctionType && param.param_pass != ParamPass::In {
        return Err(CodeGenError::InvalidPassing {
            owner: owner.to_string(),
            method: method.to_string(),
            param: param.param_name.clone(),
            param_type: ty,
            pass: param.param_pass,
        });
    }

    if !ty.requires_class() {
        return Ok(());
    }

    if param.param_class.is_empty() {
        return Err(CodeGenError::MissingParamClass {
            owner: owner.to_string(),
            method: method.to_string(),
            param: param.param_name.clone(),
            param_type: ty,
        });
    }

    let name = param.param_class.as_str();
    let known = match ty {
        ParamType::Enum => component.find_enum(name).is_some(),
        ParamType::Struct | ParamType::StructArray => component.find_struct(name).is_some(),
        ParamType::Handle => component.is_handle_class(name),
        ParamType::FunctionType => component.find_function(name).is_some(),
        ParamType::BasicArray => ParamType::from_name(name).is_some_and(|t| t.is_scalar()),
        _ => true,
    };

    if known {
        Ok(())
    } else {
        Err(CodeGenError::UnknownReference {
            owner: owner.to_string(),
            method: method.to_string(),
            param: param.param_name.clone(),
            kind: ty,
            name: name.to_string(),
        })
    }
}

/// Resolve a class's ancestor chain, nearest parent first. The implicit root
/// is not part of the chain.
pub fn resolve_ancestors<'a>(
    component: &'a ComponentDefinition,
    class: &'a Class,
) -> CodeGenResult<Vec<&'a Class>> {
    let mut chain: Vec<&Class> = Vec::new();
    let mut current = class;

    while !current.parent_class.is_empty() && current.parent_class != BASE_CLASS_NAME {
        let parent = component.find_class(&current.parent_class).ok_or_else(|| {
            CodeGenError::UnknownParentClass {
                class: current.class_name.clone(),
                parent: current.parent_class.clone(),
            }
        })?;
        if parent.class_name == class.class_name
            || chain.iter().any(|c| c.class_name == parent.class_name)
        {
            return Err(CodeGenError::InheritanceCycle(class.class_name.clone()));
        }
        chain.push(parent);
        current = parent;
    }

    Ok(chain)
}

/// Classes ordered so every parent precedes its children; ties keep
/// declaration order
pub fn classes_parents_first(component: &ComponentDefinition) -> CodeGenResult<Vec<&Class>> {
    let mut ordered: Vec<&Class> = Vec::with_capacity(component.classes.len());
    let mut placed: HashSet<&str> = HashSet::new();

    for class in &component.classes {
        let mut lineage = resolve_ancestors(component, class)?;
        lineage.reverse();
        lineage.push(class);
        for c in lineage {
            if placed.insert(c.class_name.as_str()) {
                ordered.push(c);
            }
        }
    }

    Ok(ordered)
}

/// The configured release method must be a global method taking one handle
/// of the root class, since every wrapper destructor passes itself as the base
pub fn validate_release_method(component: &ComponentDefinition) -> CodeGenResult<&Method> {
    let name = &component.global.release_method;
    let method = component
        .find_global_method(name)
        .ok_or_else(|| CodeGenError::UnknownReleaseMethod(name.clone()))?;

    let invalid = |reason: String| CodeGenError::InvalidReleaseMethod {
        method: name.clone(),
        reason,
    };
    match method.params.as_slice() {
        [p] if p.param_type == ParamType::Handle && p.param_pass == ParamPass::In => {
            if p.param_class != BASE_CLASS_NAME {
                return Err(invalid(format!(
                    "handle parameter {} must have ParamClass {}, not {}",
                    p.param_name, BASE_CLASS_NAME, p.param_class
                )));
            }
        }
        _ => {
            return Err(invalid(
                "must take exactly one \"in\" handle parameter".to_string(),
            ))
        }
    }
    Ok(method)
}
