//! Flat C Header Generator
//!
//! Renders `<base>.h`: one exported declaration per class method and per
//! global method. Each parameter list is exactly [`marshal::expand_method`]'s
//! output, so the declarations agree with the dynamic table typedefs and the
//! wrapper call sites by construction.

use super::common::{
    close_extern_c, close_guard, include_guard, open_extern_c, open_guard, write_banner,
    CodeGenOptions, IndentWriter,
};
use super::{BindingGenerator, CodeGenResult};
use crate::marshal::{self, naming, PhysicalParam};
use crate::model::{ComponentDefinition, Method, Scope};

/// Generator for the flat C-ABI header
pub struct CHeaderGenerator {
    writer: IndentWriter,
}

impl CHeaderGenerator {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            writer: IndentWriter::with_options(options),
        }
    }

    fn emit_declspec(&mut self, ns: &str) {
        let prefix = naming::macro_prefix(ns);
        let declspec = format!("{}_DECLSPEC", prefix);
        let exports = format!("__{}_EXPORTS", prefix);
        let w = &mut self.writer;

        w.writeln(&format!("#ifdef {}", exports));
        w.writeln("#ifdef _WIN32");
        w.writeln(&format!("#define {} __declspec (dllexport)", declspec));
        w.writeln("#else // _WIN32");
        w.writeln(&format!(
            "#define {} __attribute__((visibility(\"default\")))",
            declspec
        ));
        w.writeln("#endif // _WIN32");
        w.writeln(&format!("#else // {}", exports));
        w.writeln("#ifdef _WIN32");
        w.writeln(&format!("#define {} __declspec (dllimport)", declspec));
        w.writeln("#else // _WIN32");
        w.writeln(&format!("#define {}", declspec));
        w.writeln("#endif // _WIN32");
        w.writeln(&format!("#endif // {}", exports));
        w.newline();
    }

    fn emit_method(&mut self, ns: &str, scope: Scope<'_>, method: &Method) -> CodeGenResult<()> {
        let params = marshal::expand_method(ns, scope, method)?;
        self.writer.write_doc(&method_doc(method, &params));
        self.writer.writeln(&format!(
            "{}_DECLSPEC {} {}({});",
            naming::macro_prefix(ns),
            naming::result_type(ns),
            naming::export_name(ns, scope, method),
            marshal::render_params(&params)
        ));
        self.writer.newline();
        Ok(())
    }
}

impl Default for CHeaderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Doxygen lines for a flat method: description, one entry per physical
/// parameter, and the result code
pub(crate) fn method_doc(method: &Method, params: &[PhysicalParam]) -> Vec<String> {
    let mut doc = Vec::with_capacity(params.len() + 3);
    doc.push(method.method_description.clone());
    doc.push("*".to_string());
    doc.extend(params.iter().map(PhysicalParam::doc_line));
    doc.push("* @return error code or 0 (success)".to_string());
    doc
}

impl BindingGenerator for CHeaderGenerator {
    fn target_name(&self) -> &'static str {
        "C header"
    }

    fn file_name(&self, component: &ComponentDefinition) -> String {
        naming::c_header_file(&component.base_name)
    }

    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String> {
        self.writer.take_output();
        let ns = component.name_space.as_str();
        let guard = include_guard(ns, "HEADER");

        write_banner(
            &mut self.writer,
            component,
            "This is an autogenerated plain C Header file",
        );
        open_guard(&mut self.writer, &guard);
        self.emit_declspec(ns);
        self.writer.writeln(&format!(
            "#include \"{}\"",
            naming::types_header_file(&component.base_name)
        ));
        self.writer.newline();
        open_extern_c(&mut self.writer);

        for class in &component.classes {
            self.writer
                .write_section(&format!("Class definition for {}", class.class_name));
            for method in &class.methods {
                self.emit_method(ns, Scope::Class(&class.class_name), method)?;
            }
        }

        self.writer.write_section("Global functions");
        for method in &component.global.methods {
            self.emit_method(ns, Scope::Global, method)?;
        }

        close_extern_c(&mut self.writer);
        close_guard(&mut self.writer, &guard);
        Ok(self.writer.take_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Param, ParamPass, ParamType};

    fn component() -> ComponentDefinition {
        ComponentDefinition::new("Ex", "Example Library", "ex")
            .with_class(
                Class::new("Widget").with_method(
                    Method::new("GetName")
                        .with_description("Returns the widget name.")
                        .with_param(
                            Param::new("Name", ParamType::String, ParamPass::Out)
                                .with_description("the name"),
                        ),
                ),
            )
            .with_global_method(
                Method::new("CreateWidget").with_suffix("_V2").with_param(
                    Param::new("Instance", ParamType::Handle, ParamPass::Return).with_class("Widget"),
                ),
            )
    }

    #[test]
    fn test_end_to_end_declaration() {
        let code = CHeaderGenerator::new().generate(&component()).unwrap();
        assert!(code.contains(
            "EX_DECLSPEC ExResult ex_widget_getname(Ex_Widget pWidget, Ex_uint32 nNameBufferSize, Ex_uint32* pNameNeededChars, char* pNameBuffer);"
        ));
    }

    #[test]
    fn test_global_method_with_suffix() {
        let code = CHeaderGenerator::new().generate(&component()).unwrap();
        assert!(code.contains("ExResult ex_createwidget_V2(Ex_Widget* pInstance);"));
    }

    #[test]
    fn test_declspec_and_linkage() {
        let code = CHeaderGenerator::new().generate(&component()).unwrap();
        assert!(code.contains("#ifdef __EX_EXPORTS"));
        assert!(code.contains("#define EX_DECLSPEC __declspec (dllexport)"));
        assert!(code.contains("extern \"C\" {"));
        assert!(code.contains("#include \"ex_types.h\""));
    }

    #[test]
    fn test_parameter_docs() {
        let code = CHeaderGenerator::new().generate(&component()).unwrap();
        assert!(code.contains("* Returns the widget name."));
        assert!(code.contains("* @param[in] pWidget - Widget instance."));
        assert!(code.contains("* @param[out] pNameNeededChars"));
        assert!(code.contains("* @return error code or 0 (success)"));
    }

    #[test]
    fn test_comments_disabled() {
        let options = CodeGenOptions {
            emit_comments: false,
            ..CodeGenOptions::default()
        };
        let code = CHeaderGenerator::with_options(options)
            .generate(&component())
            .unwrap();
        assert!(!code.contains("@param"));
        assert!(code.contains("ex_widget_getname("));
    }
}
