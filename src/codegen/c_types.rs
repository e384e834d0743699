//! Types Header Generator
//!
//! Renders `<base>_types.h`: the scalar typedef families, result and handle
//! types, version and error constants, one opaque alias per class, enums
//! with their union companions, packed structs and function-pointer types.
//! Every other artifact includes this header.

use super::common::{close_guard, include_guard, open_guard, write_banner, CodeGenOptions, IndentWriter};
use super::{BindingGenerator, CodeGenResult};
use crate::marshal::{self, naming};
use crate::model::{ComponentDefinition, Member, ParamType, BASE_CLASS_NAME};

/// Legacy spellings of the integer family, in `ParamType` order
const LEGACY_INTEGERS: [(ParamType, &str); 8] = [
    (ParamType::Uint8, "unsigned char"),
    (ParamType::Uint16, "unsigned short"),
    (ParamType::Uint32, "unsigned int"),
    (ParamType::Uint64, "unsigned long long"),
    (ParamType::Int8, "char"),
    (ParamType::Int16, "short"),
    (ParamType::Int32, "int"),
    (ParamType::Int64, "long long"),
];

/// Generator for the shared types header
pub struct TypesHeaderGenerator {
    writer: IndentWriter,
}

impl TypesHeaderGenerator {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            writer: IndentWriter::with_options(options),
        }
    }

    fn emit_scalars(&mut self, ns: &str) {
        let w = &mut self.writer;
        let switch = format!("{}_USELEGACYINTEGERTYPES", naming::macro_prefix(ns));

        w.write_section("Scalar types definition");
        w.writeln(&format!("#ifdef {}", switch));
        w.newline();
        for (ty, legacy) in LEGACY_INTEGERS {
            w.writeln(&format!("typedef {} {}_{};", legacy, ns, ty.name()));
        }
        w.newline();
        w.writeln(&format!("#else // {}", switch));
        w.newline();
        w.writeln("#include <stdint.h>");
        w.newline();
        for (ty, _) in LEGACY_INTEGERS {
            w.writeln(&format!("typedef {}_t {}_{};", ty.name(), ns, ty.name()));
        }
        w.newline();
        w.writeln(&format!("#endif // {}", switch));
        w.newline();
        w.writeln(&format!("typedef float {}_single;", ns));
        w.writeln(&format!("typedef double {}_double;", ns));
        w.newline();
        w.writeln("#ifndef __cplusplus");
        w.writeln("#include <stdbool.h>");
        w.writeln("#endif");
        w.newline();
    }

    fn emit_general(&mut self, component: &ComponentDefinition) {
        let ns = &component.name_space;
        let prefix = naming::macro_prefix(ns);
        let w = &mut self.writer;

        w.write_section("General type definitions");
        w.writeln(&format!("typedef {}_int32 {};", ns, naming::result_type(ns)));
        w.writeln(&format!("typedef void * {};", naming::handle_type(ns)));
        w.newline();

        w.write_section(&format!("Version for {}", ns));
        w.writeln(&format!("#define {}_VERSION_MAJOR {}", prefix, component.version.major));
        w.writeln(&format!("#define {}_VERSION_MINOR {}", prefix, component.version.minor));
        w.writeln(&format!("#define {}_VERSION_MICRO {}", prefix, component.version.micro));
        w.newline();

        w.write_section(&format!("Error constants for {}", ns));
        w.writeln(&format!("#define {} 0", naming::success_constant(ns)));
        for (name, code) in component.error_constants() {
            w.writeln(&format!("#define {} {}", naming::error_constant(ns, &name), code));
        }
        w.newline();
    }

    fn emit_handles(&mut self, component: &ComponentDefinition) {
        let ns = &component.name_space;
        let handle = naming::handle_type(ns);
        let w = &mut self.writer;

        w.write_section("Declaration of handle classes");
        w.writeln(&format!(
            "typedef {} {};",
            handle,
            naming::class_handle_type(ns, BASE_CLASS_NAME)
        ));
        for class in component
            .classes
            .iter()
            .filter(|c| c.class_name != BASE_CLASS_NAME)
        {
            w.writeln(&format!(
                "typedef {} {};",
                handle,
                naming::class_handle_type(ns, &class.class_name)
            ));
        }
        w.newline();
    }

    fn emit_enums(&mut self, component: &ComponentDefinition) {
        if component.enums.is_empty() {
            return;
        }
        let ns = &component.name_space;
        let w = &mut self.writer;

        w.write_section("Declaration of enums");
        for e in &component.enums {
            let name = naming::enum_type(ns, &e.name);
            w.writeln(&format!("typedef enum {} {{", name));
            w.indent();
            let last = e.options.len().saturating_sub(1);
            for (index, option) in e.options.iter().enumerate() {
                let separator = if index == last { "" } else { "," };
                w.writeln(&format!(
                    "{} = {}{}",
                    naming::enum_option(&e.name, &option.name),
                    option.value,
                    separator
                ));
            }
            w.dedent();
            w.writeln(&format!("}} {};", name));
            w.newline();
        }

        w.write_section("Declaration of enum members for 4 byte struct alignment");
        for e in &component.enums {
            w.writeln("typedef union {");
            w.indent();
            w.writeln(&format!("{} m_enum;", naming::enum_type(ns, &e.name)));
            w.writeln("int m_code;");
            w.dedent();
            w.writeln(&format!("}} {};", naming::enum_union_type(ns, &e.name)));
            w.newline();
        }
    }

    fn emit_structs(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        if component.structs.is_empty() {
            return Ok(());
        }
        let ns = &component.name_space;

        self.writer.write_section("Declaration of structs");
        self.writer.writeln("#pragma pack (1)");
        self.writer.newline();
        for s in &component.structs {
            self.writer.writeln("typedef struct {");
            self.writer.indent();
            for member in &s.members {
                let line = member_declaration(ns, member)?;
                self.writer.writeln(&line);
            }
            self.writer.dedent();
            self.writer
                .writeln(&format!("}} {};", naming::struct_type(ns, &s.name)));
            self.writer.newline();
        }
        self.writer.writeln("#pragma pack ()");
        self.writer.newline();
        Ok(())
    }

    fn emit_function_types(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        if component.functions.is_empty() {
            return Ok(());
        }
        let ns = &component.name_space;

        self.writer.write_section("Declaration of function types");
        for function in &component.functions {
            let params = marshal::expand_function_type(ns, function)?;

            let mut doc = vec![format!(
                "{} - {}",
                naming::function_type(ns, &function.function_name),
                function.function_description
            )];
            doc.push("*".to_string());
            doc.extend(params.iter().map(|p| p.doc_line()));
            self.writer.write_doc(&doc);

            let list = if params.is_empty() {
                "void".to_string()
            } else {
                marshal::render_params(&params)
            };
            self.writer.writeln(&format!(
                "typedef void(*{})({});",
                naming::function_type(ns, &function.function_name),
                list
            ));
            self.writer.newline();
        }
        Ok(())
    }
}

impl Default for TypesHeaderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// `type m_Name[extent];` for one struct member
fn member_declaration(ns: &str, member: &Member) -> CodeGenResult<String> {
    let c_type = if member.member_type == ParamType::Enum {
        naming::enum_union_type(ns, &member.class)
    } else {
        naming::scalar_type(ns, member.member_type).ok_or_else(|| {
            super::CodeGenError::GenerationFailed(format!(
                "no C type for member {} of type {}",
                member.name, member.member_type
            ))
        })?
    };

    let extent = match (member.rows, member.columns) {
        (0, _) => String::new(),
        (rows, 0) => format!("[{}]", rows),
        (rows, columns) => format!("[{}][{}]", columns, rows),
    };

    Ok(format!("{} m_{}{};", c_type, member.name, extent))
}

impl BindingGenerator for TypesHeaderGenerator {
    fn target_name(&self) -> &'static str {
        "C types"
    }

    fn file_name(&self, component: &ComponentDefinition) -> String {
        naming::types_header_file(&component.base_name)
    }

    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String> {
        self.writer.take_output();
        let guard = include_guard(&component.name_space, "TYPES_HEADER");

        write_banner(
            &mut self.writer,
            component,
            "This is an autogenerated plain C Header file with basic types",
        );
        open_guard(&mut self.writer, &guard);

        self.emit_scalars(&component.name_space);
        self.emit_general(component);
        self.emit_handles(component);
        self.emit_enums(component);
        self.emit_structs(component)?;
        self.emit_function_types(component)?;

        close_guard(&mut self.writer, &guard);
        Ok(self.writer.take_output())
    }
}
