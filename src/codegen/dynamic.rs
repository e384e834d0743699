//! Dynamic Table Builder
//!
//! Renders `<base>_dynamic.h` (one function-pointer typedef per method, the
//! table struct, Init/Release/Load prototypes) and `<base>_dynamic.cc` (the
//! three procedures over `LoadLibraryA`/`dlopen`).
//!
//! # Load ordering
//!
//! ```text
//! null table / null path      -> INVALIDPARAM
//! library fails to open       -> COULDNOTLOADLIBRARY
//! resolve every export        -> on first miss: close library, Init, COULDNOTFINDLIBRARYEXPORT
//! store library handle last   -> SUCCESS
//! ```
//!
//! The procedure bodies are shared with the wrapper header, which inlines its
//! own copies under different names.

use super::c_header::method_doc;
use super::common::{
    close_extern_c, close_guard, include_guard, open_extern_c, open_guard, write_banner,
    CodeGenOptions, IndentWriter,
};
use super::{BindingGenerator, CodeGenResult};
use crate::marshal::{self, naming};
use crate::model::{ComponentDefinition, ReservedError, Scope};

/// Name of the library-handle field of the table
pub const LIBRARY_HANDLE_FIELD: &str = "m_LibraryHandle";

/// Generator for the dynamic table header
pub struct DynamicHeaderGenerator {
    writer: IndentWriter,
}

/// Generator for the dynamic table implementation
pub struct DynamicImplGenerator {
    writer: IndentWriter,
}

impl DynamicHeaderGenerator {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            writer: IndentWriter::with_options(options),
        }
    }

    fn emit_typedefs(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        let ns = component.name_space.as_str();
        let mut current: Option<Scope<'_>> = None;

        for (scope, method) in component.methods_in_table_order() {
            if current != Some(scope) {
                let title = match scope {
                    Scope::Class(class) => format!("Class definition for {}", class),
                    Scope::Global => "Global functions".to_string(),
                };
                self.writer.write_section(&title);
                current = Some(scope);
            }

            let params = marshal::expand_method(ns, scope, method)?;
            self.writer.write_doc(&method_doc(method, &params));
            self.writer.writeln(&format!(
                "typedef {} (*{}) ({});",
                naming::result_type(ns),
                naming::fn_ptr_typedef(ns, scope, method),
                marshal::render_params(&params)
            ));
            self.writer.newline();
        }
        Ok(())
    }

    fn emit_table(&mut self, component: &ComponentDefinition) {
        let ns = component.name_space.as_str();
        let w = &mut self.writer;

        w.write_section("Function Table Structure");
        w.writeln("typedef struct {");
        w.indent();
        w.writeln(&format!("void * {};", LIBRARY_HANDLE_FIELD));
        for (scope, method) in component.methods_in_table_order() {
            w.writeln(&format!(
                "{} {};",
                naming::fn_ptr_typedef(ns, scope, method),
                naming::table_field(scope, method)
            ));
        }
        w.dedent();
        w.writeln(&format!("}} {};", naming::table_type(ns)));
        w.newline();
    }

    fn emit_prototypes(&mut self, ns: &str) {
        let table = naming::table_type(ns);
        let result = naming::result_type(ns);
        let w = &mut self.writer;

        w.write_section("Load DLL dynamically");
        open_extern_c(w);
        w.writeln(&format!(
            "{} {}({} * pWrapperTable);",
            result,
            naming::init_table_fn(ns),
            table
        ));
        w.newline();
        w.writeln(&format!(
            "{} {}({} * pWrapperTable);",
            result,
            naming::release_table_fn(ns),
            table
        ));
        w.newline();
        w.writeln(&format!(
            "{} {}({} * pWrapperTable, const char * pLibraryFileName);",
            result,
            naming::load_table_fn(ns),
            table
        ));
        w.newline();
        close_extern_c(w);
    }
}

impl DynamicImplGenerator {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            writer: IndentWriter::with_options(options),
        }
    }
}

impl Default for DynamicHeaderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DynamicImplGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Portable load/resolve/free macros used by the procedure bodies
pub(crate) fn write_platform_macros(w: &mut IndentWriter, ns: &str) {
    let prefix = naming::macro_prefix(ns);
    let guard = format!("__{}_DYNAMICLOADING", prefix);

    w.writeln(&format!("#ifndef {}", guard));
    w.writeln(&format!("#define {}", guard));
    w.newline();
    w.writeln("#ifdef _WIN32");
    w.writeln("#include <windows.h>");
    w.writeln(&format!(
        "#define {}_LOADLIBRARY(pFileName) ((void *) LoadLibraryA(pFileName))",
        prefix
    ));
    w.writeln(&format!(
        "#define {}_GETSYMBOL(hLibrary, pName) ((void *) GetProcAddress((HMODULE) (hLibrary), pName))",
        prefix
    ));
    w.writeln(&format!(
        "#define {}_FREELIBRARY(hLibrary) FreeLibrary((HMODULE) (hLibrary))",
        prefix
    ));
    w.writeln("#else // _WIN32");
    w.writeln("#include <dlfcn.h>");
    w.writeln(&format!(
        "#define {}_LOADLIBRARY(pFileName) dlopen(pFileName, RTLD_LAZY)",
        prefix
    ));
    w.writeln(&format!(
        "#define {}_GETSYMBOL(hLibrary, pName) dlsym(hLibrary, pName)",
        prefix
    ));
    w.writeln(&format!("#define {}_FREELIBRARY(hLibrary) dlclose(hLibrary)", prefix));
    w.writeln("#endif // _WIN32");
    w.newline();
    w.writeln(&format!("#endif // {}", guard));
    w.newline();
}

fn reserved_constant(component: &ComponentDefinition, reserved: ReservedError) -> String {
    naming::error_constant(&component.name_space, reserved.name())
}

fn write_null_check(w: &mut IndentWriter, component: &ComponentDefinition, pointer: &str) {
    w.writeln(&format!("if ({} == nullptr)", pointer));
    w.indent();
    w.writeln(&format!(
        "return {};",
        reserved_constant(component, ReservedError::InvalidParam)
    ));
    w.dedent();
}

/// Body of Init: zero the library handle and every function pointer
pub(crate) fn write_init_body(w: &mut IndentWriter, component: &ComponentDefinition) {
    write_null_check(w, component, "pWrapperTable");
    w.newline();
    w.writeln(&format!("pWrapperTable->{} = nullptr;", LIBRARY_HANDLE_FIELD));
    for (scope, method) in component.methods_in_table_order() {
        w.writeln(&format!(
            "pWrapperTable->{} = nullptr;",
            naming::table_field(scope, method)
        ));
    }
    w.newline();
    w.writeln(&format!(
        "return {};",
        naming::success_constant(&component.name_space)
    ));
}

/// Body of Release: unload when loaded, then reset through `init_fn`
pub(crate) fn write_release_body(
    w: &mut IndentWriter,
    component: &ComponentDefinition,
    init_fn: &str,
) {
    let prefix = naming::macro_prefix(&component.name_space);
    write_null_check(w, component, "pWrapperTable");
    w.newline();
    w.writeln(&format!(
        "if (pWrapperTable->{} != nullptr) {{",
        LIBRARY_HANDLE_FIELD
    ));
    w.indent();
    w.writeln(&format!(
        "{}_FREELIBRARY(pWrapperTable->{});",
        prefix, LIBRARY_HANDLE_FIELD
    ));
    w.writeln(&format!("return {}(pWrapperTable);", init_fn));
    w.dedent();
    w.writeln("}");
    w.newline();
    w.writeln(&format!(
        "return {};",
        naming::success_constant(&component.name_space)
    ));
}

/// Body of Load: open, resolve every export in table order, store the
/// library handle last. A missing export closes the library and resets the
/// table through `init_fn`.
pub(crate) fn write_load_body(w: &mut IndentWriter, component: &ComponentDefinition, init_fn: &str) {
    let ns = component.name_space.as_str();
    let prefix = naming::macro_prefix(ns);

    write_null_check(w, component, "pWrapperTable");
    write_null_check(w, component, "pLibraryFileName");
    w.newline();
    w.writeln(&format!(
        "void * hLibrary = {}_LOADLIBRARY(pLibraryFileName);",
        prefix
    ));
    w.writeln("if (hLibrary == nullptr)");
    w.indent();
    w.writeln(&format!(
        "return {};",
        reserved_constant(component, ReservedError::CouldNotLoadLibrary)
    ));
    w.dedent();
    w.newline();

    for (scope, method) in component.methods_in_table_order() {
        let field = naming::table_field(scope, method);
        w.writeln(&format!(
            "pWrapperTable->{} = ({}) {}_GETSYMBOL(hLibrary, \"{}\");",
            field,
            naming::fn_ptr_typedef(ns, scope, method),
            prefix,
            naming::export_name(ns, scope, method)
        ));
        w.writeln(&format!("if (pWrapperTable->{} == nullptr) {{", field));
        w.indent();
        w.writeln(&format!("{}_FREELIBRARY(hLibrary);", prefix));
        w.writeln(&format!("{}(pWrapperTable);", init_fn));
        w.writeln(&format!(
            "return {};",
            reserved_constant(component, ReservedError::CouldNotFindLibraryExport)
        ));
        w.dedent();
        w.writeln("}");
        w.newline();
    }

    w.writeln(&format!("pWrapperTable->{} = hLibrary;", LIBRARY_HANDLE_FIELD));
    w.writeln(&format!("return {};", naming::success_constant(ns)));
}

impl BindingGenerator for DynamicHeaderGenerator {
    fn target_name(&self) -> &'static str {
        "dynamic header"
    }

    fn file_name(&self, component: &ComponentDefinition) -> String {
        naming::dynamic_header_file(&component.base_name)
    }

    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String> {
        self.writer.take_output();
        let guard = include_guard(&component.name_space, "DYNAMICHEADER");

        write_banner(
            &mut self.writer,
            component,
            "This is an autogenerated C++ header file for dynamic loading",
        );
        open_guard(&mut self.writer, &guard);
        self.writer.writeln(&format!(
            "#include \"{}\"",
            naming::types_header_file(&component.base_name)
        ));
        self.writer.newline();

        self.emit_typedefs(component)?;
        self.emit_table(component);
        self.emit_prototypes(&component.name_space);

        close_guard(&mut self.writer, &guard);
        Ok(self.writer.take_output())
    }
}

impl BindingGenerator for DynamicImplGenerator {
    fn target_name(&self) -> &'static str {
        "dynamic implementation"
    }

    fn file_name(&self, component: &ComponentDefinition) -> String {
        naming::dynamic_impl_file(&component.base_name)
    }

    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String> {
        self.writer.take_output();
        let ns = component.name_space.as_str();
        let table = naming::table_type(ns);
        let result = naming::result_type(ns);
        let init_fn = naming::init_table_fn(ns);

        write_banner(
            &mut self.writer,
            component,
            "This is an autogenerated C++ implementation file for dynamic loading",
        );
        self.writer.writeln(&format!(
            "#include \"{}\"",
            naming::types_header_file(&component.base_name)
        ));
        self.writer.writeln(&format!(
            "#include \"{}\"",
            naming::dynamic_header_file(&component.base_name)
        ));
        self.writer.newline();
        write_platform_macros(&mut self.writer, ns);

        self.writer.write_block(
            &format!("{} {}({} * pWrapperTable)", result, init_fn, table),
            |w| write_init_body(w, component),
        );
        self.writer.newline();

        self.writer.write_block(
            &format!(
                "{} {}({} * pWrapperTable)",
                result,
                naming::release_table_fn(ns),
                table
            ),
            |w| write_release_body(w, component, &init_fn),
        );
        self.writer.newline();

        self.writer.write_block(
            &format!(
                "{} {}({} * pWrapperTable, const char * pLibraryFileName)",
                result,
                naming::load_table_fn(ns),
                table
            ),
            |w| write_load_body(w, component, &init_fn),
        );

        Ok(self.writer.take_output())
    }
}
