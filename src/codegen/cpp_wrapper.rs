//! Object Wrapper Emitter
//!
//! Renders `<base>_dynamic.hpp`, a header-only C++ layer over the dynamic
//! table:
//!
//! - `C<NS>Wrapper` owns one table, loads it on construction and releases it
//!   on destruction; it exposes the global methods and `CheckError`.
//! - `C<NS>BaseClass` holds a non-owning wrapper pointer and one handle; its
//!   destructor hands the handle to the configured release method once.
//! - One class per declared class, parents first.
//!
//! Every call site is derived from [`marshal::expand`]: each physical
//! parameter's role selects the argument expression, so the wrapper passes
//! exactly what the flat declaration expects.
//!
//! A method with a `return` parameter returns it. A method without one but
//! with exactly one `out` parameter returns that parameter instead of taking
//! it by reference.

use super::common::{close_guard, include_guard, open_guard, write_banner, CodeGenOptions, IndentWriter};
use super::dynamic::{write_init_body, write_load_body, write_platform_macros, write_release_body};
use super::{BindingGenerator, CodeGenResult};
use crate::marshal::{self, naming, PhysicalParam, Role, Site};
use crate::model::validate::classes_parents_first;
use crate::model::{ComponentDefinition, Method, Param, ParamPass, ParamType, Scope, BASE_CLASS_NAME};

const INIT_MEMBER: &str = "initWrapperTable";
const RELEASE_MEMBER: &str = "releaseWrapperTable";
const LOAD_MEMBER: &str = "loadWrapperTable";

/// Generator for the C++ wrapper header
pub struct CppWrapperGenerator {
    writer: IndentWriter,
}

/// One method's wrapper-side shape
struct MethodPlan<'a> {
    scope: Scope<'a>,
    method: &'a Method,
    /// Parameter surfaced as the C++ return value
    result: Option<&'a Param>,
    /// `marshal::expand` of every declared parameter, in order
    expansions: Vec<Vec<PhysicalParam>>,
}

impl<'a> MethodPlan<'a> {
    fn new(ns: &str, scope: Scope<'a>, method: &'a Method) -> CodeGenResult<Self> {
        let site = Site::new(scope.owner(), &method.method_name);
        let expansions = method
            .params
            .iter()
            .map(|p| marshal::expand(ns, p, site))
            .collect::<CodeGenResult<Vec<_>>>()?;
        Ok(Self {
            scope,
            method,
            result: result_param(method),
            expansions,
        })
    }

    fn site(&self) -> Site<'_> {
        Site::new(self.scope.owner(), &self.method.method_name)
    }

    fn is_result(&self, param: &Param) -> bool {
        self.result.is_some_and(|r| std::ptr::eq(r, param))
    }

    fn return_type(&self, ns: &str) -> CodeGenResult<String> {
        match self.result {
            Some(param) => marshal::cpp_param_type(ns, param, self.site()),
            None => Ok("void".to_string()),
        }
    }

    fn signature(&self, ns: &str) -> CodeGenResult<String> {
        let params = self
            .method
            .params
            .iter()
            .filter(|p| !self.is_result(p))
            .map(|p| signature_param(ns, p, self.site()))
            .collect::<CodeGenResult<Vec<_>>>()?;
        Ok(params.join(", "))
    }

    /// Name of the local or parameter holding a declared parameter's value
    fn value_name(&self, param: &Param) -> String {
        if self.is_result(param)
            && !matches!(param.param_type, ParamType::String | ParamType::Handle)
        {
            marshal::result_local(param)
        } else {
            marshal::cpp_variable_name(param)
        }
    }

    /// Argument list of the table call; `query` renders the size-query form
    fn arguments(&self, ns: &str, query: bool) -> String {
        let mut args = Vec::new();
        if !self.scope.is_global() {
            args.push("m_pHandle".to_string());
        }
        for (param, physical) in self.method.params.iter().zip(&self.expansions) {
            for p in physical {
                args.push(self.argument(ns, param, p, query));
            }
        }
        args.join(", ")
    }

    fn argument(&self, ns: &str, param: &Param, physical: &PhysicalParam, query: bool) -> String {
        let value = self.value_name(param);
        let ty = param.param_type;

        if param.param_pass == ParamPass::In {
            return match (ty, physical.role) {
                (ParamType::String, Role::SizeIn) => format!("({}_uint32) {}.size()", ns, value),
                (ParamType::String, _) => format!("{}.c_str()", value),
                (t, Role::SizeIn) if t.is_array() => format!("({}_uint64) {}.size()", ns, value),
                (t, _) if t.is_array() => format!("{}.data()", value),
                (ParamType::Struct, _) => format!("&{}", value),
                (ParamType::Handle, _) => marshal::handle_local(param),
                _ => value,
            };
        }

        match (marshal::buffer_locals(ns, param), physical.role) {
            (Some(_), Role::SizeIn) if query => "0".to_string(),
            (Some(locals), Role::SizeIn) if ty == ParamType::String => {
                format!("{} + 1", locals.needed)
            }
            (Some(locals), Role::SizeIn) => locals.needed,
            (Some(locals), Role::NeededOut) if query => format!("&{}", locals.needed),
            (Some(locals), Role::NeededOut) => format!("&{}", locals.written),
            (Some(_), Role::BufferOut) if query => "nullptr".to_string(),
            (Some(locals), Role::BufferOut) if ty == ParamType::String => {
                format!("&{}[0]", locals.buffer)
            }
            (Some(_), Role::BufferOut) => format!("{}.data()", value),
            _ if ty == ParamType::Handle => format!("&{}", marshal::handle_local(param)),
            _ => format!("&{}", value),
        }
    }

    /// `CheckError(<table call>);` for this scope
    fn checked_call(&self, ns: &str, query: bool) -> String {
        let field = naming::table_field(self.scope, self.method);
        let table = match self.scope {
            Scope::Class(_) => "m_pWrapper->m_WrapperTable",
            Scope::Global => "m_WrapperTable",
        };
        format!(
            "CheckError({}.{}({}));",
            table,
            field,
            self.arguments(ns, query)
        )
    }
}

/// The parameter a method returns in C++, if any
fn result_param(method: &Method) -> Option<&Param> {
    if let Some(param) = method.return_param() {
        return Some(param);
    }
    let mut outs = method.params.iter().filter(|p| p.param_pass == ParamPass::Out);
    match (outs.next(), outs.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Wrapper that owns instances created in `scope`
fn owning_wrapper(scope: Scope<'_>) -> &'static str {
    match scope {
        Scope::Global => "this",
        Scope::Class(_) => "m_pWrapper",
    }
}

fn signature_param(ns: &str, param: &Param, site: Site<'_>) -> CodeGenResult<String> {
    let ty = marshal::cpp_param_type(ns, param, site)?;
    let name = marshal::cpp_variable_name(param);
    let rendered = match (param.param_pass, param.param_type) {
        (ParamPass::In, ParamType::String | ParamType::Struct) => format!("const {} & {}", ty, name),
        (ParamPass::In, t) if t.is_array() => format!("const {} & {}", ty, name),
        (ParamPass::In, _) => format!("{} {}", ty, name),
        _ => format!("{} & {}", ty, name),
    };
    Ok(rendered)
}

/// Initializer for a result local of a value kind
fn result_initializer(ns: &str, param: &Param) -> String {
    match param.param_type {
        ParamType::Bool => " = false".to_string(),
        ParamType::Enum => format!(" = ({}) 0", naming::enum_type(ns, &param.param_class)),
        ParamType::Struct | ParamType::BasicArray | ParamType::StructArray => String::new(),
        _ => " = 0".to_string(),
    }
}

impl CppWrapperGenerator {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            writer: IndentWriter::with_options(options),
        }
    }

    fn emit_declarations(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        let ns = component.name_space.as_str();
        let ordered = classes_parents_first(component)?;
        let w = &mut self.writer;

        w.write_section("Forward Declaration of all classes");
        w.writeln(&format!("class {};", naming::cpp_wrapper(ns)));
        w.writeln(&format!("class {};", naming::cpp_class(ns, BASE_CLASS_NAME)));
        for class in &ordered {
            w.writeln(&format!("class {};", naming::cpp_class(ns, &class.class_name)));
        }
        w.newline();

        w.write_section("Declaration of shared pointer types");
        let mut names = vec![naming::cpp_wrapper(ns), naming::cpp_class(ns, BASE_CLASS_NAME)];
        names.extend(ordered.iter().map(|c| naming::cpp_class(ns, &c.class_name)));
        for class in names {
            let alias = format!("P{}", &class[1..]);
            w.writeln(&format!("typedef std::shared_ptr<{}> {};", class, alias));
        }
        w.newline();
        Ok(())
    }

    fn emit_exception(&mut self, component: &ComponentDefinition) {
        let ns = component.name_space.as_str();
        let exception = naming::cpp_exception(ns);
        let result = naming::result_type(ns);
        let w = &mut self.writer;

        w.write_section(&format!("Class {}", exception));
        w.writeln(&format!("class {} : public std::exception {{", exception));
        w.writeln("protected:");
        w.indent();
        w.write_comment("/**");
        w.write_comment("* Error code for the Exception.");
        w.write_comment("*/");
        w.writeln(&format!("{} m_errorCode;", result));
        w.writeln("std::string m_errorMessage;");
        w.newline();
        w.dedent();
        w.writeln("public:");
        w.indent();
        w.write_comment("/**");
        w.write_comment("* Exception Constructor.");
        w.write_comment("*/");
        w.writeln(&format!("{}({} errorCode)", exception, result));
        w.indent();
        w.writeln(": m_errorCode(errorCode)");
        w.dedent();
        w.writeln("{");
        w.indent();
        w.writeln(&format!(
            "m_errorMessage = \"{} Error \" + std::string(getErrorName()) + \" (\" + std::to_string(m_errorCode) + \")\";",
            ns
        ));
        w.dedent();
        w.writeln("}");
        w.newline();
        w.write_comment("/**");
        w.write_comment("* Returns error code");
        w.write_comment("*/");
        w.write_block(&format!("{} getErrorCode() const noexcept", result), |w| {
            w.writeln("return m_errorCode;");
        });
        w.newline();
        w.write_comment("/**");
        w.write_comment("* Returns error message");
        w.write_comment("*/");
        w.write_block("const char * what() const noexcept override", |w| {
            w.writeln("return m_errorMessage.c_str();");
        });
        w.newline();
        w.write_comment("/**");
        w.write_comment("* Returns the name of the error code");
        w.write_comment("*/");
        w.write_block("const char * getErrorName() const noexcept", |w| {
            w.writeln("switch (m_errorCode) {");
            w.indent();
            w.writeln(&format!(
                "case {}: return \"SUCCESS\";",
                naming::success_constant(ns)
            ));
            for (name, _) in component.error_constants() {
                w.writeln(&format!(
                    "case {}: return \"{}\";",
                    naming::error_constant(ns, &name),
                    name
                ));
            }
            w.dedent();
            w.writeln("}");
            w.writeln("return \"UNKNOWN\";");
        });
        w.dedent();
        w.writeln("};");
        w.newline();
    }

    fn emit_method_prototype(&mut self, ns: &str, plan: &MethodPlan<'_>) -> CodeGenResult<()> {
        let owner = match plan.scope {
            Scope::Class(class) => naming::cpp_class(ns, class),
            Scope::Global => naming::cpp_wrapper(ns),
        };

        let mut doc = vec![format!(
            "{}::{} - {}",
            owner, plan.method.method_name, plan.method.method_description
        )];
        for param in plan.method.params.iter().filter(|p| !plan.is_result(p)) {
            doc.push(format!(
                "* @param[{}] {} - {}",
                if param.param_pass == ParamPass::In { "in" } else { "out" },
                marshal::cpp_variable_name(param),
                param.param_description
            ));
        }
        if let Some(result) = plan.result {
            doc.push(format!("* @return {}", result.param_description));
        }

        let line = format!(
            "{} {}({});",
            plan.return_type(ns)?,
            plan.method.method_name,
            plan.signature(ns)?
        );
        self.writer.write_doc(&doc);
        self.writer.writeln(&line);
        Ok(())
    }

    fn emit_wrapper_class(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        let ns = component.name_space.as_str();
        let wrapper = naming::cpp_wrapper(ns);
        let table = naming::table_type(ns);
        let result = naming::result_type(ns);

        self.writer.write_section(&format!("Class {}", wrapper));
        self.writer.writeln(&format!("class {} {{", wrapper));
        self.writer.writeln("public:");
        self.writer.indent();

        self.writer.write_block(
            &format!("explicit {}(const std::string & sFileName)", wrapper),
            |w| {
                w.writeln(&format!("CheckError({}(&m_WrapperTable));", INIT_MEMBER));
                w.writeln(&format!(
                    "CheckError({}(&m_WrapperTable, sFileName.c_str()));",
                    LOAD_MEMBER
                ));
            },
        );
        self.writer.newline();
        self.writer.write_block(
            &format!(
                "static {} loadLibrary(const std::string & sFileName)",
                naming::cpp_ptr(ns, "Wrapper")
            ),
            |w| {
                w.writeln(&format!("return std::make_shared<{}>(sFileName);", wrapper));
            },
        );
        self.writer.newline();
        self.writer.write_block(&format!("~{}()", wrapper), |w| {
            w.writeln(&format!("{}(&m_WrapperTable);", RELEASE_MEMBER));
        });
        self.writer.newline();
        self.writer
            .writeln(&format!("{}(const {} &) = delete;", wrapper, wrapper));
        self.writer
            .writeln(&format!("{} & operator=(const {} &) = delete;", wrapper, wrapper));
        self.writer.newline();
        self.writer.write_block(&format!("void CheckError({} nResult)", result), |w| {
            w.writeln("if (nResult != 0)");
            w.indent();
            w.writeln(&format!("throw {}(nResult);", naming::cpp_exception(ns)));
            w.dedent();
        });
        self.writer.newline();

        for method in &component.global.methods {
            let plan = MethodPlan::new(ns, Scope::Global, method)?;
            self.emit_method_prototype(ns, &plan)?;
            self.writer.newline();
        }

        self.writer.dedent();
        self.writer.writeln("private:");
        self.writer.indent();
        self.writer.writeln(&format!("{} m_WrapperTable;", table));
        self.writer.newline();
        self.writer.writeln(&format!(
            "{} {}({} * pWrapperTable);",
            result, INIT_MEMBER, table
        ));
        self.writer.writeln(&format!(
            "{} {}({} * pWrapperTable);",
            result, RELEASE_MEMBER, table
        ));
        self.writer.writeln(&format!(
            "{} {}({} * pWrapperTable, const char * pLibraryFileName);",
            result, LOAD_MEMBER, table
        ));
        self.writer.newline();
        self.writer.writeln(&format!(
            "friend class {};",
            naming::cpp_class(ns, BASE_CLASS_NAME)
        ));
        for class in &component.classes {
            self.writer.writeln(&format!(
                "friend class {};",
                naming::cpp_class(ns, &class.class_name)
            ));
        }
        self.writer.dedent();
        self.writer.writeln("};");
        self.writer.newline();
        Ok(())
    }

    fn emit_base_class(&mut self, component: &ComponentDefinition) {
        let ns = component.name_space.as_str();
        let base = naming::cpp_class(ns, BASE_CLASS_NAME);
        let wrapper = naming::cpp_wrapper(ns);
        let handle = naming::handle_type(ns);
        let release = component.global.release_method.as_str();
        let w = &mut self.writer;

        w.write_section(&format!("Class {}", base));
        w.writeln(&format!("class {} {{", base));
        w.writeln("protected:");
        w.indent();
        w.write_comment("/* Wrapper Object that created the class. Not owned. */");
        w.writeln(&format!("{} * m_pWrapper;", wrapper));
        w.write_comment("/* Handle to Instance in library */");
        w.writeln(&format!("{} m_pHandle;", handle));
        w.newline();
        w.write_block(
            &format!("void CheckError({} nResult)", naming::result_type(ns)),
            |w| {
                w.writeln("if (nResult != 0)");
                w.indent();
                w.writeln(&format!("throw {}(nResult);", naming::cpp_exception(ns)));
                w.dedent();
            },
        );
        w.newline();
        w.dedent();
        w.writeln("public:");
        w.indent();
        w.writeln(&format!("{}({} * pWrapper, {} pHandle)", base, wrapper, handle));
        w.indent();
        w.writeln(": m_pWrapper(pWrapper), m_pHandle(pHandle)");
        w.dedent();
        w.writeln("{");
        w.writeln("}");
        w.newline();
        w.write_block(&format!("virtual ~{}()", base), |w| {
            w.writeln(&format!("{} * pWrapper = m_pWrapper;", wrapper));
            w.writeln("m_pWrapper = nullptr;");
            if !release.is_empty() {
                w.writeln("if (pWrapper != nullptr) {");
                w.indent();
                w.writeln("try {");
                w.indent();
                w.writeln(&format!("pWrapper->{}(this);", release));
                w.dedent();
                w.writeln("} catch (...) {");
                w.writeln("}");
                w.dedent();
                w.writeln("}");
            }
        });
        w.newline();
        w.writeln(&format!("{}(const {} &) = delete;", base, base));
        w.writeln(&format!("{} & operator=(const {} &) = delete;", base, base));
        w.newline();
        w.write_block(&format!("{} GetHandle()", handle), |w| {
            w.writeln("return m_pHandle;");
        });
        w.newline();
        w.writeln(&format!("friend class {};", wrapper));
        w.dedent();
        w.writeln("};");
        w.newline();
    }

    fn emit_classes(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        let ns = component.name_space.as_str();
        let wrapper = naming::cpp_wrapper(ns);
        let handle = naming::handle_type(ns);

        for class in classes_parents_first(component)? {
            let name = naming::cpp_class(ns, &class.class_name);
            let parent = naming::cpp_class(ns, class.parent_name());

            self.writer.write_section(&format!("Class {}", name));
            self.writer
                .writeln(&format!("class {} : public {} {{", name, parent));
            self.writer.writeln("public:");
            self.writer.indent();
            self.writer.write_doc(&[format!(
                "{}::{} - Constructor for {} class.",
                name, name, class.class_name
            )]);
            self.writer
                .writeln(&format!("{}({} * pWrapper, {} pHandle)", name, wrapper, handle));
            self.writer.indent();
            self.writer
                .writeln(&format!(": {}(pWrapper, pHandle)", parent));
            self.writer.dedent();
            self.writer.writeln("{");
            self.writer.writeln("}");
            self.writer.newline();

            for method in &class.methods {
                let plan = MethodPlan::new(ns, Scope::Class(&class.class_name), method)?;
                self.emit_method_prototype(ns, &plan)?;
                self.writer.newline();
            }

            self.writer.dedent();
            self.writer.writeln("};");
            self.writer.newline();
        }
        Ok(())
    }

    /// Out-of-line definition of one wrapper method
    fn emit_method_body(&mut self, ns: &str, plan: &MethodPlan<'_>) -> CodeGenResult<()> {
        let owner_class = match plan.scope {
            Scope::Class(class) => naming::cpp_class(ns, class),
            Scope::Global => naming::cpp_wrapper(ns),
        };
        let header = format!(
            "inline {} {}::{}({})",
            plan.return_type(ns)?,
            owner_class,
            plan.method.method_name,
            plan.signature(ns)?
        );

        let w = &mut self.writer;
        w.writeln(&header);
        w.writeln("{");
        w.indent();

        // locals
        for param in &plan.method.params {
            let is_result = plan.is_result(param);
            match (param.param_pass, param.param_type) {
                (ParamPass::In, ParamType::Handle) => {
                    let local = marshal::handle_local(param);
                    let var = marshal::cpp_variable_name(param);
                    w.writeln(&format!("{} {} = nullptr;", naming::handle_type(ns), local));
                    w.writeln(&format!("if ({} != nullptr)", var));
                    w.indent();
                    w.writeln(&format!("{} = {}->GetHandle();", local, var));
                    w.dedent();
                }
                (ParamPass::In, _) => {}
                (_, ParamType::Handle) => {
                    w.writeln(&format!(
                        "{} {} = nullptr;",
                        naming::handle_type(ns),
                        marshal::handle_local(param)
                    ));
                }
                (_, ty) => {
                    if let Some(locals) = marshal::buffer_locals(ns, param) {
                        w.writeln(&format!("{} {} = 0;", locals.counter_type, locals.needed));
                        w.writeln(&format!("{} {} = 0;", locals.counter_type, locals.written));
                    }
                    if is_result && ty != ParamType::String {
                        w.writeln(&format!(
                            "{} {}{};",
                            marshal::cpp_param_type(ns, param, plan.site())?,
                            marshal::result_local(param),
                            result_initializer(ns, param)
                        ));
                    }
                }
            }
        }

        // size query, then allocation
        if plan.method.uses_two_call() {
            w.writeln(&plan.checked_call(ns, true));
            for param in &plan.method.params {
                let Some(locals) = marshal::buffer_locals(ns, param) else {
                    continue;
                };
                if param.param_type == ParamType::String {
                    w.writeln(&format!(
                        "std::vector<char> {}({} + 1);",
                        locals.buffer, locals.needed
                    ));
                } else {
                    w.writeln(&format!(
                        "{}.resize({});",
                        plan.value_name(param),
                        locals.needed
                    ));
                }
            }
        }

        w.writeln(&plan.checked_call(ns, false));

        // translate outputs
        let mut return_statement: Vec<String> = Vec::new();
        for param in plan
            .method
            .params
            .iter()
            .filter(|p| p.param_pass.is_output())
        {
            let is_result = plan.is_result(param);
            let var = marshal::cpp_variable_name(param);
            match param.param_type {
                ParamType::String => {
                    let Some(locals) = marshal::buffer_locals(ns, param) else {
                        continue;
                    };
                    w.writeln(&format!("{}[{}] = 0;", locals.buffer, locals.needed));
                    let value = format!("std::string(&{}[0])", locals.buffer);
                    if is_result {
                        return_statement.push(format!("return {};", value));
                    } else {
                        w.writeln(&format!("{} = {};", var, value));
                    }
                }
                ParamType::Handle => {
                    let local = marshal::handle_local(param);
                    let instance = format!(
                        "std::make_shared<{}>({}, {})",
                        naming::cpp_class(ns, &param.param_class),
                        owning_wrapper(plan.scope),
                        local
                    );
                    if is_result {
                        return_statement.push(format!("if (!{})", local));
                        return_statement.push(format!("{}return nullptr;", indent_unit(w)));
                        return_statement.push(format!("return {};", instance));
                    } else {
                        w.writeln(&format!("if ({})", local));
                        w.indent();
                        w.writeln(&format!("{} = {};", var, instance));
                        w.dedent();
                        w.writeln("else");
                        w.indent();
                        w.writeln(&format!("{} = nullptr;", var));
                        w.dedent();
                    }
                }
                _ if is_result => {
                    return_statement.push(format!("return {};", marshal::result_local(param)));
                }
                _ => {}
            }
        }
        for line in &return_statement {
            w.writeln(line);
        }

        w.dedent();
        w.writeln("}");
        w.newline();
        Ok(())
    }

    fn emit_definitions(&mut self, component: &ComponentDefinition) -> CodeGenResult<()> {
        let ns = component.name_space.as_str();
        let wrapper = naming::cpp_wrapper(ns);
        let table = naming::table_type(ns);
        let result = naming::result_type(ns);

        self.writer.write_section(&format!("Method definitions for {}", wrapper));
        for method in &component.global.methods {
            let plan = MethodPlan::new(ns, Scope::Global, method)?;
            self.emit_method_body(ns, &plan)?;
        }

        self.writer.write_block(
            &format!(
                "inline {} {}::{}({} * pWrapperTable)",
                result, wrapper, INIT_MEMBER, table
            ),
            |w| write_init_body(w, component),
        );
        self.writer.newline();
        self.writer.write_block(
            &format!(
                "inline {} {}::{}({} * pWrapperTable)",
                result, wrapper, RELEASE_MEMBER, table
            ),
            |w| write_release_body(w, component, INIT_MEMBER),
        );
        self.writer.newline();
        self.writer.write_block(
            &format!(
                "inline {} {}::{}({} * pWrapperTable, const char * pLibraryFileName)",
                result, wrapper, LOAD_MEMBER, table
            ),
            |w| write_load_body(w, component, INIT_MEMBER),
        );
        self.writer.newline();

        for class in classes_parents_first(component)? {
            self.writer.write_section(&format!(
                "Method definitions for {}",
                naming::cpp_class(ns, &class.class_name)
            ));
            for method in &class.methods {
                let plan = MethodPlan::new(ns, Scope::Class(&class.class_name), method)?;
                self.emit_method_body(ns, &plan)?;
            }
        }
        Ok(())
    }
}

/// One level of indentation as configured
fn indent_unit(w: &IndentWriter) -> String {
    if w.options().use_tabs {
        "\t".to_string()
    } else {
        " ".repeat(w.options().indent_size)
    }
}

impl Default for CppWrapperGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingGenerator for CppWrapperGenerator {
    fn target_name(&self) -> &'static str {
        "C++ wrapper"
    }

    fn file_name(&self, component: &ComponentDefinition) -> String {
        naming::cpp_wrapper_file(&component.base_name)
    }

    fn generate(&mut self, component: &ComponentDefinition) -> CodeGenResult<String> {
        self.writer.take_output();
        let ns = component.name_space.as_str();
        let guard = include_guard(ns, "CPPHEADER_DYNAMIC_CPP");

        write_banner(
            &mut self.writer,
            component,
            "This is an autogenerated C++-Header file",
        );
        open_guard(&mut self.writer, &guard);
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
        for include in ["<string>", "<memory>", "<vector>", "<exception>"] {
            self.writer.writeln(&format!("#include {}", include));
        }
        self.writer.newline();

        self.writer.writeln(&format!("namespace {} {{", ns));
        self.writer.newline();

        self.emit_declarations(component)?;
        self.emit_exception(component);
        self.emit_wrapper_class(component)?;
        self.emit_base_class(component);
        self.emit_classes(component)?;
        self.emit_definitions(component)?;

        self.writer.writeln(&format!("}} // namespace {}", ns));
        self.writer.newline();
        close_guard(&mut self.writer, &guard);
        Ok(self.writer.take_output())
    }
}
