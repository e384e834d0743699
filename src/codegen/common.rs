//! Common utilities for binding generation
//!
//! Provides shared functionality used by all generators:
//! - Indentation management
//! - File banners and doxygen blocks
//! - Include guards

use crate::model::ComponentDefinition;

/// Options for code generation
#[derive(Debug, Clone)]
pub struct CodeGenOptions {
    /// Indent size (number of spaces)
    pub indent_size: usize,
    /// Use tabs instead of spaces
    pub use_tabs: bool,
    /// Generate doxygen comments for methods and parameters
    pub emit_comments: bool,
}

impl Default for CodeGenOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            emit_comments: true,
        }
    }
}

/// Helper for managing indentation in generated code
#[derive(Debug)]
pub struct IndentWriter {
    output: String,
    indent_level: usize,
    options: CodeGenOptions,
    at_line_start: bool,
}

impl IndentWriter {
    pub fn new() -> Self {
        Self::with_options(CodeGenOptions::default())
    }

    pub fn with_options(options: CodeGenOptions) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            options,
            at_line_start: true,
        }
    }

    /// Get the current output
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take ownership of the output
    pub fn into_output(self) -> String {
        self.output
    }

    /// Take the output and start over with the same options
    pub fn take_output(&mut self) -> String {
        self.indent_level = 0;
        self.at_line_start = true;
        std::mem::take(&mut self.output)
    }

    pub fn options(&self) -> &CodeGenOptions {
        &self.options
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a string with current indentation
    pub fn write(&mut self, s: &str) {
        if self.at_line_start && !s.is_empty() && !s.starts_with('\n') {
            self.write_indent();
            self.at_line_start = false;
        }
        self.output.push_str(s);
        if s.ends_with('\n') {
            self.at_line_start = true;
        }
    }

    /// Write a line with current indentation
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write an empty line
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write the current indentation
    fn write_indent(&mut self) {
        let indent = if self.options.use_tabs {
            "\t".repeat(self.indent_level)
        } else {
            " ".repeat(self.indent_level * self.options.indent_size)
        };
        self.output.push_str(&indent);
    }

    /// Write a comment (language-specific prefix should be included)
    pub fn write_comment(&mut self, comment: &str) {
        if self.options.emit_comments {
            self.writeln(comment);
        }
    }

    /// Write a doxygen block, one `* ` line per entry
    pub fn write_doc(&mut self, lines: &[String]) {
        if !self.options.emit_comments {
            return;
        }
        self.writeln("/**");
        for line in lines {
            if line.starts_with('*') {
                self.writeln(line);
            } else {
                self.writeln(&format!("* {}", line));
            }
        }
        self.writeln("*/");
    }

    /// Write a block with braces
    pub fn write_block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.writeln(header);
        self.writeln("{");
        self.indent();
        f(self);
        self.dedent();
        self.writeln("}");
    }

    /// Write a `/*** title ***/` section separator
    pub fn write_section(&mut self, title: &str) {
        self.writeln("/*************************************************************************************************************************");
        self.writeln(&format!(" {}", title));
        self.writeln("**************************************************************************************************************************/");
        self.newline();
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading file banner shared by every artifact
pub fn write_banner(w: &mut IndentWriter, component: &ComponentDefinition, abstract_text: &str) {
    w.writeln("/*++");
    w.newline();
    w.writeln(&format!(
        "This file has been generated by bindforge {}.",
        env!("CARGO_PKG_VERSION")
    ));
    w.newline();
    w.writeln(&format!(
        "Abstract: {} in order to allow an easy",
        abstract_text
    ));
    w.writeln(&format!("use of {}", component.library_name));
    w.newline();
    w.writeln(&format!("Interface version: {}", component.version));
    w.newline();
    w.writeln("--*/");
    w.newline();
}

/// Include guard macro for an artifact
pub fn include_guard(namespace: &str, suffix: &str) -> String {
    format!("__{}_{}", namespace.to_uppercase(), suffix)
}

/// Open an include guard
pub fn open_guard(w: &mut IndentWriter, guard: &str) {
    w.writeln(&format!("#ifndef {}", guard));
    w.writeln(&format!("#define {}", guard));
    w.newline();
}

/// Close an include guard
pub fn close_guard(w: &mut IndentWriter, guard: &str) {
    w.writeln(&format!("#endif // {}", guard));
}

/// Opening of a C-linkage block usable from C and C++
pub fn open_extern_c(w: &mut IndentWriter) {
    w.writeln("#ifdef __cplusplus");
    w.writeln("extern \"C\" {");
    w.writeln("#endif");
    w.newline();
}

pub fn close_extern_c(w: &mut IndentWriter) {
    w.writeln("#ifdef __cplusplus");
    w.writeln("}");
    w.writeln("#endif");
    w.newline();
}
