//! Text buffers for generated code.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;

/// Accumulates generated code with brace-driven indentation: `{` indents the
/// following lines, `}` dedents the line it appears on. Works on the emitted
/// token stream, so braces inside emitted string literals would confuse it;
/// the backends never produce those.
pub struct CodeWriter {
    buf: String,
    indent: usize,
    start_of_line: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
            start_of_line: true,
        }
    }

    pub fn print(&mut self, code: &str) {
        for c in code.chars() {
            if c == '}' {
                self.indent = self.indent.saturating_sub(1);
            }
            if self.start_of_line && c != '\n' {
                for _ in 0..self.indent {
                    self.buf.push_str("    ");
                }
            }
            self.start_of_line = false;
            self.buf.push(c);
            if c == '{' {
                self.indent += 1;
            }
            if c == '\n' {
                self.start_of_line = true;
            }
        }
    }

    pub fn println(&mut self, code: &str) {
        self.print(code);
        self.print("\n");
    }

    pub fn blank(&mut self) {
        self.print("\n");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for CodeWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}

/// File name -> content, in emission order. The name set is a stable contract
/// with build systems, so a duplicate insertion is a programming error.
#[derive(Debug, Default)]
pub struct OutputSet {
    files: IndexMap<String, String>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: String) {
        let name = name.into();
        debug_assert!(
            !self.files.contains_key(&name),
            "duplicate output file {name:?}"
        );
        self.files.insert(name, content);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Persists every buffer below `root`, creating directories as needed.
    pub fn write_to(&self, root: &Path) -> io::Result<()> {
        for (name, content) in &self.files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_drive_indentation() {
        let mut w = CodeWriter::new();
        w.println("void f() {");
        w.println("if (x) {");
        w.println("g();");
        w.println("} else {");
        w.println("h();");
        w.println("}");
        w.println("}");
        assert_eq!(
            w.finish(),
            "void f() {\n    if (x) {\n        g();\n    } else {\n        h();\n    }\n}\n"
        );
    }

    #[test]
    fn output_set_preserves_insertion_order() {
        let mut out = OutputSet::new();
        out.insert("b.cpp", String::new());
        out.insert("a.h", String::new());
        let names: Vec<_> = out.file_names().collect();
        assert_eq!(names, vec!["b.cpp", "a.h"]);
    }
}
