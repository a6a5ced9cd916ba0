//! Indentation-aware line accumulator shared by every renderer.

use std::fmt;

#[derive(Debug, Clone)]
pub struct LineWriter {
    indent_unit: String,
    depth: usize,
    lines: Vec<String>,
}

impl LineWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            depth: 0,
            lines: Vec::new(),
        }
    }

    /// Start a new line at the current indentation. An empty `text` still
    /// writes the indentation.
    pub fn push_line(&mut self, text: &str) {
        let mut line = self.indent_unit.repeat(self.depth);
        line.push_str(text);
        self.lines.push(line);
    }

    /// Append to the most recent line, starting one if there is none.
    pub fn push(&mut self, text: &str) {
        match self.lines.last_mut() {
            Some(line) => line.push_str(text),
            None => self.push_line(text),
        }
    }

    /// Run `f` one level deeper. The depth is restored whether `f`
    /// succeeds or fails.
    pub fn tabbed<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for LineWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}
