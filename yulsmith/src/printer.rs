//! Source Printer
//!
//! Line-oriented output buffer with indentation management, shared by the
//! Yul emitter and the program converter.

/// A printer that manages indentation and output.
pub struct Printer {
    indent: String,
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

impl Printer {
    /// Creates a new printer that indents each level with `indent`.
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Writes text to the output.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if self.at_line_start {
            self.write_indent();
            self.at_line_start = false;
        }

        self.output.push_str(text);
    }

    /// Writes a newline.
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    /// Writes `header {` and indents the following lines.
    pub fn open(&mut self, header: &str) {
        if header.is_empty() {
            self.line("{");
        } else {
            self.write(header);
            self.line(" {");
        }
        self.increase_indent();
    }

    /// Closes a block opened with [`Printer::open`].
    pub fn close(&mut self) {
        self.decrease_indent();
        self.line("}");
    }

    /// Closes the current block and opens the next on the same line:
    /// `} between {`.
    pub fn reopen(&mut self, between: &str) {
        self.decrease_indent();
        if between.is_empty() {
            self.line("} {");
        } else {
            self.write("} ");
            self.write(between);
            self.line(" {");
        }
        self.increase_indent();
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent);
        }
    }

    /// Increases the indentation level.
    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decreases the indentation level.
    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Returns the current indentation level.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Returns whether the output is empty.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Finishes printing and returns the output.
    pub fn finish(mut self) -> String {
        // Ensure output ends with a newline
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_printing() {
        let mut printer = Printer::new("    ");

        printer.open("code");
        printer.line("pop(0)");
        printer.close();

        let output = printer.finish();
        assert_eq!(output, "code {\n    pop(0)\n}\n");
    }

    #[test]
    fn test_nested_indentation() {
        let mut printer = Printer::new("\t");

        printer.open("");
        printer.open("if 1");
        printer.line("leave");
        printer.close();
        printer.close();

        assert_eq!(printer.finish(), "{\n\tif 1 {\n\t\tleave\n\t}\n}\n");
    }

    #[test]
    fn test_decrease_saturates() {
        let mut printer = Printer::new("  ");
        printer.decrease_indent();
        assert_eq!(printer.indent_level(), 0);
        printer.write("x");
        assert_eq!(printer.finish(), "x\n");
    }
}
