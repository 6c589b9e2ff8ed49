//! Template interpolation into the shared output buffer.

/// Appends interpolated text to an output buffer.
///
/// Templates contain `$variable$` placeholders resolved against a slice of
/// name/value pairs, and `$$` emits a literal `$`. Referencing a variable
/// that is not in the slice aborts generation; there is no silent default.
pub struct Printer<'a> {
    buf: &'a mut String,
    indent: usize,
    at_line_start: bool,
}

impl<'a> Printer<'a> {
    pub fn new(buf: &'a mut String) -> Printer<'a> {
        Printer {
            buf,
            indent: 0,
            at_line_start: true,
        }
    }

    /// Indents subsequent lines by one more level (two spaces).
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        assert!(self.indent > 0, "outdent without matching indent");
        self.indent -= 1;
    }

    pub fn print(&mut self, vars: &[(&str, &str)], template: &str) {
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c == '\n' {
                self.buf.push('\n');
                self.at_line_start = true;
                continue;
            }
            if self.at_line_start {
                for _ in 0..self.indent {
                    self.buf.push_str("  ");
                }
                self.at_line_start = false;
            }
            if c != '$' {
                self.buf.push(c);
                continue;
            }
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('$') => break,
                    Some(c) => name.push(c),
                    None => panic!("unterminated variable in template {:?}", template),
                }
            }
            if name.is_empty() {
                self.buf.push('$');
                continue;
            }
            match vars.iter().find(|(var, _)| *var == name) {
                Some((_, value)) => self.buf.push_str(value),
                None => panic!("undefined template variable ${}$", name),
            }
        }
    }
}
