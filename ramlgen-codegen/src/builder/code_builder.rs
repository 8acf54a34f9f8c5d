use super::Indent;

/// Fluent builder of indented source text.
///
/// # Example
///
/// ```
/// use ramlgen_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::go()
///     .block_with_close("func main() {", "}", |b| b.line("serve()"))
///     .build();
///
/// assert_eq!(code, "func main() {\n\tserve()\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent: Indent,
    depth: usize,
    out: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent,
            depth: 0,
            out: String::new(),
        }
    }

    pub fn go() -> Self {
        Self::new(Indent::Tab)
    }

    pub fn python() -> Self {
        Self::new(Indent::FourSpaces)
    }

    /// Append `s` at the current depth, followed by a newline.
    pub fn line(mut self, s: &str) -> Self {
        self.out.push_str(&self.indent.unit().repeat(self.depth));
        self.out.push_str(s);
        self.out.push('\n');
        self
    }

    /// Append an empty line, never indented.
    pub fn blank(mut self) -> Self {
        self.out.push('\n');
        self
    }

    pub fn indent(mut self) -> Self {
        self.depth += 1;
        self
    }

    pub fn dedent(mut self) -> Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// `header` followed by an indented body, without a closing line
    /// (Python `def` and `class`).
    pub fn block<F>(self, header: &str, body: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        body(self.line(header).indent()).dedent()
    }

    /// `header`, an indented body, then `close` (Go braces).
    pub fn block_with_close<F>(self, header: &str, close: &str, body: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.block(header, body).line(close)
    }

    /// One comment line per entry of `lines`; empty entries keep only the
    /// prefix.
    pub fn comment<S: AsRef<str>>(self, prefix: &str, lines: &[S]) -> Self {
        lines.iter().fold(self, |b, text| match text.as_ref() {
            "" => b.line(prefix),
            text => b.line(&format!("{prefix} {text}")),
        })
    }

    /// Python docstring holding `lines`.
    pub fn docstring<S: AsRef<str>>(self, lines: &[S]) -> Self {
        lines
            .iter()
            .fold(self.line("\"\"\""), |b, text| b.line(text.as_ref()))
            .line("\"\"\"")
    }

    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Apply `f` once per item.
    pub fn each<T, I, F>(self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        items.into_iter().fold(self, f)
    }

    pub fn build(self) -> String {
        self.out
    }
}
