/// Unit of one indentation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// gofmt style
    #[default]
    Tab,
    /// PEP 8 style
    FourSpaces,
}

impl Indent {
    pub fn unit(self) -> &'static str {
        match self {
            Self::Tab => "\t",
            Self::FourSpaces => "    ",
        }
    }
}
