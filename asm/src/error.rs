use color_print::cprintln;
use thiserror::Error;

/// Coarse classification of assembly errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Wrong operand kind, unknown mnemonic, missing operand or trailing garbage.
    Syntax,
    /// Undefined or redefined label or constant.
    Symbol,
    /// Value wider than the field it is placed in.
    Range,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("Unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("Expected {expected}, found `{found}`")]
    Unexpected { expected: &'static str, found: String },

    #[error("Expected {0}, found end of line")]
    MissingOperand(&'static str),

    #[error("Unexpected operand: `{0}`")]
    Trailing(String),

    #[error("Cannot parse `{0}` as a number")]
    ParseValue(String),

    #[error("Unknown register name: `{0}`")]
    UnknownRegister(String),

    #[error("Only v0 is supported as jump base, found `{0}`")]
    OnlyV0(String),

    #[error("Only the index register `[i]` is supported, found `[{0}]`")]
    OnlyIndex(String),

    #[error("No `ld` form takes `{0}` and `{1}`")]
    InvalidCombination(String, String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Undefined constant: `{0}`")]
    UndefinedConstant(String),

    #[error("Re-defined label: `{name}` (first defined on line {first})")]
    RedefinedLabel { name: String, first: usize },

    #[error("Re-defined constant: `{name}` (first defined on line {first})")]
    RedefinedConstant { name: String, first: usize },

    #[error("Too big value: 0x{value:X} does not fit in 0x{max:X}")]
    Overflow { value: u32, max: u16 },

    #[error("Too big value: {text} does not fit in 0x{max:X}")]
    TooWide { text: String, max: u16 },

    #[error("Program too large: {0} bytes, at most 3584 fit")]
    ProgramTooLarge(usize),
}

impl Reason {
    pub fn category(&self) -> Category {
        match self {
            Reason::UnknownCommand(_)
            | Reason::Unexpected { .. }
            | Reason::MissingOperand(_)
            | Reason::Trailing(_)
            | Reason::ParseValue(_)
            | Reason::UnknownRegister(_)
            | Reason::OnlyV0(_)
            | Reason::OnlyIndex(_)
            | Reason::InvalidCombination(..) => Category::Syntax,
            Reason::UndefinedLabel(_)
            | Reason::UndefinedConstant(_)
            | Reason::RedefinedLabel { .. }
            | Reason::RedefinedConstant { .. } => Category::Symbol,
            Reason::Overflow { .. } | Reason::TooWide { .. } | Reason::ProgramTooLarge(_) => {
                Category::Range
            }
        }
    }
}

/// First error of an assembly run, with the 1-based position it points at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct Error {
    pub reason: Reason,
    pub line: usize,
    pub col: usize,
}

impl Error {
    pub fn new(reason: Reason, line: usize, col: usize) -> Self {
        Error { reason, line, col }
    }

    pub fn category(&self) -> Category {
        self.reason.category()
    }

    /// Print error with the offending source line and a caret under the column
    pub fn print_diag<S: AsRef<str>>(&self, file: &str, lines: &[S]) {
        cprintln!("<red,bold>error</>: {}", self);
        cprintln!("     <blue>--></> <underline>{}:{}:{}</>", file, self.line, self.col);
        cprintln!("      <blue>|</>");

        let content = self
            .line
            .checked_sub(1)
            .and_then(|idx| lines.get(idx))
            .map(|s| s.as_ref().replace('\t', " "))
            .unwrap_or_default();

        cprintln!(" <blue>{:>4} |</> {}", self.line, content);
        cprintln!(
            "      <blue>|</> {}<red,bold>^</>",
            " ".repeat(self.col.saturating_sub(1))
        );
    }
}

/// Failures of the command line tool outside of assembly itself.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

#[test]
fn test_category() {
    assert_eq!(Reason::UnknownCommand("x".into()).category(), Category::Syntax);
    assert_eq!(Reason::UndefinedLabel("x".into()).category(), Category::Symbol);
    assert_eq!(Reason::Overflow { value: 256, max: 0xFF }.category(), Category::Range);
    let err = Error::new(Reason::Overflow { value: 0x100, max: 0xFF }, 3, 9);
    assert_eq!(err.to_string(), "Too big value: 0x100 does not fit in 0xFF");
}
