use color_print::cprintln;
use thiserror::Error;

use crate::include::Sources;
use crate::token::Pos;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Re-defined symbol: `{0}`")]
    DuplicateSymbol(String),

    #[error("Undefined symbol: `{0}`")]
    UnresolvedReference(String),

    #[error("No addressing mode of `{0}` accepts `{1}`")]
    InvalidAddressingMode(String, String),

    #[error("Branch target out of range: {0} bytes")]
    RelativeOffsetOutOfRange(i32),

    #[error("`.org` needs a $xxxx address, found `{0}`")]
    InvalidOrgOperand(String),

    #[error("Include file not found: {0}")]
    IncludeFileNotFound(String, #[source] std::io::Error),

    #[error("Include cycle: `{0}` includes itself")]
    IncludeCycle(String),

    #[error("More argument required after `{0}`")]
    MissingOperand(String),

    #[error("`{0}` needs a quoted string")]
    InvalidString(String),

    #[error("Cannot take high/low byte of `{0}`")]
    InvalidByteExtract(String),

    #[error("Address drift: ${expected:04X} in prescan, ${found:04X} in assemble")]
    AddressDrift { expected: u32, found: u32 },

    #[error("Address counter passed $FFFF")]
    AddressOverflow,

    #[error("Failed to serialize symbols")]
    Symbols(#[source] serde_yaml::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("{source}")]
    Located { pos: Pos, source: Box<Error> },
}

impl Error {
    pub fn located(self, pos: &Pos) -> Self {
        match self {
            // Keep the innermost position
            Error::Located { .. } => self,
            err => Error::Located {
                pos: pos.clone(),
                source: Box::new(err),
            },
        }
    }

    /// The error kind without position.
    pub fn root(&self) -> &Error {
        match self {
            Error::Located { source, .. } => source.root(),
            err => err,
        }
    }

    pub fn pos(&self) -> Option<&Pos> {
        match self {
            Error::Located { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, sources: &Sources) {
        cprintln!("<red,bold>error</>: {}", self.root());

        let Some(pos) = self.pos() else {
            return;
        };

        let line_num = pos.line + 1;
        cprintln!("     <blue>--></> <underline>{}</>", pos);
        cprintln!("      <blue>|</>");

        let line_content = sources
            .get(&pos.file)
            .and_then(|lines| lines.get(pos.line))
            .map(|s| s.as_str())
            .unwrap_or("");

        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</> {}<red,bold>^</>", " ".repeat(pos.col));
    }
}
