use std::fmt;

use mos6510::AddressingMode;
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, pos: Pos) -> Self {
        Token {
            kind,
            text: text.to_string(),
            pos,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` at {}", self.text, self.pos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // .org .byte .word .string .include
    Directive(Directive),

    // "text", quotes stripped
    Text(String),

    // name =
    VarDecl(String),

    // name:
    LabelDecl(String),

    // Mnemonic, label/variable reference, accumulator `A`
    Ident,

    // Literal operand in the syntax of the given mode
    Operand(AddressingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Directive {
    #[strum(serialize = ".org")]
    Org,
    #[strum(serialize = ".byte")]
    Byte,
    #[strum(serialize = ".word")]
    Word,
    #[strum(serialize = ".string")]
    String,
    #[strum(serialize = ".include")]
    Include,
}

impl Directive {
    pub const ALL: [Directive; 5] = [
        Directive::Org,
        Directive::Byte,
        Directive::Word,
        Directive::String,
        Directive::Include,
    ];
}

/// Source position. `line` and `col` are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pos {
    pub file: String,
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(file: &str, line: usize, col: usize) -> Self {
        Pos {
            file: file.to_string(),
            line,
            col,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line + 1, self.col + 1)
    }
}
