use mos6510::AddressingMode;

use crate::operand::{form, literal, name_len};
use crate::token::{Directive, Pos, Token, TokenKind};

pub struct Lexer<'a> {
    file: &'a str,
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, code: &'a str) -> Self {
        Self { file, code }
    }

    pub fn parse(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (line, text) in self.code.lines().enumerate() {
            tokens.extend(LineLexer::new(strip_comment(text), self.file, line).parse());
        }
        tokens
    }
}

/// Cuts a `;` comment, leaving `;` inside quotes alone.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ';' if !quoted => return &line[..idx],
            _ => {}
        }
    }
    line
}

struct LineLexer<'a> {
    line: &'a str,
    file: &'a str,
    row: usize,
}

impl<'a> LineLexer<'a> {
    fn new(line: &'a str, file: &'a str, row: usize) -> Self {
        Self { line, file, row }
    }

    fn parse(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut idx = 0;
        while let Some(ch) = self.line[idx..].chars().next() {
            if ch.is_whitespace() {
                idx += ch.len_utf8();
                continue;
            }

            let rest = &self.line[idx..];
            match MATCHERS.iter().find_map(|matcher| matcher(rest)) {
                Some((len, kind)) => {
                    let pos = Pos::new(self.file, self.row, idx);
                    tokens.push(Token::new(kind, rest[..len].trim_end(), pos));
                    idx += len;
                }
                // Nothing starts here: skip the character
                None => idx += ch.len_utf8(),
            }
        }
        tokens
    }
}

// ----------------------------------------------------------------------------
// Matchers
// ----------------------------------------------------------------------------

type Matcher = fn(&str) -> Option<(usize, TokenKind)>;

// Tried in order at every position; the first hit wins.
const MATCHERS: [Matcher; 7] = [
    directive,
    text,
    var_decl,
    label_decl,
    ident,
    operand,
    operand_indirect,
];

// Absolute before zero page so `$D020` never lexes as `$D0` `20`.
const DIRECT_MODES: [AddressingMode; 7] = [
    AddressingMode::Immediate,
    AddressingMode::AbsoluteX,
    AddressingMode::AbsoluteY,
    AddressingMode::Absolute,
    AddressingMode::ZeroPageX,
    AddressingMode::ZeroPageY,
    AddressingMode::ZeroPage,
];

const INDIRECT_MODES: [AddressingMode; 3] = [
    AddressingMode::IndirectIndexedY,
    AddressingMode::Indirect,
    AddressingMode::IndexedIndirectX,
];

/// Keyword followed by a non-alphanumeric character or the end of line.
fn directive(s: &str) -> Option<(usize, TokenKind)> {
    Directive::ALL.iter().find_map(|dir| {
        let keyword = dir.to_string();
        let rest = s.strip_prefix(keyword.as_str())?;
        (!rest.starts_with(|c: char| c.is_ascii_alphanumeric()))
            .then(|| (keyword.len(), TokenKind::Directive(*dir)))
    })
}

fn text(s: &str) -> Option<(usize, TokenKind)> {
    let body = s.strip_prefix('"')?;
    let end = body.find('"')?;
    Some((end + 2, TokenKind::Text(body[..end].to_string())))
}

fn var_decl(s: &str) -> Option<(usize, TokenKind)> {
    let name = name_len(s)?;
    let after = &s[name..];
    let spaced = after.len() - after.trim_start().len();
    let rest = after.trim_start().strip_prefix('=')?;
    let trailing = rest.len() - rest.trim_start().len();
    Some((
        name + spaced + 1 + trailing,
        TokenKind::VarDecl(s[..name].to_string()),
    ))
}

fn label_decl(s: &str) -> Option<(usize, TokenKind)> {
    let name = name_len(s)?;
    s[name..].starts_with(':').then(|| {
        (name + 1, TokenKind::LabelDecl(s[..name].to_string()))
    })
}

fn ident(s: &str) -> Option<(usize, TokenKind)> {
    let modifier = usize::from(s.starts_with(['<', '>']));
    let name = name_len(&s[modifier..])?;
    Some((modifier + name, TokenKind::Ident))
}

fn operand(s: &str) -> Option<(usize, TokenKind)> {
    operand_in(s, &DIRECT_MODES)
}

fn operand_indirect(s: &str) -> Option<(usize, TokenKind)> {
    operand_in(s, &INDIRECT_MODES)
}

fn operand_in(s: &str, modes: &[AddressingMode]) -> Option<(usize, TokenKind)> {
    modes.iter().find_map(|mode| {
        let (prefix, digits, suffix) = form(*mode)?;
        literal(s, prefix, digits, suffix).map(|len| (len, TokenKind::Operand(*mode)))
    })
}
