//! `.include` expansion.
//!
//! Runs once over the token stream before either pass. Each included file is
//! lexed and spliced in place of its `.include "path"` pair, so the passes only
//! ever see one flat stream. Paths are resolved against the directory of the
//! top-level file.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::Error;
use crate::lexer::Lexer;
use crate::operand::word_to_int;
use crate::token::{Directive, Token, TokenKind};

/// Source lines of every file read during a run, keyed by file name.
pub type Sources = IndexMap<String, Vec<String>>;

pub trait SourceLoader {
    fn load(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory file system.
#[derive(Debug, Default, Clone)]
pub struct MemLoader(HashMap<PathBuf, String>);

impl MemLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, code: &str) -> Self {
        self.insert(path, code);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, code: &str) {
        self.0.insert(path.into(), code.to_string());
    }
}

impl SourceLoader for MemLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

pub struct Includer<'a, L: SourceLoader> {
    loader: &'a L,
    root: &'a Path,
    sources: &'a mut Sources,
    stack: Vec<String>,
}

impl<'a, L: SourceLoader> Includer<'a, L> {
    pub fn new(loader: &'a L, root: &'a Path, sources: &'a mut Sources) -> Self {
        Includer {
            loader,
            root,
            sources,
            stack: Vec::new(),
        }
    }

    /// Lex `code` and splice in every file it includes, recursively.
    pub fn expand(&mut self, file: &str, code: &str) -> Result<Vec<Token>, Error> {
        if self.stack.iter().any(|open| open == file) {
            return Err(Error::IncludeCycle(file.to_string()));
        }
        self.sources
            .insert(file.to_string(), code.lines().map(String::from).collect());
        self.stack.push(file.to_string());

        let mut expanded = Vec::new();
        let mut tokens = Lexer::new(file, code).parse().into_iter();
        while let Some(tok) = tokens.next() {
            match tok.kind {
                TokenKind::Directive(Directive::Include) => {
                    let (path, pos) = match tokens.next() {
                        Some(Token {
                            kind: TokenKind::Text(path),
                            pos,
                            ..
                        }) => (path, pos),
                        Some(other) => {
                            return Err(Error::InvalidString(tok.text).located(&other.pos))
                        }
                        None => return Err(Error::MissingOperand(tok.text).located(&tok.pos)),
                    };
                    let code = self
                        .loader
                        .load(&self.root.join(&path))
                        .map_err(|err| Error::IncludeFileNotFound(path.clone(), err).located(&pos))?;
                    let included = self.expand(&path, &code).map_err(|err| err.located(&pos))?;
                    expanded.extend(included);
                }
                TokenKind::Directive(Directive::Org) => {
                    let operand = tokens
                        .next()
                        .ok_or_else(|| Error::MissingOperand(tok.text.clone()).located(&tok.pos))?;
                    if word_to_int(&operand.text).is_none() {
                        return Err(Error::InvalidOrgOperand(operand.text).located(&operand.pos));
                    }
                    expanded.push(tok);
                    expanded.push(operand);
                }
                _ => expanded.push(tok),
            }
        }

        self.stack.pop();
        Ok(expanded)
    }
}

/// Address of the first `.org` in an expanded stream.
pub fn origin(tokens: &[Token]) -> Option<u16> {
    tokens.windows(2).find_map(|pair| match pair[0].kind {
        TokenKind::Directive(Directive::Org) => word_to_int(&pair[1].text),
        _ => None,
    })
}
