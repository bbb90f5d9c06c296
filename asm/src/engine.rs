//! Two-pass engine.
//!
//! Both passes run the same dispatch over the expanded token stream. PRESCAN
//! records symbols and measures statements without keeping bytes; ASSEMBLE
//! emits bytes with the complete symbol table. Forward references are given a
//! provisional operand in PRESCAN. While assembling, the start address of every
//! statement, every label and the final counter are checked against PRESCAN.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mos6510::{AddressingMode, Instruction, InstructionSet, MOS6510};

use crate::error::Error;
use crate::include::{self, FsLoader, Includer, SourceLoader, Sources};
use crate::listing::{Listing, Row};
use crate::msg::{Level, Log};
use crate::operand::*;
use crate::symbol::{Symbol, Symbols};
use crate::token::{Directive, Pos, Token, TokenKind};

/// File name used for sources that do not come from a file.
pub const SOURCE_NAME: &str = "<source>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Prescan,
    Assemble,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Output {
    /// Load address: the first `.org`, or the base address
    pub origin: u16,
    pub bytes: Vec<u8>,
    pub symbols: Symbols,
    pub listing: Listing,
    pub log: Log,
    pub sources: Sources,
}

impl Output {
    /// Bytes prefixed with the little-endian load address.
    pub fn image(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(self.bytes.len() + 2);
        image.extend_from_slice(&self.origin.to_le_bytes());
        image.extend_from_slice(&self.bytes);
        image
    }
}

pub struct Assembler<'a, L: SourceLoader = FsLoader> {
    set: &'a InstructionSet,
    loader: L,
    root: PathBuf,

    mode: Mode,
    // $10000 once the last byte sits at $FFFF
    addr: u32,
    // counter at the end of PRESCAN
    end: u32,
    bytes: Vec<u8>,
    symbols: Symbols,
    listing: Listing,
    log: Log,
    sources: Sources,
    // token index -> start address measured in PRESCAN
    starts: IndexMap<usize, u16>,
}

impl Assembler<'static, FsLoader> {
    pub fn new() -> Self {
        Self::with_loader(&MOS6510, FsLoader)
    }
}

impl Default for Assembler<'static, FsLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, L: SourceLoader> Assembler<'a, L> {
    pub fn with_loader(set: &'a InstructionSet, loader: L) -> Self {
        Assembler {
            set,
            loader,
            root: PathBuf::from("."),
            mode: Mode::Prescan,
            addr: 0,
            end: 0,
            bytes: Vec::new(),
            symbols: Symbols::new(),
            listing: Listing::new(),
            log: Log::new(),
            sources: Sources::new(),
            starts: IndexMap::new(),
        }
    }

    /// Directory `.include` paths are resolved against.
    pub fn include_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sources read by the last run, kept after a failure for diagnostics.
    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Messages of the last run, kept after a failure.
    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn run(&mut self, source: &str, base: u16) -> Result<Vec<u8>, Error> {
        self.run_source(SOURCE_NAME, source, base)
            .map(|output| output.bytes)
    }

    /// Assemble a file; its directory becomes the include root.
    pub fn run_file(&mut self, path: &Path, base: u16) -> Result<Output, Error> {
        let code = self
            .loader
            .load(path)
            .map_err(|err| Error::FileOpen(path.display().to_string(), err))?;
        self.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.run_source(&file, &code, base)
    }

    pub fn run_source(&mut self, file: &str, code: &str, base: u16) -> Result<Output, Error> {
        self.reset();

        let tokens = Includer::new(&self.loader, &self.root, &mut self.sources).expand(file, code)?;
        let origin = include::origin(&tokens).unwrap_or(base);
        self.log.info(format!(
            "{} tokens from {} file(s), origin ${:04X}",
            tokens.len(),
            self.sources.len(),
            origin
        ));

        self.pass(Mode::Prescan, &tokens, base)?;
        self.log.info(format!("{} symbols", self.symbols.len()));
        self.pass(Mode::Assemble, &tokens, base)?;
        self.log.info(format!("{} bytes", self.bytes.len()));

        Ok(Output {
            origin,
            bytes: std::mem::take(&mut self.bytes),
            symbols: std::mem::take(&mut self.symbols),
            listing: std::mem::take(&mut self.listing),
            log: self.log.clone(),
            sources: self.sources.clone(),
        })
    }

    fn reset(&mut self) {
        self.mode = Mode::Prescan;
        self.addr = 0;
        self.end = 0;
        self.bytes.clear();
        self.symbols.clear();
        self.listing.clear();
        self.log.clear();
        self.sources.clear();
        self.starts.clear();
    }

    fn pass(&mut self, mode: Mode, tokens: &[Token], base: u16) -> Result<(), Error> {
        self.mode = mode;
        self.addr = u32::from(base);
        self.bytes.clear();

        let mut idx = 0;
        while idx < tokens.len() {
            idx = self
                .statement(tokens, idx)
                .map_err(|err| err.located(&tokens[idx].pos))?;
        }

        match mode {
            Mode::Prescan => self.end = self.addr,
            Mode::Assemble if self.addr != self.end => {
                return Err(Error::AddressDrift {
                    expected: self.end,
                    found: self.addr,
                })
            }
            Mode::Assemble => {}
        }
        Ok(())
    }

    /// Dispatch the statement starting at `idx`; returns the index after it.
    fn statement(&mut self, tokens: &[Token], idx: usize) -> Result<usize, Error> {
        let tok = &tokens[idx];
        let set = self.set;
        match &tok.kind {
            TokenKind::Directive(Directive::Org) => {
                let operand = operand_token(tokens, idx)?;
                self.addr = word_to_int(&operand.text)
                    .map(u32::from)
                    .ok_or_else(|| Error::InvalidOrgOperand(operand.text.clone()))?;
                self.log
                    .diag(format!("origin moved to ${:04X}", self.addr), &tok.pos);
                Ok(idx + 2)
            }
            TokenKind::Directive(Directive::Byte) => self.data(tokens, idx, 1),
            TokenKind::Directive(Directive::Word) => self.data(tokens, idx, 2),
            TokenKind::Directive(Directive::String) => self.string(tokens, idx),
            TokenKind::LabelDecl(name) => {
                let addr = self.here()?;
                match self.mode {
                    Mode::Prescan => {
                        self.declare(name, &tok.pos, Symbol::Label(addr))?;
                        self.log
                            .diag(format!("label `{}` = ${:04X}", name, addr), &tok.pos);
                    }
                    Mode::Assemble => {
                        if let Some(&Symbol::Label(expected)) = self.symbols.get(name) {
                            if expected != addr {
                                return Err(Error::AddressDrift {
                                    expected: u32::from(expected),
                                    found: self.addr,
                                });
                            }
                        }
                    }
                }
                Ok(idx + 1)
            }
            TokenKind::VarDecl(name) => {
                let value = operand_token(tokens, idx)?;
                if self.mode == Mode::Prescan {
                    self.declare(name, &tok.pos, Symbol::Variable(value.text.clone()))?;
                    self.log
                        .diag(format!("variable `{}` = `{}`", name, value.text), &tok.pos);
                }
                Ok(idx + 2)
            }
            TokenKind::Ident => match set.lookup(&tok.text) {
                Some(inst) => self.instruction(inst, tokens, idx),
                None => {
                    self.ignore(tok);
                    Ok(idx + 1)
                }
            },
            _ => {
                self.ignore(tok);
                Ok(idx + 1)
            }
        }
    }

    /// Insert into the symbol table, pointing at the first declaration on a clash.
    fn declare(&mut self, name: &str, pos: &Pos, symbol: Symbol) -> Result<(), Error> {
        if let Some(first) = self.symbols.pos(name).cloned() {
            self.log.push(
                Level::Error,
                format!("`{}` first declared here", name),
                Some(&first),
            );
        }
        self.symbols.insert(name, pos, symbol)
    }

    fn ignore(&mut self, tok: &Token) {
        if self.mode == Mode::Prescan {
            self.log.warn(format!("ignored token `{}`", tok.text), &tok.pos);
        }
    }

    // ------------------------------------------------------------------------
    // Instructions

    fn instruction(
        &mut self,
        inst: &Instruction,
        tokens: &[Token],
        idx: usize,
    ) -> Result<usize, Error> {
        let pos = &tokens[idx].pos;
        self.check_start(idx)?;

        if inst.is_implied() {
            let opcode = inst
                .opcode(AddressingMode::Implied)
                .ok_or_else(|| Error::InvalidAddressingMode(inst.mnemonic().to_string(), String::new()))?;
            self.emit(vec![opcode], inst.mnemonic().to_string(), None, pos)?;
            return Ok(idx + 1);
        }

        let operand_tok = operand_token(tokens, idx)?;
        let operand = self
            .resolve(inst, operand_tok)
            .and_then(|operand| self.branch(inst, operand))
            .map_err(|err| err.located(&operand_tok.pos))?;

        let (mode, opcode) = inst
            .modes()
            .find(|(mode, _)| matches_addressing_mode(&operand, *mode))
            .ok_or_else(|| {
                Error::InvalidAddressingMode(inst.mnemonic().to_string(), operand.clone())
                    .located(&operand_tok.pos)
            })?;
        self.log.diag(
            format!(
                "{} {} as {} (${:02X}, {})",
                inst.mnemonic(),
                operand,
                mode,
                opcode,
                inst.description()
            ),
            pos,
        );

        let mut bytes = vec![opcode];
        match InstructionSet::operand_length(mode) {
            2 => bytes.extend(parse_byte(&operand)),
            3 => bytes.extend(parse_word_little_endian(&operand).into_iter().flatten()),
            _ => {}
        }

        let text = format!("{} {}", inst.mnemonic(), operand);
        let reference = (operand_tok.kind == TokenKind::Ident && operand != operand_tok.text)
            .then(|| operand_tok.text.clone());
        self.emit(bytes, text, reference, pos)?;
        Ok(idx + 2)
    }

    /// Concrete operand text for the token after a mnemonic.
    fn resolve(&mut self, inst: &Instruction, tok: &Token) -> Result<String, Error> {
        if tok.kind != TokenKind::Ident || !is_label_reference(&tok.text) {
            return Ok(tok.text.clone());
        }
        if tok.text == "A" && inst.supports(AddressingMode::Accumulator) {
            return Ok(tok.text.clone());
        }
        if self.set.is_instruction(&tok.text) {
            return Err(Error::MissingOperand(inst.mnemonic().to_string()));
        }

        let name = strip_high_low(&tok.text);
        match self.symbols.get(name) {
            Some(symbol) => {
                let value = symbol.operand();
                if !is_high_low_byte_extract(&tok.text) {
                    return Ok(value);
                }
                is_word(&value)
                    .then(|| extract_high_low_byte(&tok.text, &value))
                    .flatten()
                    .map(format_immediate)
                    .ok_or_else(|| Error::InvalidByteExtract(tok.text.clone()))
            }
            None if self.mode == Mode::Prescan => {
                let guess = if is_high_low_byte_extract(&tok.text) {
                    format_immediate(0)
                } else {
                    format_word(self.here()?)
                };
                self.log.diag(
                    format!("forward reference `{}`, assuming `{}`", tok.text, guess),
                    &tok.pos,
                );
                Ok(guess)
            }
            None => Err(Error::UnresolvedReference(name.to_string())),
        }
    }

    /// Turn a branch target into the displacement byte.
    fn branch(&self, inst: &Instruction, operand: String) -> Result<String, Error> {
        if !inst.is_branch() {
            return Ok(operand);
        }
        if let Some(target) = word_to_int(&operand) {
            return relative_offset(self.here()?, target).map(format_byte);
        }
        if is_byte(&operand) {
            // Literal displacement
            return Ok(operand);
        }
        match self.mode {
            Mode::Prescan => Ok(format_byte(0)),
            Mode::Assemble => Ok(operand),
        }
    }

    // ------------------------------------------------------------------------
    // Data

    /// `.byte` / `.word`: every following literal of `width` bytes.
    fn data(&mut self, tokens: &[Token], idx: usize, width: usize) -> Result<usize, Error> {
        self.check_start(idx)?;
        let directive = &tokens[idx];
        let literals: Vec<&Token> = tokens[idx + 1..]
            .iter()
            .take_while(|tok| match width {
                1 => is_byte(&tok.text),
                _ => is_word(&tok.text),
            })
            .collect();

        let mut bytes = Vec::with_capacity(literals.len() * width);
        for tok in &literals {
            match width {
                1 => bytes.extend(parse_byte(&tok.text)),
                _ => bytes.extend(parse_word_big_endian(&tok.text).into_iter().flatten()),
            }
        }

        let text = std::iter::once(directive.text.as_str())
            .chain(literals.iter().map(|tok| tok.text.as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        self.emit(bytes, text, None, &directive.pos)?;
        Ok(idx + 1 + literals.len())
    }

    /// `.string "text"`: the characters and a 0 terminator.
    fn string(&mut self, tokens: &[Token], idx: usize) -> Result<usize, Error> {
        self.check_start(idx)?;
        let directive = &tokens[idx];
        let operand = operand_token(tokens, idx)?;
        let TokenKind::Text(text) = &operand.kind else {
            return Err(Error::InvalidString(directive.text.clone()).located(&operand.pos));
        };

        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.emit(bytes, format!("{} {}", directive.text, operand.text), None, &directive.pos)?;
        Ok(idx + 2)
    }

    // ------------------------------------------------------------------------
    // Address counter

    /// Current address; a statement cannot start past $FFFF.
    fn here(&self) -> Result<u16, Error> {
        u16::try_from(self.addr).map_err(|_| Error::AddressOverflow)
    }

    /// Record the statement start in PRESCAN, compare it in ASSEMBLE.
    fn check_start(&mut self, idx: usize) -> Result<(), Error> {
        let addr = self.here()?;
        match self.mode {
            Mode::Prescan => {
                self.starts.insert(idx, addr);
            }
            Mode::Assemble => {
                if let Some(&expected) = self.starts.get(&idx) {
                    if expected != addr {
                        return Err(Error::AddressDrift {
                            expected: u32::from(expected),
                            found: self.addr,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Advance past `bytes`; only ASSEMBLE keeps them.
    fn emit(
        &mut self,
        bytes: Vec<u8>,
        text: String,
        reference: Option<String>,
        pos: &Pos,
    ) -> Result<(), Error> {
        let address = self.here()?;
        let end = u32::try_from(bytes.len())
            .ok()
            .and_then(|len| self.addr.checked_add(len))
            .filter(|end| *end <= 0x1_0000)
            .ok_or(Error::AddressOverflow)?;
        self.addr = end;

        if self.mode == Mode::Assemble {
            self.bytes.extend_from_slice(&bytes);
            self.listing.push(Row {
                address,
                bytes,
                text,
                reference,
                pos: pos.clone(),
            });
        }
        Ok(())
    }
}

fn operand_token(tokens: &[Token], idx: usize) -> Result<&Token, Error> {
    tokens
        .get(idx + 1)
        .ok_or_else(|| Error::MissingOperand(tokens[idx].text.clone()))
}

/// Assemble `source` with the 6510 instruction set, `.org` overriding `base`.
pub fn assemble(source: &str, base: u16) -> Result<Vec<u8>, Error> {
    Assembler::new().run(source, base)
}
