use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Error;
use crate::operand::format_word;
use crate::token::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// Address of a `name:` declaration
    Label(u16),

    /// Token following `name =`, verbatim
    Variable(String),
}

impl Symbol {
    /// The operand text a reference is replaced with.
    pub fn operand(&self) -> String {
        match self {
            Symbol::Label(addr) => format_word(*addr),
            Symbol::Variable(value) => value.clone(),
        }
    }
}

/// Per-run symbol table, kept in declaration order.
#[derive(Debug, Default)]
pub struct Symbols(IndexMap<String, (Pos, Symbol)>);

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, pos: &Pos, symbol: Symbol) -> Result<(), Error> {
        if self.0.contains_key(name) {
            return Err(Error::DuplicateSymbol(name.to_string()));
        }
        self.0.insert(name.to_string(), (pos.clone(), symbol));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name).map(|(_, symbol)| symbol)
    }

    /// Where `name` was declared.
    pub fn pos(&self, name: &str) -> Option<&Pos> {
        self.0.get(name).map(|(pos, _)| pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.0.iter().map(|(name, (_, symbol))| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        #[derive(Serialize)]
        struct Entry {
            kind: &'static str,
            value: String,
            defined: String,
        }

        let entries: IndexMap<&str, Entry> = self
            .0
            .iter()
            .map(|(name, (pos, symbol))| {
                let kind = match symbol {
                    Symbol::Label(_) => "label",
                    Symbol::Variable(_) => "variable",
                };
                let entry = Entry {
                    kind,
                    value: symbol.operand(),
                    defined: pos.to_string(),
                };
                (name.as_str(), entry)
            })
            .collect();
        serde_yaml::to_string(&entries).map_err(Error::Symbols)
    }
}
