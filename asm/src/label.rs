use crate::error::{Error, Reason};
use indexmap::IndexMap;

/// Where a symbol was defined and what it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub value: u16,
    pub line: usize,
    pub col: usize,
}

/// Labels and constants live in separate namespaces, both kept in
/// definition order for listings.
#[derive(Debug, Clone, Default)]
pub struct Symbols {
    labels: IndexMap<String, Symbol>,
    consts: IndexMap<String, Symbol>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_label(&mut self, name: &str, addr: u16, line: usize, col: usize) -> Result<(), Error> {
        if let Some(prev) = self.labels.get(name) {
            let reason = Reason::RedefinedLabel {
                name: name.to_string(),
                first: prev.line,
            };
            return Err(Error::new(reason, line, col));
        }
        let symbol = Symbol { value: addr, line, col };
        self.labels.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn define_constant(&mut self, name: &str, value: u16, line: usize, col: usize) -> Result<(), Error> {
        if let Some(prev) = self.consts.get(name) {
            let reason = Reason::RedefinedConstant {
                name: name.to_string(),
                first: prev.line,
            };
            return Err(Error::new(reason, line, col));
        }
        let symbol = Symbol { value, line, col };
        self.consts.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn label(&self, name: &str) -> Option<u16> {
        self.labels.get(name).map(|s| s.value)
    }

    pub fn constant(&self, name: &str) -> Option<u16> {
        self.consts.get(name).map(|s| s.value)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.consts.iter().map(|(k, v)| (k.as_str(), v))
    }
}
