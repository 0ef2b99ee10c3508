use crate::{
    error::{Error, Reason},
    label::Symbols,
};

/// Symbol a job still needs before its word is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixup {
    ResolveAddress(String),
    ResolveConstant(String),
}

/// One output word as produced by the first pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Opcode with the fixup field still zero.
    pub base: u16,
    pub fixup: Option<Fixup>,
    /// Widest value the fixup field holds.
    pub max: u16,
    /// Address the word is emitted at.
    pub addr: u16,
    pub line: usize,
    /// Column of the operand the fixup came from.
    pub col: usize,
}

impl Job {
    /// Final word, with the fixup resolved against `symbols`.
    pub fn resolve(&self, symbols: &Symbols) -> Result<u16, Error> {
        let value = match &self.fixup {
            None => return Ok(self.base),
            Some(Fixup::ResolveAddress(name)) => symbols
                .label(name)
                .ok_or_else(|| Reason::UndefinedLabel(name.clone())),
            Some(Fixup::ResolveConstant(name)) => symbols
                .constant(name)
                .ok_or_else(|| Reason::UndefinedConstant(name.clone())),
        }
        .map_err(|reason| Error::new(reason, self.line, self.col))?;

        if value > self.max {
            let reason = Reason::Overflow {
                value: value as u32,
                max: self.max,
            };
            return Err(Error::new(reason, self.line, self.col));
        }
        Ok(self.base | value)
    }
}

/// Second pass: resolve every job in order. The first failure ends the run.
pub fn process_jobs(jobs: &[Job], symbols: &Symbols) -> Result<Vec<u16>, Error> {
    jobs.iter().map(|job| job.resolve(symbols)).collect()
}
