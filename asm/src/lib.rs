//! Two-pass assembler for CHIP-8 source.
//!
//! The first pass ([`generate_jobs`]) walks the token stream once, assigning
//! every emitted word an address and recording labels and constants. The
//! second pass ([`process_jobs`]) resolves the pending symbol references.

mod error;
mod job;
mod label;
mod lexer;
mod parser;
pub mod util;

pub use error::{Category, Error, FileError, Reason};
pub use job::{process_jobs, Fixup, Job};
pub use label::{Symbol, Symbols};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{generate_jobs, Generator};

/// Result of a successful run, kept around for listings.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub words: Vec<u16>,
    pub jobs: Vec<Job>,
    pub symbols: Symbols,
}

impl Assembly {
    /// Big-endian image, ready to load at 0x200.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_be_bytes()).collect()
    }
}

pub fn assemble_program<S: AsRef<str>>(lines: &[S]) -> Result<Assembly, Error> {
    let tokens = tokenize(lines);
    tracing::debug!(lines = lines.len(), tokens = tokens.len(), "tokenized");

    let (jobs, symbols) = generate_jobs(&tokens)?;
    tracing::debug!(jobs = jobs.len(), "first pass done");

    let words = process_jobs(&jobs, &symbols)?;
    Ok(Assembly {
        words,
        jobs,
        symbols,
    })
}

/// Assembles source lines into a big-endian byte image.
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Vec<u8>, Error> {
    Ok(assemble_program(lines)?.to_bytes())
}
