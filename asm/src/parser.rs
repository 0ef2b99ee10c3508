use c8arch::{Alu, Keyword, Mnemonic, Op, MAX_PROGRAM_SIZE, PROGRAM_START, V};
use std::num::{IntErrorKind, ParseIntError};

use crate::{
    error::{Error, Reason},
    job::{Fixup, Job},
    label::Symbols,
    lexer::{Token, TokenKind},
};

// ----------------------------------------------------------------------------
// Operands

/// Immediate operand. `value` is zero while a fixup is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Imm {
    value: u16,
    fixup: Option<Fixup>,
    max: u16,
    col: usize,
}

impl Imm {
    fn byte(&self) -> u8 {
        self.value as u8
    }
}

fn unexpected(expected: &'static str, tok: &Token) -> Error {
    let reason = Reason::Unexpected {
        expected,
        found: tok.text.clone(),
    };
    Error::new(reason, tok.line, tok.col)
}

fn parse_with_prefix(s: &str) -> Result<u32, ParseIntError> {
    let (num, radix) = match s.get(..2) {
        Some("0x") => (&s[2..], 16),
        Some("0b") => (&s[2..], 2),
        Some("0o") => (&s[2..], 8),
        _ => (s, 10),
    };
    u32::from_str_radix(num, radix)
}

fn literal(tok: &Token, max: u16) -> Result<u16, Error> {
    let value = parse_with_prefix(&tok.text).map_err(|e| {
        let reason = match e.kind() {
            IntErrorKind::PosOverflow => Reason::TooWide {
                text: tok.text.clone(),
                max,
            },
            _ => Reason::ParseValue(tok.text.clone()),
        };
        Error::new(reason, tok.line, tok.col)
    })?;
    if value > max as u32 {
        let reason = Reason::Overflow { value, max };
        return Err(Error::new(reason, tok.line, tok.col));
    }
    Ok(value as u16)
}

fn reg_of(tok: &Token) -> Result<V, Error> {
    match tok.kind {
        TokenKind::Register => V::parse(&tok.text)
            .map_err(|_| Error::new(Reason::UnknownRegister(tok.text.clone()), tok.line, tok.col)),
        _ => Err(unexpected("register", tok)),
    }
}

/// Literal or `$constant`, at most `max`.
fn value_of(tok: &Token, max: u16) -> Result<Imm, Error> {
    match tok.kind {
        TokenKind::Value => Ok(Imm {
            value: literal(tok, max)?,
            fixup: None,
            max,
            col: tok.col,
        }),
        TokenKind::Data => Ok(Imm {
            value: 0,
            fixup: Some(Fixup::ResolveConstant(tok.text.clone())),
            max,
            col: tok.col,
        }),
        _ => Err(unexpected("value", tok)),
    }
}

/// `[label]`, literal or `$constant`, at most 0xFFF.
fn address_of(tok: &Token) -> Result<Imm, Error> {
    match tok.kind {
        TokenKind::Address => Ok(Imm {
            value: 0,
            fixup: Some(Fixup::ResolveAddress(tok.text.clone())),
            max: c8arch::ADDR_MAX,
            col: tok.col,
        }),
        TokenKind::Value | TokenKind::Data => value_of(tok, c8arch::ADDR_MAX),
        _ => Err(unexpected("address", tok)),
    }
}

// ----------------------------------------------------------------------------
// Line cursor

/// Tokens of one source line.
struct Line<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Line<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Line { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|tok| tok.kind == kind)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek()
            .filter(|tok| tok.kind == TokenKind::Other)
            .and_then(|tok| Keyword::parse(&tok.text))
    }

    fn next(&mut self) -> Option<&'t Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    /// Next token, or an error pointing just past the end of the line.
    fn expect(&mut self, what: &'static str) -> Result<&'t Token, Error> {
        match self.next() {
            Some(tok) => Ok(tok),
            None => {
                let (line, col) = self
                    .tokens
                    .last()
                    .map(|tok| (tok.line, tok.end))
                    .unwrap_or((0, 0));
                Err(Error::new(Reason::MissingOperand(what), line, col))
            }
        }
    }

    fn reg(&mut self) -> Result<V, Error> {
        reg_of(self.expect("register")?)
    }

    fn value(&mut self, max: u16) -> Result<Imm, Error> {
        value_of(self.expect("value")?, max)
    }

    fn address(&mut self) -> Result<Imm, Error> {
        address_of(self.expect("address")?)
    }

    fn finish(&self) -> Result<(), Error> {
        match self.peek() {
            Some(tok) => Err(Error::new(Reason::Trailing(tok.text.clone()), tok.line, tok.col)),
            None => Ok(()),
        }
    }
}

// ----------------------------------------------------------------------------
// Generator

/// First pass: turns tokens into jobs and collects symbols.
#[derive(Debug, Default)]
pub struct Generator {
    jobs: Vec<Job>,
    symbols: Symbols,
}

/// Runs the first pass over the whole token stream.
pub fn generate_jobs(tokens: &[Token]) -> Result<(Vec<Job>, Symbols), Error> {
    Generator::default().generate(tokens)
}

impl Generator {
    pub fn generate(mut self, tokens: &[Token]) -> Result<(Vec<Job>, Symbols), Error> {
        for line in tokens.chunk_by(|a, b| a.line == b.line) {
            self.line(Line::new(line))?;
        }

        let size = self.jobs.len() * 2;
        if size > MAX_PROGRAM_SIZE {
            let (line, col) = self
                .jobs
                .get(MAX_PROGRAM_SIZE / 2)
                .map(|job| (job.line, 1))
                .unwrap_or((0, 0));
            return Err(Error::new(Reason::ProgramTooLarge(size), line, col));
        }
        Ok((self.jobs, self.symbols))
    }

    /// Address the next job will be emitted at.
    fn next_addr(&self) -> u16 {
        (PROGRAM_START as usize + 2 * self.jobs.len()) as u16
    }

    fn line(&mut self, mut line: Line) -> Result<(), Error> {
        while line.peek_kind(TokenKind::Label) {
            if let Some(tok) = line.next() {
                let addr = self.next_addr();
                self.symbols.define_label(&tok.text, addr, tok.line, tok.col)?;
            }
        }

        let Some(cmd) = line.next() else {
            return Ok(());
        };
        let mnemonic = match (cmd.kind, Mnemonic::parse(&cmd.text)) {
            (TokenKind::Command, Some(mnemonic)) => mnemonic,
            _ => {
                let reason = Reason::UnknownCommand(cmd.text.clone());
                return Err(Error::new(reason, cmd.line, cmd.col));
            }
        };

        if let Some((base, imm)) = self.encode(mnemonic, &mut line)? {
            self.emit(cmd, base, imm);
        }
        line.finish()
    }

    fn emit(&mut self, cmd: &Token, base: u16, imm: Option<Imm>) {
        let addr = self.next_addr();
        let (fixup, max, col) = match imm {
            Some(imm) => (imm.fixup, imm.max, imm.col),
            None => (None, 0, cmd.col),
        };
        tracing::trace!(addr, base, line = cmd.line, "emit");
        self.jobs.push(Job {
            base,
            fixup,
            max,
            addr,
            line: cmd.line,
            col,
        });
    }

    /// `const NAME VALUE`
    fn constant(&mut self, line: &mut Line) -> Result<(), Error> {
        let name = line.expect("constant name")?;
        if name.kind != TokenKind::Other {
            return Err(unexpected("constant name", name));
        }
        let tok = line.expect("value")?;
        if tok.kind != TokenKind::Value {
            return Err(unexpected("value", tok));
        }
        let value = literal(tok, 0xFFFF)?;
        self.symbols
            .define_constant(&name.text, value, name.line, name.col)
    }

    fn calc(alu: Alu, line: &mut Line) -> Result<(Op, Option<Imm>), Error> {
        let x = line.reg()?;
        let y = line.reg()?;
        Ok((Op::CALC(alu, x, y), None))
    }

    /// Shifts take an optional second register, kept in the `y` field.
    fn shift(alu: Alu, line: &mut Line) -> Result<(Op, Option<Imm>), Error> {
        let x = line.reg()?;
        let y = if line.peek_kind(TokenKind::Register) {
            line.reg()?
        } else {
            V::V0
        };
        Ok((Op::CALC(alu, x, y), None))
    }

    /// Base word and pending immediate for one command. Directives that emit
    /// nothing return `None`.
    fn encode(&mut self, mnemonic: Mnemonic, line: &mut Line) -> Result<Option<(u16, Option<Imm>)>, Error> {
        let (op, imm) = match mnemonic {
            Mnemonic::Const => {
                self.constant(line)?;
                return Ok(None);
            }
            Mnemonic::Dw => {
                let imm = line.value(0xFFFF)?;
                return Ok(Some((imm.value, Some(imm))));
            }
            _ => Self::instruction(mnemonic, line)?,
        };
        Ok(Some((op.to_bin(), imm)))
    }

    fn instruction(mnemonic: Mnemonic, line: &mut Line) -> Result<(Op, Option<Imm>), Error> {
        match mnemonic {
            Mnemonic::Cls => Ok((Op::CLS, None)),
            Mnemonic::Ret => Ok((Op::RET, None)),
            Mnemonic::Jp => match line.peek() {
                Some(tok) if tok.kind == TokenKind::Register => {
                    if line.reg()? != V::V0 {
                        let reason = Reason::OnlyV0(tok.text.clone());
                        return Err(Error::new(reason, tok.line, tok.col));
                    }
                    let imm = line.address()?;
                    Ok((Op::JPV0(imm.value), Some(imm)))
                }
                _ => {
                    let imm = line.address()?;
                    Ok((Op::JP(imm.value), Some(imm)))
                }
            },
            Mnemonic::Call => {
                let imm = line.address()?;
                Ok((Op::CALL(imm.value), Some(imm)))
            }
            Mnemonic::Se | Mnemonic::Sne => {
                let eq = mnemonic == Mnemonic::Se;
                let x = line.reg()?;
                if line.peek_kind(TokenKind::Register) {
                    let y = line.reg()?;
                    Ok((if eq { Op::SER(x, y) } else { Op::SNER(x, y) }, None))
                } else {
                    let imm = line.value(0xFF)?;
                    let kk = imm.byte();
                    Ok((if eq { Op::SE(x, kk) } else { Op::SNE(x, kk) }, Some(imm)))
                }
            }
            Mnemonic::Add => {
                if line.peek_keyword() == Some(Keyword::I) {
                    line.next();
                    return Ok((Op::ADDI(line.reg()?), None));
                }
                let x = line.reg()?;
                if line.peek_kind(TokenKind::Register) {
                    Ok((Op::CALC(Alu::Add, x, line.reg()?), None))
                } else {
                    let imm = line.value(0xFF)?;
                    Ok((Op::ADD(x, imm.byte()), Some(imm)))
                }
            }
            Mnemonic::Or => Self::calc(Alu::Or, line),
            Mnemonic::And => Self::calc(Alu::And, line),
            Mnemonic::Xor => Self::calc(Alu::Xor, line),
            Mnemonic::Sub => Self::calc(Alu::Sub, line),
            Mnemonic::Subn => Self::calc(Alu::Subn, line),
            Mnemonic::Shr => Self::shift(Alu::Shr, line),
            Mnemonic::Shl => Self::shift(Alu::Shl, line),
            Mnemonic::Rnd => {
                let x = line.reg()?;
                let imm = line.value(0xFF)?;
                Ok((Op::RND(x, imm.byte()), Some(imm)))
            }
            Mnemonic::Drw => {
                let x = line.reg()?;
                let y = line.reg()?;
                let imm = line.value(0xF)?;
                Ok((Op::DRW(x, y, imm.byte()), Some(imm)))
            }
            Mnemonic::Skp => Ok((Op::SKP(line.reg()?), None)),
            Mnemonic::Sknp => Ok((Op::SKNP(line.reg()?), None)),
            Mnemonic::Ld => Self::load(line),
            Mnemonic::Dw | Mnemonic::Const => {
                Err(Error::new(Reason::UnknownCommand(mnemonic.to_string()), 0, 0))
            }
        }
    }

    /// `ld` picks its encoding from the kinds of both operands.
    fn load(line: &mut Line) -> Result<(Op, Option<Imm>), Error> {
        let dst = line.expect("operand")?;
        match dst.kind {
            TokenKind::Other => match Keyword::parse(&dst.text) {
                Some(Keyword::I) => {
                    let imm = line.address()?;
                    Ok((Op::LDI(imm.value), Some(imm)))
                }
                Some(Keyword::DT) => Ok((Op::SETDT(line.reg()?), None)),
                Some(Keyword::ST) => Ok((Op::SETST(line.reg()?), None)),
                Some(Keyword::F) => Ok((Op::FONT(line.reg()?), None)),
                Some(Keyword::B) => Ok((Op::BCD(line.reg()?), None)),
                Some(Keyword::K) | None => Err(unexpected("register", dst)),
            },
            TokenKind::Address if dst.text == "i" => Ok((Op::STORE(line.reg()?), None)),
            TokenKind::Address => Err(Error::new(
                Reason::OnlyIndex(dst.text.clone()),
                dst.line,
                dst.col,
            )),
            TokenKind::Register => {
                let x = reg_of(dst)?;
                let src = line.expect("operand")?;
                match src.kind {
                    TokenKind::Register => Ok((Op::CALC(Alu::Ld, x, reg_of(src)?), None)),
                    TokenKind::Other => match Keyword::parse(&src.text) {
                        Some(Keyword::DT) => Ok((Op::GETDT(x), None)),
                        Some(Keyword::K) => Ok((Op::WAITK(x), None)),
                        _ => Err(Error::new(
                            Reason::InvalidCombination(dst.text.clone(), src.text.clone()),
                            src.line,
                            src.col,
                        )),
                    },
                    TokenKind::Address if src.text == "i" => Ok((Op::LOAD(x), None)),
                    TokenKind::Address => Err(Error::new(
                        Reason::OnlyIndex(src.text.clone()),
                        src.line,
                        src.col,
                    )),
                    _ => {
                        let imm = value_of(src, 0xFF)?;
                        Ok((Op::LD(x, imm.byte()), Some(imm)))
                    }
                }
            }
            _ => Err(unexpected("register", dst)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_parse_with_prefix() {
        assert_eq!(parse_with_prefix("42"), Ok(42));
        assert_eq!(parse_with_prefix("0x2a"), Ok(42));
        assert_eq!(parse_with_prefix("0b101010"), Ok(42));
        assert_eq!(parse_with_prefix("0o52"), Ok(42));
        assert!(parse_with_prefix("0x").is_err());
        assert!(parse_with_prefix("4z").is_err());
    }

    #[test]
    fn test_label_addresses() {
        let tokens = tokenize(&["start:", "cls", "mid: ld v0, 1", "", "end: jp [start]"]);
        let (jobs, symbols) = generate_jobs(&tokens).unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(symbols.label("start"), Some(0x200));
        assert_eq!(symbols.label("mid"), Some(0x202));
        assert_eq!(symbols.label("end"), Some(0x204));
        assert_eq!(jobs[2].addr, 0x204);
        assert_eq!(jobs[2].fixup, Some(Fixup::ResolveAddress("start".into())));
        assert_eq!(jobs[2].max, 0xFFF);
    }

    #[test]
    fn test_const_emits_nothing() {
        let tokens = tokenize(&["const speed 0x10", "add v1, $speed"]);
        let (jobs, symbols) = generate_jobs(&tokens).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].base, 0x7100);
        assert_eq!(jobs[0].fixup, Some(Fixup::ResolveConstant("speed".into())));
        assert_eq!(symbols.constant("speed"), Some(0x10));
    }

    #[test]
    fn test_missing_operand_position() {
        let tokens = tokenize(&["ld v0,"]);
        let err = generate_jobs(&tokens).unwrap_err();
        assert_eq!(err.reason, Reason::MissingOperand("operand"));
        assert_eq!((err.line, err.col), (1, 6));
    }
}
