use crate::{alu::Alu, mnemonic::Mnemonic, reg::V};
use color_print::cformat;
use std::fmt::Display;

/// One decoded machine word.
///
/// Every variant maps to exactly one 16-bit word via [`Op::to_bin`], and
/// [`Op::from_bin`] recognizes exactly the words produced that way. The
/// assembler, the disassembler and the CPU all go through this type, so they
/// agree on the encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `00E0`
    CLS,
    /// `00EE`
    RET,
    /// `1nnn`
    JP(u16),
    /// `2nnn`
    CALL(u16),
    /// `3xkk` skip if `vx == kk`
    SE(V, u8),
    /// `4xkk` skip if `vx != kk`
    SNE(V, u8),
    /// `5xy0` skip if `vx == vy`
    SER(V, V),
    /// `6xkk`
    LD(V, u8),
    /// `7xkk` add without flag
    ADD(V, u8),
    /// `8xyN` register-register ALU. Shifts ignore `vy` but keep it in the word.
    CALC(Alu, V, V),
    /// `9xy0` skip if `vx != vy`
    SNER(V, V),
    /// `Annn`
    LDI(u16),
    /// `Bnnn` jump to `nnn + v0`
    JPV0(u16),
    /// `Cxkk` random byte masked with `kk`
    RND(V, u8),
    /// `Dxyn`
    DRW(V, V, u8),
    /// `Ex9E`
    SKP(V),
    /// `ExA1`
    SKNP(V),
    /// `Fx07` `ld vx, dt`
    GETDT(V),
    /// `Fx0A` `ld vx, k`
    WAITK(V),
    /// `Fx15` `ld dt, vx`
    SETDT(V),
    /// `Fx18` `ld st, vx`
    SETST(V),
    /// `Fx1E` `add i, vx`
    ADDI(V),
    /// `Fx29` `ld f, vx`
    FONT(V),
    /// `Fx33` `ld b, vx`
    BCD(V),
    /// `Fx55` `ld [i], vx`
    STORE(V),
    /// `Fx65` `ld vx, [i]`
    LOAD(V),
}

fn enc_nnn(top: u16, nnn: u16) -> u16 {
    top << 12 | nnn & 0xFFF
}

fn enc_xkk(top: u16, x: V, kk: u8) -> u16 {
    top << 12 | (x.index() as u16) << 8 | kk as u16
}

fn enc_xyn(top: u16, x: V, y: V, n: u8) -> u16 {
    top << 12 | (x.index() as u16) << 8 | (y.index() as u16) << 4 | (n & 0xF) as u16
}

/// Splits a word into `(top, x, y, n, kk, nnn)`.
fn dec_format(bin: u16) -> (u8, V, V, u8, u8, u16) {
    (
        (bin >> 12) as u8,
        V::nibble(bin >> 8),
        V::nibble(bin >> 4),
        (bin & 0xF) as u8,
        (bin & 0xFF) as u8,
        bin & 0xFFF,
    )
}

impl Op {
    pub fn to_bin(&self) -> u16 {
        match *self {
            Op::CLS => 0x00E0,
            Op::RET => 0x00EE,
            Op::JP(nnn) => enc_nnn(0x1, nnn),
            Op::CALL(nnn) => enc_nnn(0x2, nnn),
            Op::SE(x, kk) => enc_xkk(0x3, x, kk),
            Op::SNE(x, kk) => enc_xkk(0x4, x, kk),
            Op::SER(x, y) => enc_xyn(0x5, x, y, 0),
            Op::LD(x, kk) => enc_xkk(0x6, x, kk),
            Op::ADD(x, kk) => enc_xkk(0x7, x, kk),
            Op::CALC(alu, x, y) => enc_xyn(0x8, x, y, alu.into()),
            Op::SNER(x, y) => enc_xyn(0x9, x, y, 0),
            Op::LDI(nnn) => enc_nnn(0xA, nnn),
            Op::JPV0(nnn) => enc_nnn(0xB, nnn),
            Op::RND(x, kk) => enc_xkk(0xC, x, kk),
            Op::DRW(x, y, n) => enc_xyn(0xD, x, y, n),
            Op::SKP(x) => enc_xkk(0xE, x, 0x9E),
            Op::SKNP(x) => enc_xkk(0xE, x, 0xA1),
            Op::GETDT(x) => enc_xkk(0xF, x, 0x07),
            Op::WAITK(x) => enc_xkk(0xF, x, 0x0A),
            Op::SETDT(x) => enc_xkk(0xF, x, 0x15),
            Op::SETST(x) => enc_xkk(0xF, x, 0x18),
            Op::ADDI(x) => enc_xkk(0xF, x, 0x1E),
            Op::FONT(x) => enc_xkk(0xF, x, 0x29),
            Op::BCD(x) => enc_xkk(0xF, x, 0x33),
            Op::STORE(x) => enc_xkk(0xF, x, 0x55),
            Op::LOAD(x) => enc_xkk(0xF, x, 0x65),
        }
    }

    /// `None` for words outside the encoding table.
    pub fn from_bin(bin: u16) -> Option<Op> {
        let (top, x, y, n, kk, nnn) = dec_format(bin);
        let op = match top {
            0x0 => match bin {
                0x00E0 => Op::CLS,
                0x00EE => Op::RET,
                _ => return None,
            },
            0x1 => Op::JP(nnn),
            0x2 => Op::CALL(nnn),
            0x3 => Op::SE(x, kk),
            0x4 => Op::SNE(x, kk),
            0x5 if n == 0 => Op::SER(x, y),
            0x6 => Op::LD(x, kk),
            0x7 => Op::ADD(x, kk),
            0x8 => Op::CALC(Alu::from_nibble(n)?, x, y),
            0x9 if n == 0 => Op::SNER(x, y),
            0xA => Op::LDI(nnn),
            0xB => Op::JPV0(nnn),
            0xC => Op::RND(x, kk),
            0xD => Op::DRW(x, y, n),
            0xE => match kk {
                0x9E => Op::SKP(x),
                0xA1 => Op::SKNP(x),
                _ => return None,
            },
            0xF => match kk {
                0x07 => Op::GETDT(x),
                0x0A => Op::WAITK(x),
                0x15 => Op::SETDT(x),
                0x18 => Op::SETST(x),
                0x1E => Op::ADDI(x),
                0x29 => Op::FONT(x),
                0x33 => Op::BCD(x),
                0x55 => Op::STORE(x),
                0x65 => Op::LOAD(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }

    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Op::CLS => Mnemonic::Cls,
            Op::RET => Mnemonic::Ret,
            Op::JP(_) | Op::JPV0(_) => Mnemonic::Jp,
            Op::CALL(_) => Mnemonic::Call,
            Op::SE(..) | Op::SER(..) => Mnemonic::Se,
            Op::SNE(..) | Op::SNER(..) => Mnemonic::Sne,
            Op::ADD(..) | Op::ADDI(_) => Mnemonic::Add,
            Op::CALC(alu, ..) => match alu {
                Alu::Ld => Mnemonic::Ld,
                Alu::Or => Mnemonic::Or,
                Alu::And => Mnemonic::And,
                Alu::Xor => Mnemonic::Xor,
                Alu::Add => Mnemonic::Add,
                Alu::Sub => Mnemonic::Sub,
                Alu::Shr => Mnemonic::Shr,
                Alu::Subn => Mnemonic::Subn,
                Alu::Shl => Mnemonic::Shl,
            },
            Op::RND(..) => Mnemonic::Rnd,
            Op::DRW(..) => Mnemonic::Drw,
            Op::SKP(_) => Mnemonic::Skp,
            Op::SKNP(_) => Mnemonic::Sknp,
            Op::LD(..)
            | Op::LDI(_)
            | Op::GETDT(_)
            | Op::WAITK(_)
            | Op::SETDT(_)
            | Op::SETST(_)
            | Op::FONT(_)
            | Op::BCD(_)
            | Op::STORE(_)
            | Op::LOAD(_) => Mnemonic::Ld,
        }
    }

    /// Operands in source order, formatted so the assembler accepts them back.
    pub fn operands(&self) -> Vec<String> {
        let addr = |nnn: &u16| format!("0x{:03x}", nnn);
        let byte = |kk: &u8| format!("0x{:02x}", kk);
        match self {
            Op::CLS | Op::RET => vec![],
            Op::JP(nnn) | Op::CALL(nnn) => vec![addr(nnn)],
            Op::SE(x, kk) | Op::SNE(x, kk) | Op::LD(x, kk) | Op::ADD(x, kk) | Op::RND(x, kk) => {
                vec![x.to_string(), byte(kk)]
            }
            Op::SER(x, y) | Op::SNER(x, y) => vec![x.to_string(), y.to_string()],
            Op::CALC(alu, x, y) if alu.is_shift() && *y == V::V0 => vec![x.to_string()],
            Op::CALC(_, x, y) => vec![x.to_string(), y.to_string()],
            Op::LDI(nnn) => vec!["i".into(), addr(nnn)],
            Op::JPV0(nnn) => vec![V::V0.to_string(), addr(nnn)],
            Op::DRW(x, y, n) => vec![x.to_string(), y.to_string(), format!("0x{:x}", n)],
            Op::SKP(x) | Op::SKNP(x) => vec![x.to_string()],
            Op::GETDT(x) => vec![x.to_string(), "dt".into()],
            Op::WAITK(x) => vec![x.to_string(), "k".into()],
            Op::SETDT(x) => vec!["dt".into(), x.to_string()],
            Op::SETST(x) => vec!["st".into(), x.to_string()],
            Op::ADDI(x) => vec!["i".into(), x.to_string()],
            Op::FONT(x) => vec!["f".into(), x.to_string()],
            Op::BCD(x) => vec!["b".into(), x.to_string()],
            Op::STORE(x) => vec!["[i]".into(), x.to_string()],
            Op::LOAD(x) => vec![x.to_string(), "[i]".into()],
        }
    }

    pub fn cformat(&self) -> String {
        cformat!(
            "<r>{:<5}</><b>{}</>",
            self.mnemonic().to_string(),
            self.operands().join(", ")
        )
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{} {}", self.mnemonic(), operands.join(", "))
        }
    }
}
