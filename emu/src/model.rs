use c8arch::{
    alu::alu,
    font::{FONT, FONT_ADDR, GLYPH_SIZE},
    Op, ADDR_MAX, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, V,
};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::{fmt::Display, ops::Range};

use crate::error::{Fault, LoadError};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Halt when a jump or call lands on an identical jump or call.
    pub self_loop_trap: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            self_loop_trap: true,
        }
    }
}

/// Outcome of one [`Machine::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    Executed { addr: u16, op: Op },
    /// `ld vx, k` with no key latched. PC stays on the instruction.
    Waiting { addr: u16 },
    Halted(Fault),
}

type Frame = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

pub struct Machine {
    ram: [u8; MEMORY_SIZE],
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_SIZE],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    display: Frame,
    keys: [bool; KEY_COUNT],
    last_key: Option<u8>,
    halted: Option<Fault>,
    program: Vec<u8>,
    config: Config,
    rng: Box<dyn RngCore>,
    log: Option<Box<dyn FnMut(&Fault)>>,
}

impl Machine {
    /// Fresh machine with the font loaded and an entropy-seeded random source.
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Fresh machine with a deterministic random source.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: RngCore + 'static>(config: Config, rng: R) -> Self {
        let mut machine = Machine {
            ram: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: [0; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            display: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            keys: [false; KEY_COUNT],
            last_key: None,
            halted: None,
            program: vec![],
            config,
            rng: Box::new(rng),
            log: None,
        };
        machine.reset();
        machine
    }

    /// Called with every fault as the machine halts.
    pub fn set_log_callback<F: FnMut(&Fault) + 'static>(&mut self, callback: F) {
        self.log = Some(Box::new(callback));
    }

    /// Replaces the program and resets everything else.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge(bytes.len()));
        }
        self.program = bytes.to_vec();
        self.reset();
        tracing::debug!(bytes = bytes.len(), "program loaded");
        Ok(())
    }

    pub fn load_rom_file(&mut self, path: &str) -> Result<(), LoadError> {
        let bytes = std::fs::read(path).map_err(|e| LoadError::FileOpen(path.to_string(), e))?;
        self.load(&bytes)
    }

    /// Zeroes all state, then reloads the font and the current program.
    pub fn reset(&mut self) {
        self.ram = [0; MEMORY_SIZE];
        let font = FONT_ADDR as usize;
        self.ram[font..font + FONT.len()].copy_from_slice(&FONT);
        let start = PROGRAM_START as usize;
        self.ram[start..start + self.program.len()].copy_from_slice(&self.program);

        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.display = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.keys = [false; KEY_COUNT];
        self.last_key = None;
        self.halted = None;
    }

    /// Executes exactly one instruction. Once halted, keeps returning the
    /// same fault without touching any state.
    pub fn step(&mut self) -> Cycle {
        if let Some(fault) = &self.halted {
            return Cycle::Halted(fault.clone());
        }

        let addr = self.pc;
        let word = self.fetch(addr);
        self.pc = (addr + 2) & ADDR_MAX;

        let Some(op) = Op::from_bin(word) else {
            return self.halt(Fault::UnknownOpcode { addr, word });
        };
        tracing::trace!(addr, word, "exec");
        match self.exec(addr, word, op) {
            Ok(cycle) => cycle,
            Err(fault) => self.halt(fault),
        }
    }

    fn halt(&mut self, fault: Fault) -> Cycle {
        if fault.is_error() {
            tracing::error!(%fault, "halted");
        } else {
            tracing::info!(%fault, "halted");
        }
        if let Some(log) = self.log.as_mut() {
            log(&fault);
        }
        self.halted = Some(fault.clone());
        Cycle::Halted(fault)
    }

    /// Clears a halt so stepping continues from the current PC.
    pub fn resume(&mut self) {
        self.halted = None;
    }

    fn exec(&mut self, addr: u16, word: u16, op: Op) -> Result<Cycle, Fault> {
        match op {
            Op::CLS => self.display = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            Op::RET => {
                if self.sp == 0 {
                    return Err(Fault::StackUnderflow { addr });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            Op::JP(nnn) => {
                self.pc = nnn;
                self.trap_self_loop(addr, word)?;
            }
            Op::CALL(nnn) => {
                if self.sp >= STACK_SIZE {
                    return Err(Fault::StackOverflow { addr });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
                self.trap_self_loop(addr, word)?;
            }
            Op::SE(x, kk) => self.skip_if(self.v(x) == kk),
            Op::SNE(x, kk) => self.skip_if(self.v(x) != kk),
            Op::SER(x, y) => self.skip_if(self.v(x) == self.v(y)),
            Op::SNER(x, y) => self.skip_if(self.v(x) != self.v(y)),
            Op::LD(x, kk) => self.set_v(x, kk),
            Op::ADD(x, kk) => self.set_v(x, self.v(x).wrapping_add(kk)),
            Op::CALC(kind, x, y) => {
                let (result, flag) = alu(kind, self.v(x), self.v(y));
                self.set_v(x, result);
                if let Some(flag) = flag {
                    self.set_v(V::VF, flag);
                }
            }
            Op::LDI(nnn) => self.i = nnn,
            Op::JPV0(nnn) => self.pc = (nnn + self.v(V::V0) as u16) & ADDR_MAX,
            Op::RND(x, kk) => {
                let byte: u8 = self.rng.random();
                self.set_v(x, byte & kk);
            }
            Op::DRW(x, y, n) => {
                let collision = self.draw(addr, self.v(x), self.v(y), n)?;
                self.set_v(V::VF, collision as u8);
            }
            Op::SKP(x) => self.skip_if(self.key(self.v(x))),
            Op::SKNP(x) => self.skip_if(!self.key(self.v(x))),
            Op::GETDT(x) => self.set_v(x, self.delay_timer),
            Op::WAITK(x) => match self.last_key.take() {
                Some(key) => self.set_v(x, key),
                None => {
                    self.pc = addr;
                    return Ok(Cycle::Waiting { addr });
                }
            },
            Op::SETDT(x) => self.delay_timer = self.v(x),
            Op::SETST(x) => self.sound_timer = self.v(x),
            Op::ADDI(x) => self.i = self.i.wrapping_add(self.v(x) as u16),
            Op::FONT(x) => self.i = FONT_ADDR + self.v(x) as u16 * GLYPH_SIZE,
            Op::BCD(x) => {
                let value = self.v(x);
                let range = self.span(addr, 3)?;
                self.ram[range].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            Op::STORE(x) => {
                let len = x.index() + 1;
                let range = self.span(addr, len)?;
                self.ram[range].copy_from_slice(&self.v[..len]);
            }
            Op::LOAD(x) => {
                let len = x.index() + 1;
                let range = self.span(addr, len)?;
                self.v[..len].copy_from_slice(&self.ram[range]);
            }
        }
        Ok(Cycle::Executed { addr, op })
    }

    fn fetch(&self, addr: u16) -> u16 {
        let hi = self.ram[(addr & ADDR_MAX) as usize];
        let lo = self.ram[(addr.wrapping_add(1) & ADDR_MAX) as usize];
        u16::from_be_bytes([hi, lo])
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc = (self.pc + 2) & ADDR_MAX;
        }
    }

    fn trap_self_loop(&self, addr: u16, word: u16) -> Result<(), Fault> {
        if self.config.self_loop_trap && self.fetch(self.pc) == word {
            return Err(Fault::SelfLoop { addr });
        }
        Ok(())
    }

    /// `len` bytes starting at I, if they stay inside memory.
    fn span(&self, addr: u16, len: usize) -> Result<Range<usize>, Fault> {
        let start = self.i as usize;
        if start + len > MEMORY_SIZE {
            return Err(Fault::SegFault {
                addr,
                index: self.i,
                len,
            });
        }
        Ok(start..start + len)
    }

    /// XORs an `n`-row sprite from I onto the display, wrapping at the edges.
    /// Returns whether any lit pixel was turned off.
    fn draw(&mut self, addr: u16, x: u8, y: u8, n: u8) -> Result<bool, Fault> {
        let start = self.i as usize;
        let end = start + n as usize;
        if end > ADDR_MAX as usize {
            return Err(Fault::SegFault {
                addr,
                index: self.i,
                len: n as usize,
            });
        }

        let mut collision = false;
        for (row, byte) in self.ram[start..end].iter().enumerate() {
            let py = (y as usize + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let px = (x as usize + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.display[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        Ok(collision)
    }

    // ------------------------------------------------------------------------
    // Timers and keys

    /// Decrements both timers toward zero. Driven by the caller at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Marks `key` down and latches it for `ld vx, k`. Keys above 0xF are ignored.
    pub fn press(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = true;
            self.last_key = Some(key);
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    pub fn clear_latch(&mut self) {
        self.last_key = None;
    }

    pub fn key(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn last_key(&self) -> Option<u8> {
        self.last_key
    }

    // ------------------------------------------------------------------------
    // Accessors

    pub fn v(&self, reg: V) -> u8 {
        self.v[reg.index()]
    }

    pub fn set_v(&mut self, reg: V, value: u8) {
        self.v[reg.index()] = value;
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, value: u16) {
        self.i = value;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Return addresses currently on the stack, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.ram[(addr & ADDR_MAX) as usize]
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.ram[(addr & ADDR_MAX) as usize] = value;
    }

    pub fn memory(&self) -> &[u8] {
        &self.ram
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.display[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn display(&self) -> &Frame {
        &self.display
    }

    pub fn halted(&self) -> Option<&Fault> {
        self.halted.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Register summary: `V0`..`VF` three per line, then I and PC, then the
    /// timers and SP.
    pub fn reg_info(&self) -> String {
        let mut buf = String::new();
        for (idx, value) in self.v.iter().enumerate() {
            buf += &format!("V{:X} = 0x{:02x}; ", idx, value);
            if idx % 3 == 2 {
                buf.push('\n');
            }
        }
        buf += &format!("\nI  = 0x{:04x}; PC = 0x{:04x};\n", self.i, self.pc);
        buf += &format!(
            "ST = 0x{:02x}; DT = 0x{:02x}; SP = {}\n",
            self.sound_timer, self.delay_timer, self.sp
        );
        buf
    }

    /// One string per display row, `#` for lit pixels and `.` otherwise.
    pub fn display_rows(&self) -> Vec<String> {
        self.display
            .iter()
            .map(|row| row.iter().map(|&lit| if lit { '#' } else { '.' }).collect())
            .collect()
    }
}

impl Display for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reg_info())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
