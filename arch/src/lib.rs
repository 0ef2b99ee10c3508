pub mod alu;
pub mod disasm;
pub mod font;
pub mod keyword;
pub mod mnemonic;
pub mod op;
pub mod reg;

pub use alu::Alu;
pub use keyword::Keyword;
pub use mnemonic::Mnemonic;
pub use op::Op;
pub use reg::V;

/// Size of the address space in bytes.
pub const MEMORY_SIZE: usize = 0x1000;

/// Programs are loaded here and execution starts here.
pub const PROGRAM_START: u16 = 0x200;

/// Largest image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Widest value of a 12-bit address field.
pub const ADDR_MAX: u16 = 0xFFF;
