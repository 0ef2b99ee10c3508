use thiserror::Error;

/// Reasons the machine stops executing. `addr` is the address of the word
/// that caused the halt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("Unknown opcode 0x{word:04X} at 0x{addr:03X}")]
    UnknownOpcode { addr: u16, word: u16 },

    #[error("Stack overflow at 0x{addr:03X}")]
    StackOverflow { addr: u16 },

    #[error("Return with empty stack at 0x{addr:03X}")]
    StackUnderflow { addr: u16 },

    #[error("Memory access out of range at 0x{addr:03X}: I=0x{index:04X}, {len} bytes")]
    SegFault { addr: u16, index: u16, len: usize },

    #[error("Caught endless loop at 0x{addr:03X}")]
    SelfLoop { addr: u16 },
}

impl Fault {
    /// A self-loop is how programs conventionally finish.
    pub fn is_error(&self) -> bool {
        !matches!(self, Fault::SelfLoop { .. })
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Program too large: {0} bytes, at most 3584 fit")]
    TooLarge(usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),
}
