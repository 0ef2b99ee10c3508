//! CHIP-8 virtual machine. The caller owns the clock: it drives
//! [`Machine::step`] and decrements the timers with [`Machine::tick_timers`].

mod error;
pub mod hooks;
mod model;

pub use error::{Fault, LoadError};
pub use model::{Config, Cycle, Machine, DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, STACK_SIZE};
