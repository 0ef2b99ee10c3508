pub mod dump;
pub mod keys;
pub mod sound;
pub mod timer;

use crate::error::Fault;
use crate::model::{Cycle, Machine};
use thiserror::Error;

/// Side effects run around every executed cycle.
pub trait Hook {
    fn init(&mut self, _machine: &mut Machine) {}
    fn exec(&mut self, time: u64, cycle: &Cycle, machine: &mut Machine);
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String, #[source] serde_yaml::Error),
}

/// Reads a YAML hook config.
fn read_yaml<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let file = std::fs::File::open(path).map_err(|e| ConfigError::FileOpen(path.to_string(), e))?;
    serde_yaml::from_reader(std::io::BufReader::new(file))
        .map_err(|e| ConfigError::Parse(path.to_string(), e))
}

/// Steps `machine` up to `tmax` cycles, running every hook after each one.
/// Returns the fault that stopped it, if any.
///
/// The key latch is cleared after each step, so a press made by a hook is
/// seen by the next cycle only.
pub fn run(machine: &mut Machine, hooks: &mut [Box<dyn Hook>], tmax: u64) -> Option<Fault> {
    for time in 0..tmax {
        let cycle = machine.step();
        machine.clear_latch();
        for hook in hooks.iter_mut() {
            hook.exec(time, &cycle, machine);
        }
        if let Cycle::Halted(fault) = cycle {
            return Some(fault);
        }
    }
    None
}
