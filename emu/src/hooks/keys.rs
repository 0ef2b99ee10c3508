use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{read_yaml, ConfigError, Hook};
use crate::model::{Cycle, Machine};

/// Scripted keypad input, keyed by cycle number.
///
/// ```yaml
/// 120: { press: [5] }
/// 180: { release: [5], press: [0xA] }
/// ```
#[derive(Debug, Default)]
pub struct Keys {
    file: Option<String>,
    list: List,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct List(HashMap<u64, Event>);

#[derive(Debug, Default, Serialize, Deserialize)]
struct Event {
    #[serde(default)]
    press: Vec<u8>,
    #[serde(default)]
    release: Vec<u8>,
}

impl Keys {
    pub fn arg(file: Option<String>) -> Result<Self, ConfigError> {
        match file {
            Some(fname) => Ok(Self {
                list: read_yaml(&fname)?,
                file: Some(fname),
            }),
            None => Ok(Self::default()),
        }
    }
}

impl Hook for Keys {
    fn init(&mut self, _machine: &mut Machine) {
        if let Some(fname) = &self.file {
            println!(" * Keys[{}] {:?}", self.list.0.len(), fname);
        }
    }

    fn exec(&mut self, time: u64, _cycle: &Cycle, machine: &mut Machine) {
        if let Some(event) = self.list.0.get(&time) {
            for key in &event.release {
                machine.release(*key);
            }
            for key in &event.press {
                tracing::debug!(time, key, "key press");
                machine.press(*key);
            }
        }
    }
}

#[test]
fn test_parse() {
    let list: List = serde_yaml::from_str("3: { press: [5] }\n7: { release: [5] }\n").unwrap();
    let mut keys = Keys { file: None, list };
    let mut machine = Machine::with_seed(Default::default(), 0);
    let cycle = Cycle::Waiting { addr: 0x200 };

    keys.exec(3, &cycle, &mut machine);
    assert!(machine.key(5));
    assert_eq!(machine.last_key(), Some(5));
    keys.exec(7, &cycle, &mut machine);
    assert!(!machine.key(5));
}

#[cfg(test)]
fn waiting_program(press_at: u64) -> (Machine, Vec<Box<dyn Hook>>) {
    use c8arch::{Op, V};

    let ops = [Op::LD(V::V1, 1), Op::LD(V::V1, 2), Op::WAITK(V::V0), Op::JP(0x206)];
    let image: Vec<u8> = ops.iter().flat_map(|op| op.to_bin().to_be_bytes()).collect();
    let mut machine = Machine::with_seed(Default::default(), 0);
    machine.load(&image).unwrap();

    let list: List = serde_yaml::from_str(&format!("{}: {{ press: [5] }}\n", press_at)).unwrap();
    let hooks: Vec<Box<dyn Hook>> = vec![Box::new(Keys { file: None, list })];
    (machine, hooks)
}

#[test]
fn test_press_reaches_next_cycle() {
    let (mut machine, mut hooks) = waiting_program(1);
    let fault = super::run(&mut machine, &mut hooks, 10);
    assert_eq!(fault, Some(crate::Fault::SelfLoop { addr: 0x206 }));
    assert_eq!(machine.v(c8arch::V::V0), 5);
}

#[test]
fn test_stale_press_is_dropped() {
    let (mut machine, mut hooks) = waiting_program(0);
    assert_eq!(super::run(&mut machine, &mut hooks, 10), None);
    assert_eq!(machine.pc(), 0x204);
    assert_eq!(machine.v(c8arch::V::V0), 0);
    assert!(machine.key(5));
}
