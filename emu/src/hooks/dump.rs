use c8arch::V;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{read_yaml, ConfigError, Hook};
use crate::model::{Cycle, Machine};

/// Prints machine state after instructions at chosen addresses.
///
/// ```yaml
/// 0x20A: { stack: true, heap: [0x300, 0x301] }
/// 0x210: { regs: [v0, vf] }
/// ```
#[derive(Debug, Default)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct List(HashMap<u16, Config>);

#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    /// Registers to show; all of them when empty.
    #[serde(default)]
    regs: Vec<V>,
    #[serde(default)]
    stack: bool,
    #[serde(default)]
    heap: Vec<u16>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, ConfigError> {
        let list = match &file {
            Some(fname) => read_yaml(fname)?,
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    fn get(&self, addr: u16) -> Option<&Config> {
        self.list.0.get(&addr)
    }
}

impl Hook for Dump {
    fn init(&mut self, _machine: &mut Machine) {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
    }

    fn exec(&mut self, _time: u64, cycle: &Cycle, machine: &mut Machine) {
        let Cycle::Executed { addr, op } = cycle else {
            return;
        };
        if let Some(cfg) = self.get(*addr) {
            println!(" [{:03X}] {}", addr, op);
            if cfg.regs.is_empty() {
                print_reg(machine);
            } else {
                print_selected(machine, &cfg.regs);
            }
            if cfg.stack {
                print_stack(machine);
            }
            print_heap(machine, &cfg.heap);
        } else if self.all {
            println!(" [{:03X}] {}", addr, op);
            print_reg(machine);
        }
    }
}

fn print_reg(machine: &Machine) {
    println!(" +---------------------------------------------+");
    for line in machine.reg_info().lines().filter(|l| !l.is_empty()) {
        println!(" | {:<43} |", line.trim_end());
    }
    println!(" +---------------------------------------------+");
}

fn print_selected(machine: &Machine, regs: &[V]) {
    println!(" +---------------------------------------------+");
    for reg in regs {
        println!(" | {:<3} = 0x{:02x}                                 |", reg, machine.v(*reg));
    }
    println!(" +---------------------------------------------+");
}

fn print_stack(machine: &Machine) {
    for (depth, ret) in machine.stack().iter().enumerate().rev() {
        println!(" | #{:<2} : {:03X}                                  |", depth, ret);
    }
    println!(" +---------------------------------------------+");
}

fn print_heap(machine: &Machine, addrs: &[u16]) {
    for addr in addrs {
        println!(
            " | {:03X} : {:02X}                                   |",
            addr,
            machine.peek(*addr)
        );
    }
    println!(" +---------------------------------------------+");
}

#[test]
fn test_parse() {
    let list: List = serde_yaml::from_str("522: { stack: true }\n528: { regs: [v0, vf] }\n").unwrap();
    assert!(list.0[&0x20A].stack);
    assert_eq!(list.0[&0x210].regs, vec![V::V0, V::VF]);
    assert!(list.0[&0x210].heap.is_empty());
}
