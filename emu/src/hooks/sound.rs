use color_print::cprintln;

use super::Hook;
use crate::model::{Cycle, Machine};

/// Reports when the sound timer starts and stops the buzzer.
#[derive(Debug, Default)]
pub struct Sound {
    active: bool,
}

impl Hook for Sound {
    fn exec(&mut self, time: u64, _cycle: &Cycle, machine: &mut Machine) {
        let active = machine.sound_timer() > 0;
        if active == self.active {
            return;
        }
        self.active = active;
        let state = if active { "on" } else { "off" };
        cprintln!(" <y>♪</> buzzer {} at cycle {}", state, time);
    }
}

#[test]
fn test_edges() {
    let mut sound = Sound::default();
    let mut machine = Machine::with_seed(Default::default(), 0);
    let cycle = Cycle::Waiting { addr: 0x200 };

    sound.exec(0, &cycle, &mut machine);
    assert!(!sound.active);
    machine.set_sound_timer(2);
    sound.exec(1, &cycle, &mut machine);
    assert!(sound.active);
    machine.tick_timers();
    machine.tick_timers();
    sound.exec(2, &cycle, &mut machine);
    assert!(!sound.active);
}
