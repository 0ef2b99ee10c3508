use super::Hook;
use crate::model::{Cycle, Machine};

/// Ticks the timers once per frame, a frame being a fixed number of cycles.
#[derive(Debug)]
pub struct Timer {
    cycles_per_frame: u64,
}

impl Timer {
    pub fn new(cycles_per_frame: u64) -> Self {
        Timer {
            cycles_per_frame: cycles_per_frame.max(1),
        }
    }
}

impl Hook for Timer {
    fn init(&mut self, _machine: &mut Machine) {
        println!(" * Timer: {} cycles/frame", self.cycles_per_frame);
    }

    fn exec(&mut self, time: u64, _cycle: &Cycle, machine: &mut Machine) {
        if (time + 1) % self.cycles_per_frame == 0 {
            machine.tick_timers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Config;

    #[test]
    fn test_frame_cadence() {
        let mut machine = Machine::with_seed(Config::default(), 0);
        machine.set_delay_timer(3);
        let mut timer = Timer::new(5);
        let cycle = Cycle::Waiting { addr: 0x200 };
        for time in 0..10 {
            timer.exec(time, &cycle, &mut machine);
        }
        assert_eq!(machine.delay_timer(), 1);
    }
}
