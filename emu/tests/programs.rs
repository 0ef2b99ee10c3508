use c8arch::V;
use c8emu::{Config, Cycle, Fault, Machine};

fn boot(source: &str) -> Machine {
    let lines: Vec<&str> = source.lines().collect();
    let image = c8asm::assemble(&lines).unwrap_or_else(|err| panic!("{}:{}: {}", err.line, err.col, err));
    let mut machine = Machine::with_seed(Config::default(), 1);
    machine.load(&image).unwrap();
    machine
}

/// Steps until the machine halts, returning the fault and the cycle count.
fn run_to_halt(machine: &mut Machine, limit: usize) -> (Fault, usize) {
    for count in 0..limit {
        if let Cycle::Halted(fault) = machine.step() {
            return (fault, count);
        }
    }
    panic!("still running after {} cycles", limit);
}

#[test]
fn test_count_and_draw() {
    let mut m = boot(
        "\
        const limit 10\n\
            ld v0, 0\n\
        loop:\n\
            add v0, 1\n\
            se v0, $limit\n\
            jp [loop]\n\
            ld i, [buf]\n\
            ld b, v0          ; 0 1 0\n\
            ld v2, [i]\n\
            ld f, v1\n\
            drw v3, v4, 5\n\
        done: jp [done]\n\
        buf: dw 0\n\
            dw 0",
    );
    let (fault, cycles) = run_to_halt(&mut m, 1000);
    assert_eq!(fault, Fault::SelfLoop { addr: 0x212 });
    assert_eq!(cycles, 1 + 10 * 3 - 1 + 5);
    assert_eq!((m.v(V::V0), m.v(V::V1), m.v(V::V2)), (0, 1, 0));
    assert_eq!(m.i(), 5);
    assert!(m.pixel(2, 0) && !m.pixel(1, 0));
}

#[test]
fn test_subroutine_with_timer() {
    let mut m = boot(
        "\
            ld v0, 3\n\
            ld dt, v0\n\
        wait:\n\
            call [poll]\n\
            se v1, 0\n\
            jp [wait]\n\
        end: jp [end]\n\
        poll:\n\
            ld v1, dt\n\
            ret",
    );
    let mut ticks = 0;
    loop {
        match m.step() {
            Cycle::Halted(fault) => {
                assert_eq!(fault, Fault::SelfLoop { addr: 0x20A });
                break;
            }
            Cycle::Executed { .. } => {
                ticks += 1;
                if ticks % 5 == 0 {
                    m.tick_timers();
                }
            }
            Cycle::Waiting { .. } => unreachable!(),
        }
        assert!(ticks < 1000);
    }
    assert_eq!(m.delay_timer(), 0);
    assert_eq!(m.sp(), 0);
}

#[test]
fn test_disassembly_runs_identically() {
    let source = "\
        ld v0, 7\n\
        ld v1, 5\n\
        subn v0, v1\n\
        shl v1\n\
        halt: jp [halt]";
    let lines: Vec<&str> = source.lines().collect();
    let image = c8asm::assemble(&lines).unwrap();
    let text = c8arch::disasm::decode_bytes(&image);
    assert_eq!(text[2], "subn v0, v1");

    let mut a = boot(source);
    let mut b = boot(&text.join("\n"));
    run_to_halt(&mut a, 100);
    run_to_halt(&mut b, 100);
    assert_eq!(a.registers(), b.registers());
    assert_eq!(a.v(V::V0), 0xFE);
    assert_eq!(a.v(V::V1), 0x0A);
    assert_eq!(a.v(V::VF), 0);
}
