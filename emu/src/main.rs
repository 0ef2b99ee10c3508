use c8emu::hooks::{dump::Dump, keys::Keys, run, sound::Sound, timer::Timer, Hook};
use c8emu::{Config, Machine};
use clap::{error::ErrorKind, Parser};
use color_print::cprintln;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "c8emu", version, about = "Headless emulator for CHIP-8 images")]
struct Args {
    /// Stop after this many cycles
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// Cycles executed per 60 Hz timer frame
    #[arg(short, long, default_value_t = 5)]
    cycles_per_frame: u64,

    /// Seed for `rnd`, entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Keep running when a jump lands on itself
    #[arg(long)]
    no_trap: bool,

    /// YAML file choosing addresses to dump state at
    #[arg(short, long)]
    dump_cfg: Option<String>,

    /// Dump state after every cycle
    #[arg(short = 'a', long)]
    dump_all: bool,

    /// YAML file with scripted key presses
    #[arg(short, long)]
    keys_cfg: Option<String>,

    /// Print the display when the run ends
    #[arg(short, long)]
    screen: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    #[arg(default_value = "main.ch8")]
    input_file: String,
}

fn hooks(args: &Args) -> Result<Vec<Box<dyn Hook>>, c8emu::hooks::ConfigError> {
    let hooks: Vec<Box<dyn Hook>> = vec![
        Box::new(Keys::arg(args.keys_cfg.clone())?),
        Box::new(Timer::new(args.cycles_per_frame)),
        Box::new(Dump::arg(args.dump_cfg.clone(), args.dump_all)?),
        Box::new(Sound::default()),
    ];
    Ok(hooks)
}

fn usage(err: clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return usage(err),
    };
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize machine
    let config = Config {
        self_loop_trap: !args.no_trap,
    };
    let mut machine = match args.seed {
        Some(seed) => Machine::with_seed(config, seed),
        None => Machine::new(config),
    };
    if let Err(err) = machine.load_rom_file(&args.input_file) {
        cprintln!("<red,bold>error</>: {}", err);
        return ExitCode::FAILURE;
    }

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks = match hooks(&args) {
        Ok(hooks) => hooks,
        Err(err) => {
            cprintln!("<red,bold>error</>: {}", err);
            return ExitCode::FAILURE;
        }
    };
    for hook in hooks.iter_mut() {
        hook.init(&mut machine);
    }

    // ------------------------------------------------------------------------
    // Main loop
    let last = run(&mut machine, &mut hooks, args.tmax.unwrap_or(u64::MAX));

    // Exit
    println!("=================================================");
    print!("{}", machine.reg_info());
    if args.screen {
        for row in machine.display_rows() {
            println!("{}", row);
        }
    }
    match last {
        Some(fault) if fault.is_error() => {
            cprintln!("<red,bold>halted</>: {}", fault);
            ExitCode::FAILURE
        }
        Some(fault) => {
            cprintln!("<green>finished</>: {}", fault);
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}
