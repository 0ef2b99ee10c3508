use c8asm::{util, FileError};
use clap::{error::ErrorKind, Parser};
use color_print::cprintln;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::Level;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Parser)]
#[command(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Assemble a source file into a binary image
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "disassemble")]
    assemble: Option<PathBuf>,

    /// Disassemble a binary image into source text
    #[arg(short, long, value_name = "IMAGE")]
    disassemble: Option<PathBuf>,

    /// Output file [default: input with `.ch8` or `.asm` appended]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print the banner
    #[arg(short = 'n', long)]
    no_splash: bool,

    /// Print the assembled listing
    #[arg(long)]
    dump: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

/// Either the assembler reported a diagnostic or the file system failed.
enum Failure {
    Assembly,
    File(FileError),
}

impl From<FileError> for Failure {
    fn from(err: FileError) -> Self {
        Failure::File(err)
    }
}

fn with_extension(input: &Path, ext: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(ext);
    PathBuf::from(name)
}

fn read_source(path: &Path) -> Result<Vec<String>, FileError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| FileError::FileRead(path.display().to_string(), e))?;
    Ok(text.lines().map(str::to_string).collect())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), FileError> {
    use std::io::Write;
    let name = path.display().to_string();
    let mut file = std::fs::File::create(path).map_err(|e| FileError::FileCreate(name.clone(), e))?;
    file.write_all(contents)
        .map_err(|e| FileError::FileWrite(name, e))
}

fn assemble_file(input: &Path, output: &Path, dump: bool) -> Result<(), Failure> {
    println!("  < {}", input.display());
    let lines = read_source(input)?;

    let assembly = match c8asm::assemble_program(&lines) {
        Ok(assembly) => assembly,
        Err(err) => {
            tracing::debug!(category = ?err.category(), "assembly failed");
            err.print_diag(&input.display().to_string(), &lines);
            return Err(Failure::Assembly);
        }
    };

    if dump {
        util::print_dump(&input.display().to_string(), &lines, &assembly);
    }

    println!("  > {}", output.display());
    write_file(output, &assembly.to_bytes())?;
    tracing::info!(words = assembly.words.len(), "wrote image");
    Ok(())
}

fn disassemble_file(input: &Path, output: &Path) -> Result<(), Failure> {
    println!("  < {}", input.display());
    let bytes = std::fs::read(input)
        .map_err(|e| FileError::FileOpen(input.display().to_string(), e))?;
    if bytes.len() % 2 == 1 {
        tracing::warn!(len = bytes.len(), "odd image length, last word padded with 0x00");
    }

    let mut text = c8arch::disasm::decode_bytes(&bytes).join("\n");
    text.push('\n');

    println!("  > {}", output.display());
    write_file(output, text.as_bytes())?;
    Ok(())
}

/// Usage errors exit 1 like every other failure; help and version exit 0.
fn usage(err: clap::Error) -> ExitCode {
    // Nothing left to report if stdout/stderr are gone.
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

    if !args.no_splash {
        cprintln!(
            "<bold>c8asm</> {} : CHIP-8 assembler and disassembler",
            env!("CARGO_PKG_VERSION")
        );
    }

    let result = match (&args.assemble, &args.disassemble) {
        (Some(input), _) => {
            let output = args.output.clone().unwrap_or_else(|| with_extension(input, ".ch8"));
            assemble_file(input, &output, args.dump)
        }
        (None, Some(input)) => {
            let output = args.output.clone().unwrap_or_else(|| with_extension(input, ".asm"));
            disassemble_file(input, &output)
        }
        (None, None) => {
            cprintln!("<red,bold>error</>: one of --assemble or --disassemble is required");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => {
            if !args.no_splash {
                println!("Done.");
            }
            ExitCode::SUCCESS
        }
        Err(Failure::Assembly) => ExitCode::FAILURE,
        Err(Failure::File(err)) => {
            cprintln!("<red,bold>error</>: {}", err);
            if let Some(source) = std::error::Error::source(&err) {
                cprintln!("  <blue>caused by</>: {}", source);
            }
            ExitCode::FAILURE
        }
    }
}
