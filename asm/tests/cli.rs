use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn c8asm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_c8asm"))
        .args(args)
        .output()
        .unwrap()
}

macro_rules! exit {
    ($name:ident, [$($arg:expr),*], $code:expr) => {
        #[test]
        fn $name() {
            assert_eq!(c8asm(&[$($arg),*]).status.code(), Some($code));
        }
    };
}

exit!(no_args, [], 1);
exit!(unknown_flag, ["--bogus"], 1);
exit!(both_modes, ["-a", "a.asm", "-d", "a.ch8"], 1);
exit!(missing_value, ["-a"], 1);
exit!(help, ["--help"], 0);
exit!(version, ["--version"], 0);
exit!(missing_file, ["-n", "-a", "/nonexistent/prog.asm"], 1);

#[test]
fn test_assemble_writes_image() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("prog.asm");
    fs::write(&src, "loop: jp [loop]\n").unwrap();

    let out = c8asm(&["-n", "-a", src.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read(dir.path().join("prog.asm.ch8")).unwrap(), vec![0x12, 0x00]);
}

#[test]
fn test_assembly_error_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("bad.asm");
    let image = dir.path().join("bad.ch8");
    fs::write(&src, "cls\nld v0, 256\n").unwrap();

    let out = c8asm(&["-n", "-a", src.to_str().unwrap(), "-o", image.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!image.exists());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ld v0, 256"));
}
