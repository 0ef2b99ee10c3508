use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn c8emu(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_c8emu"))
        .args(args)
        .output()
        .unwrap()
}

/// Runs `image` to completion and returns the exit code.
fn run_image(image: &[u8]) -> Option<i32> {
    let dir = TempDir::new().unwrap();
    let rom = dir.path().join("rom.ch8");
    fs::write(&rom, image).unwrap();
    c8emu(&["--seed", "1", "-t", "1000", rom.to_str().unwrap()]).status.code()
}

#[test]
fn test_usage_errors() {
    assert_eq!(c8emu(&["--bogus"]).status.code(), Some(1));
    assert_eq!(c8emu(&["--seed", "x"]).status.code(), Some(1));
    assert_eq!(c8emu(&["--help"]).status.code(), Some(0));
}

#[test]
fn test_missing_rom() {
    assert_eq!(c8emu(&["/nonexistent/rom.ch8"]).status.code(), Some(1));
}

#[test]
fn test_exit_status() {
    // ld v0, 1; jp 0x202
    assert_eq!(run_image(&[0x60, 0x01, 0x12, 0x02]), Some(0));
    // unknown opcode 0x5001
    assert_eq!(run_image(&[0x50, 0x01]), Some(1));
}
