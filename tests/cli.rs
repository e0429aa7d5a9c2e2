//! Headless runner: failures are logged and reported through the exit code

#![cfg(not(target_arch = "wasm32"))]

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quantity-catch"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run quantity-catch")
}

#[test]
fn missing_pack_fails_with_logged_error() {
    let output = run(&["no/such/pack.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "{stderr}");
    assert!(stderr.contains("failed to read content pack"), "{stderr}");
}

#[test]
fn unknown_game_fails_with_logged_error() {
    let output = run(&["--game", "99"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot start game 99"), "{stderr}");
}

#[test]
fn builtin_catalog_runs_to_the_end() {
    let output = run(&["--seed", "0", "--max-ticks", "10000"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("level 1: collect"), "{stdout}");
}
