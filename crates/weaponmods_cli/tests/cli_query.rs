use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn reference_dir() -> String {
    workspace_root()
        .join("tests/fixtures/reference")
        .to_string_lossy()
        .to_string()
}

fn game_data_dir() -> String {
    workspace_root()
        .join("tests/fixtures/game")
        .to_string_lossy()
        .to_string()
}

fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_weaponmods"));
    command
        .env_remove("WEAPONMODS_DATA_DIR")
        .env_remove("WEAPONMODS_REFERENCE_DIR")
        .env_remove("RUST_LOG");
    command
}

fn run_cli(args: &[&str]) -> Output {
    command()
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run weaponmods CLI")
}

fn run_cli_with_input(args: &[&str], input: &str) -> Output {
    let mut child = command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start weaponmods CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child
        .wait_with_output()
        .expect("failed to wait for weaponmods CLI")
}

#[test]
fn query_flag_prints_article() {
    let reference = reference_dir();
    let game = game_data_dir();
    let output = run_cli(&["--reference-dir", &reference, "--query", "Chaotic", &game]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("{{Infobox item\n"));
    assert!(stdout.contains("The '''Chaotic Receiver''' is a [[Fallout 4 weapon mods|weapon mod]]"));
    assert!(stdout.contains("{{Navbox weapon mods FO4}}"));
    assert!(!stdout.contains("Enter weapon mod name"));
}

#[test]
fn repeated_queries_run_in_order() {
    let reference = reference_dir();
    let game = game_data_dir();
    let output = run_cli(&[
        "--reference-dir",
        &reference,
        "--query",
        "Plasma Thrower",
        "--query",
        "Heavy Grip",
        &game,
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let missing = stdout
        .find("No weapon mods by the name `Plasma Thrower` were found.")
        .expect("missing query should be reported");
    let article = stdout
        .find("The '''Heavy Grip'''")
        .expect("heavy grip should be rendered");
    assert!(missing < article);
}

#[test]
fn json_flag_prints_resolved_records() {
    let reference = reference_dir();
    let game = game_data_dir();
    let output = run_cli(&[
        "--reference-dir",
        &reference,
        "--json",
        "--query",
        "Chaotic",
        &game,
    ]);
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["name"], "Chaotic Receiver");
    assert_eq!(value["mods"][0]["weapon"]["keyword"], "ma_10mm");
}

#[test]
fn interactive_mode_skips_blank_lines_and_exits_at_end_of_input() {
    let reference = reference_dir();
    let game = game_data_dir();
    let output = run_cli_with_input(&["--reference-dir", &reference, &game], "\n   \nChaotic\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Enter weapon mod name: ").count(), 4);
    assert!(stdout.contains("The '''Chaotic Receiver'''"));
}

#[test]
fn prompts_for_location_when_not_given() {
    let reference = reference_dir();
    let input = format!("{}\nCalibrated\n", game_data_dir());
    let output = run_cli_with_input(&["--reference-dir", &reference], &input);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Enter JSON location: Enter weapon mod name: "));
    assert!(stdout.contains("{{Games|FO4AUT|FO4}}"));
}

#[test]
fn data_dirs_can_come_from_environment() {
    let output = command()
        .env("WEAPONMODS_REFERENCE_DIR", reference_dir())
        .env("WEAPONMODS_DATA_DIR", game_data_dir())
        .args(["--query", "Chaotic"])
        .stdin(Stdio::null())
        .output()
        .expect("failed to run weaponmods CLI");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("{{ID|01a2b3}}"));
}

#[test]
fn unloadable_data_exits_with_status_1() {
    let dir = tempfile::tempdir().expect("tempdir");
    let empty = dir.path().to_string_lossy().to_string();
    let output = run_cli(&["--reference-dir", &empty, "--query", "Chaotic", &empty]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading weapon mod data"));
    assert!(stderr.contains("esms.json"));
}

#[test]
fn no_location_at_end_of_input_exits_with_status_1() {
    let output = run_cli_with_input(&["--query", "Chaotic"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No JSON location entered"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let output = run_cli(&["--bogus"]);
    assert_eq!(output.status.code(), Some(2));
}
