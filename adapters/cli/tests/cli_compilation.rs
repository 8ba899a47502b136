use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "showhouse"])
        .status()
        .expect("failed to invoke cargo check for showhouse CLI binary");

    assert!(status.success(), "cargo check --bin showhouse should succeed");
}

#[test]
fn short_screening_runs_to_completion() {
    let output = Command::new(env!("CARGO_BIN_EXE_showhouse"))
        .args([
            "--reserve",
            "0,2",
            "--buy",
            "2",
            "--max-seconds",
            "2",
            "--frame-ms",
            "50",
        ])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run showhouse binary");

    assert!(
        output.status.success(),
        "showhouse exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn outside_seats_fail_with_a_message() {
    let output = Command::new(env!("CARGO_BIN_EXE_showhouse"))
        .args(["--reserve", "40,0"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run showhouse binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("outside"));
}
