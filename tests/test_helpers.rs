#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `solace` binary with a clean environment whose
/// database lives at `db_path`. Additional environment variables or arguments
/// can be configured by the caller.
pub fn base_solace_command(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("solace").expect("solace binary not built");
    configure_solace_command(&mut cmd, db_path);
    cmd
}

/// Applies the standard environment to an existing `Command`.
pub fn configure_solace_command(cmd: &mut Command, db_path: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("SOLACE_DB_PATH", db_path);
}

/// Parses command stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}
