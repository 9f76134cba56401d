use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

const ENV_OVERRIDES: [&str; 4] = [
    "DRAMADESK_DATABASE_URL",
    "DRAMADESK_DATABASE_KEY",
    "DRAMADESK_API_URL",
    "DRAMADESK_API_TOKEN",
];

/// Run the CLI with a custom HOME directory for isolated config storage.
pub fn run_cli_with_env(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dramadesk"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NO_COLOR", "1");
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path) -> String {
    let output = run_cli_with_env(args, home);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// The JSON documents printed on stdout, one per line.
pub fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect()
}

/// The single JSON document printed on stdout.
pub fn json_record(stdout: &str) -> Value {
    let mut records = json_lines(stdout);
    assert_eq!(records.len(), 1, "expected one record in {stdout:?}");
    records.remove(0)
}
