//! Common test utilities for minishell integration tests

use assert_cmd::Command;

/// The built binary, with a minimal controlled environment.
pub fn minishell() -> Command {
    let mut cmd = Command::cargo_bin("minishell").expect("binary builds");
    cmd.env_clear()
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .env("HOME", std::env::var("HOME").unwrap_or_default());
    cmd
}

/// Run a single line through `-c`.
pub fn run_line(line: &str) -> Command {
    let mut cmd = minishell();
    cmd.arg("-c").arg(line);
    cmd
}
