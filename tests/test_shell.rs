//! End-to-end tests: single lines through `minishell -c`.

mod common;

use common::{minishell, run_line};
use predicates::prelude::*;
use std::fs;

#[test]
fn echo_hello_world() {
    run_line("echo hello world")
        .assert()
        .success()
        .stdout("hello world\n");
}

#[test]
fn echo_n_suppresses_newline() {
    run_line("echo -n foo").assert().success().stdout("foo");
}

#[test]
fn echo_multiple_n_flags() {
    run_line("echo -n -nn bar").assert().success().stdout("bar");
}

#[test]
fn echo_malformed_flag_prints_literally() {
    run_line("echo -nm foo")
        .assert()
        .success()
        .stdout("-nm foo\n");
}

#[test]
fn quotes_concatenate_into_one_argument() {
    run_line("echo \"hello\"' 'world")
        .assert()
        .success()
        .stdout("hello world\n");
}

#[test]
fn single_quotes_keep_dollar_literal() {
    run_line("echo '$HOME'").assert().success().stdout("$HOME\n");
}

#[test]
fn adjacent_quotes_and_expansion_share_a_slot() {
    let mut cmd = minishell();
    cmd.env("USER", "alice");
    cmd.arg("-c").arg("echo \"hello\"'$PATH'\"$USER\"");
    cmd.assert().success().stdout("hello$PATHalice\n");
}

#[test]
fn unknown_variable_expands_to_nothing() {
    run_line("echo a $DEFINITELYNOTSET9 b")
        .assert()
        .success()
        .stdout("a b\n");
}

#[test]
fn pipeline_of_three() {
    run_line("echo one | cat | cat")
        .assert()
        .success()
        .stdout("one\n");
}

#[test]
fn pipeline_with_external_commands() {
    run_line("echo hello world | wc -w")
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn builtin_output_flows_through_a_pipe() {
    let mut cmd = minishell();
    cmd.env("ZZMARKER", "42");
    cmd.arg("-c").arg("env | grep ZZMARKER");
    cmd.assert().success().stdout("ZZMARKER=42\n");
}

#[test]
fn redirect_out_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = run_line("echo abc > out.txt");
    cmd.current_dir(dir.path());
    cmd.assert().success().stdout("");
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "abc\n"
    );
}

#[test]
fn redirect_out_truncates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("out.txt"), "old content that is long\n").unwrap();
    let mut cmd = run_line("echo new > out.txt");
    cmd.current_dir(dir.path());
    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "new\n"
    );
}

#[test]
fn redirect_append_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("log"), "first\n").unwrap();
    let mut cmd = run_line("echo second >> log");
    cmd.current_dir(dir.path());
    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("log")).unwrap(),
        "first\nsecond\n"
    );
}

#[test]
fn redirect_in_feeds_stdin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "from the file\n").unwrap();
    let mut cmd = run_line("cat < in.txt");
    cmd.current_dir(dir.path());
    cmd.assert().success().stdout("from the file\n");
}

#[test]
fn last_redirection_of_a_kind_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a"), "AAA\n").unwrap();
    fs::write(dir.path().join("b"), "BBB\n").unwrap();
    let mut cmd = run_line("cat < a < b");
    cmd.current_dir(dir.path());
    cmd.assert().success().stdout("BBB\n");
}

#[test]
fn missing_infile_reports_and_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = run_line("cat < missing");
    cmd.current_dir(dir.path());
    cmd.assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains(
            "minishell: missing: No such file or directory",
        ));
}

#[test]
fn command_not_found_diagnostic() {
    run_line("definitely-not-a-command-xyz")
        .assert()
        .success()
        .stderr(predicate::str::contains("minishell: Command not found"));
}

#[test]
fn export_invalid_identifier_diagnostic() {
    run_line("export 1BAD=x")
        .assert()
        .success()
        .stderr(predicate::str::contains("error : 1BAD=x not identifier"));
}

#[test]
fn open_quote_diagnostic_goes_to_stdout() {
    run_line("echo 'unterminated")
        .assert()
        .success()
        .stdout(predicate::str::contains("Open quote"));
}

#[test]
fn misplaced_pipe_is_a_syntax_error() {
    run_line("| ls")
        .assert()
        .success()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn redirection_without_target_is_a_syntax_error() {
    run_line("echo hi >")
        .assert()
        .success()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn pwd_prints_the_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();
    let mut cmd = run_line("pwd");
    cmd.current_dir(&canonical);
    cmd.assert()
        .success()
        .stdout(format!("{}\n", canonical.display()));
}

#[test]
fn version_flag() {
    minishell()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("minishell"));
}

#[test]
fn help_flag() {
    minishell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}
