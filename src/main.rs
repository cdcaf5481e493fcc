//! minishell - an interactive Unix command-line shell
//!
//! Usage:
//!   minishell             Start the interactive prompt
//!   minishell -c "line"   Execute a single line
//!   minishell --help      Show help
//!   minishell --version   Show version

use minishell::{LineOutcome, LineReader, Shell};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "\x1b[36mminishell$ \x1b[0m";

fn print_help() {
    println!(
        r#"minishell {} - an interactive Unix command-line shell

USAGE:
    minishell               Start the interactive prompt
    minishell -c <line>     Execute a single line and exit
    minishell --help        Show this help message
    minishell --version     Show version

LANGUAGE:
    cmd args                Run a command from $PATH (or an absolute path)
    cmd1 | cmd2             Pipe stdout of cmd1 into cmd2
    cmd < file              Redirect stdin
    cmd > file              Redirect stdout (truncate)
    cmd >> file             Redirect stdout (append)
    cmd << WORD             Heredoc: read lines up to WORD
    $NAME, "$NAME"          Expand a variable; '$NAME' stays literal

BUILT-INS:
    cd [path]   pwd   echo [-n] args   env   export [name[=value]]
    unset name...   exit
"#,
        VERSION
    );
}

/// Heredoc continuation lines come through the same editor as the
/// prompt, so history and editing keep working mid-line.
struct EditorReader<'a> {
    editor: &'a mut DefaultEditor,
}

impl LineReader for EditorReader<'_> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.editor.readline(prompt).ok()
    }
}

fn history_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".minishell_history"))
}

/// The interactive read-eval loop. EOF exits cleanly, Ctrl-C redraws
/// the prompt, and `exit` ends the loop.
fn run_repl() -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut shell = Shell::new();

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                let line = line.to_string();
                let mut reader = EditorReader {
                    editor: &mut editor,
                };
                match shell.run_line(&line, &mut reader) {
                    LineOutcome::Exit => break,
                    LineOutcome::Continue => {}
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("minishell: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
    Ok(())
}

/// `-c` mode: one line, no prompt, no history. Heredoc bodies still
/// read from stdin.
fn run_command(line: &str) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("minishell: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut shell = Shell::new();
    let mut reader = EditorReader {
        editor: &mut editor,
    };
    shell.run_line(line, &mut reader);
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => match run_repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("minishell: {e}");
                ExitCode::FAILURE
            }
        },
        2 => match args[1].as_str() {
            "--help" | "-h" => {
                print_help();
                ExitCode::SUCCESS
            }
            "--version" | "-V" => {
                println!("minishell {VERSION}");
                ExitCode::SUCCESS
            }
            other => {
                eprintln!("minishell: unknown option: {other}");
                print_help();
                ExitCode::FAILURE
            }
        },
        _ if args[1] == "-c" => run_command(&args[2..].join(" ")),
        _ => {
            eprintln!("minishell: too many arguments");
            print_help();
            ExitCode::FAILURE
        }
    }
}
