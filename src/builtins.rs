//! Built-in commands
//!
//! Two tiers, decided by [`classify`]: built-ins that mutate shell state
//! (`cd`, `exit`, `unset`, `export` with arguments) run in the shell
//! process, but only when they are the whole pipeline; the printing
//! built-ins (`echo`, `pwd`, `env`, `export` without arguments) run in a
//! forked child so their output flows through pipes and redirections.

use std::io::{self, Write};

use crate::env::Environment;
use crate::executor::LineOutcome;

/// Where a command node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// In the shell process; side effects persist.
    Parent,
    /// In the forked child, before the exec path.
    Child,
    /// `execve` after `$PATH` resolution.
    External,
}

/// Decide where argv runs. The parent tier applies only to a
/// single-node pipeline; `cd` inside a pipeline falls through to the
/// exec path and fails like any unknown command.
pub fn classify(argv: &[String], pipeline_len: usize) -> Dispatch {
    let Some(program) = argv.first() else {
        return Dispatch::External;
    };
    if pipeline_len == 1 {
        match program.as_str() {
            "cd" | "unset" | "exit" => return Dispatch::Parent,
            "export" if argv.len() > 1 => return Dispatch::Parent,
            _ => {}
        }
    }
    if is_child_builtin(program) {
        Dispatch::Child
    } else {
        Dispatch::External
    }
}

pub fn is_child_builtin(program: &str) -> bool {
    matches!(program, "echo" | "pwd" | "env" | "export")
}

/// Run a parent-tier built-in in the shell process.
pub fn run_parent(argv: &[String], env: &mut Environment) -> LineOutcome {
    let Some(program) = argv.first() else {
        return LineOutcome::Continue;
    };
    match program.as_str() {
        "cd" => {
            cd(argv.get(1).map(String::as_str), env);
        }
        "unset" => unset_cmd(&argv[1..], env),
        "export" => {
            export_cmd(&argv[1..], env);
        }
        "exit" => return LineOutcome::Exit,
        _ => {}
    }
    LineOutcome::Continue
}

/// Run a child-tier built-in; the return value is the child's exit code.
pub fn run_child(argv: &[String], env: &Environment) -> i32 {
    let mut stdout = io::stdout();
    let Some(program) = argv.first() else {
        return 0;
    };
    let result = match program.as_str() {
        "echo" => echo(&argv[1..], &mut stdout),
        "pwd" => pwd(&mut stdout),
        "env" => print_env(env, &mut stdout),
        "export" if argv.len() == 1 => print_exported(env, &mut stdout),
        "export" => {
            // Mutations die with the child; only the exit code matters.
            let mut scratch = env.clone();
            return export_cmd(&argv[1..], &mut scratch);
        }
        _ => return 0,
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("minishell: {program}: {e}");
            1
        }
    }
}

/// A newline-suppressing flag: `-` followed by one or more `n`s.
/// Anything else (`-nm`, `n`, `--n`) is an ordinary argument.
fn is_newline_flag(arg: &str) -> bool {
    arg.len() >= 2 && arg.starts_with('-') && arg[1..].bytes().all(|b| b == b'n')
}

/// `echo`: arguments joined by single spaces; any number of leading
/// `-n`-style flags suppresses the trailing newline.
pub fn echo(args: &[String], out: &mut impl Write) -> io::Result<()> {
    let mut newline = true;
    let mut args = args;
    while args.first().is_some_and(|a| is_newline_flag(a)) {
        newline = false;
        args = &args[1..];
    }
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{arg}")?;
    }
    if newline {
        writeln!(out)?;
    }
    out.flush()
}

/// `pwd`: the current working directory and a newline.
pub fn pwd(out: &mut impl Write) -> io::Result<()> {
    let cwd = std::env::current_dir()?;
    writeln!(out, "{}", cwd.display())
}

/// `env`: the lookup view, one `name=value` per line.
pub fn print_env(env: &Environment, out: &mut impl Write) -> io::Result<()> {
    for (name, value) in env.lookup() {
        writeln!(out, "{name}={value}")?;
    }
    Ok(())
}

/// `export` with no arguments: the exported view, sorted.
pub fn print_exported(env: &Environment, out: &mut impl Write) -> io::Result<()> {
    for var in env.exported() {
        match &var.value {
            Some(value) => writeln!(out, "declare -x {}=\"{}\"", var.name, value)?,
            None => writeln!(out, "declare -x {}", var.name)?,
        }
    }
    Ok(())
}

enum Assignment<'a> {
    Set(&'a str, &'a str),
    Append(&'a str, &'a str),
    Declare(&'a str),
}

/// A valid name: non-empty, not starting with a digit, ASCII
/// alphanumerics only.
fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

fn parse_assignment(arg: &str) -> Option<Assignment<'_>> {
    match arg.find('=') {
        None => {
            // `NAME+` validates; the `+` is assignment punctuation, not
            // part of the name.
            let name = arg.strip_suffix('+').unwrap_or(arg);
            valid_name(name).then_some(Assignment::Declare(name))
        }
        Some(eq) => {
            if eq > 0 && arg.as_bytes()[eq - 1] == b'+' {
                let name = &arg[..eq - 1];
                valid_name(name).then_some(Assignment::Append(name, &arg[eq + 1..]))
            } else {
                let name = &arg[..eq];
                valid_name(name).then_some(Assignment::Set(name, &arg[eq + 1..]))
            }
        }
    }
}

/// `export` with arguments. Invalid identifiers are reported and
/// skipped; valid ones still apply. Returns 1 when anything was invalid.
pub fn export_cmd(args: &[String], env: &mut Environment) -> i32 {
    let mut status = 0;
    for arg in args {
        match parse_assignment(arg) {
            Some(Assignment::Set(name, value)) => env.set(name, value),
            Some(Assignment::Append(name, value)) => env.append(name, value),
            Some(Assignment::Declare(name)) => env.declare(name),
            None => {
                eprintln!("error : {arg} not identifier");
                status = 1;
            }
        }
    }
    status
}

/// `unset`: remove each name from the store; absent names are ignored.
pub fn unset_cmd(args: &[String], env: &mut Environment) {
    for name in args {
        env.unset(name);
    }
}

/// `cd`: no argument or one starting with `~` goes to `$HOME`. On
/// success `$OLDPWD` and `$PWD` are refreshed.
pub fn cd(path: Option<&str>, env: &mut Environment) -> i32 {
    let target = match path {
        None => None,
        Some(p) if p.starts_with('~') => None,
        Some(p) => Some(p),
    };
    let target = match target {
        Some(p) => p.to_string(),
        None => match env.get("HOME") {
            Some(home) => home.to_string(),
            None => {
                eprintln!("minishell: cd: HOME not set");
                return 1;
            }
        },
    };
    let previous = std::env::current_dir().ok();
    if std::env::set_current_dir(&target).is_err() {
        eprintln!("minishell: {target}: No such file or directory");
        return 1;
    }
    if let Some(old) = previous {
        env.set("OLDPWD", &old.to_string_lossy());
    }
    if let Ok(now) = std::env::current_dir() {
        env.set("PWD", &now.to_string_lossy());
    }
    0
}
