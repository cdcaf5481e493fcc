//! Pipeline execution
//!
//! Materializes a parsed pipeline as forked children joined by pipes.
//! Pipes are created lazily per node, heredocs are drained before each
//! fork, and the parent closes every pipe end as soon as the child that
//! uses it exists. Redirections are resolved in the child: the last
//! infile and last outfile win, wired with `dup2` after the pipe ends so
//! files override pipes. Reaping blocks until no child remains.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::wait::wait;
use nix::unistd::{access, dup2, execve, fork, pipe, AccessFlags, ForkResult};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::builtins::{self, Dispatch};
use crate::env::Environment;
use crate::heredoc::{self, LineReader};
use crate::parser::{Command, RedirKind, Separator};
use crate::signals;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("pipe failed: {0}")]
    Pipe(nix::Error),
    #[error("fork failed: {0}")]
    Fork(nix::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What the REPL should do after the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

/// One pipe per node, ends taken independently as ownership moves.
type PipeEnds = (Option<OwnedFd>, Option<OwnedFd>);

/// Execute a pipeline.
///
/// A single node classified as a parent built-in runs in the shell
/// process so its side effects persist; everything else goes through the
/// fork/pipe path. Diagnostics inside children go straight to stderr.
pub fn execute(
    pipeline: &mut [Command],
    env: &mut Environment,
    reader: &mut dyn LineReader,
) -> Result<LineOutcome, ExecError> {
    let Some(first) = pipeline.first() else {
        return Ok(LineOutcome::Continue);
    };
    if classify_node(first, pipeline.len()) == Dispatch::Parent {
        // Heredocs are still drained; their files die right here.
        let _bodies = heredoc::collect_heredocs(&mut pipeline[0], reader)?;
        return Ok(builtins::run_parent(&pipeline[0].argv, env));
    }
    run_pipeline(pipeline, env, reader)?;
    Ok(LineOutcome::Continue)
}

fn classify_node(command: &Command, pipeline_len: usize) -> Dispatch {
    builtins::classify(&command.argv, pipeline_len)
}

fn run_pipeline(
    pipeline: &mut [Command],
    env: &Environment,
    reader: &mut dyn LineReader,
) -> Result<(), ExecError> {
    let mut pipes: Vec<PipeEnds> = pipeline.iter().map(|_| (None, None)).collect();
    let mut bodies: Vec<NamedTempFile> = Vec::new();

    // Anything still buffered would be flushed once per child otherwise.
    io::stdout().flush()?;
    signals::ignore_job_signals();

    let spawned = spawn_all(pipeline, env, reader, &mut pipes, &mut bodies);

    // Unused ends must close before waiting or a reader never sees EOF.
    drop(pipes);
    loop {
        match wait() {
            Ok(_) => {}
            Err(Errno::EINTR) => {}
            Err(_) => break,
        }
    }
    signals::default_job_signals();
    drop(bodies);
    spawned
}

fn spawn_all(
    pipeline: &mut [Command],
    env: &Environment,
    reader: &mut dyn LineReader,
    pipes: &mut Vec<PipeEnds>,
    bodies: &mut Vec<NamedTempFile>,
) -> Result<(), ExecError> {
    let count = pipeline.len();
    for index in 0..count {
        if pipeline[index].separator == Separator::Pipe {
            let (read, write) = pipe().map_err(ExecError::Pipe)?;
            let read = unsafe { OwnedFd::from_raw_fd(read) };
            let write = unsafe { OwnedFd::from_raw_fd(write) };
            pipes[index] = (Some(read), Some(write));
        }
        bodies.extend(heredoc::collect_heredocs(&mut pipeline[index], reader)?);
        match unsafe { fork() }.map_err(ExecError::Fork)? {
            ForkResult::Child => {
                let pipes = std::mem::take(pipes);
                run_child(&pipeline[index], index, count, pipes, env);
            }
            ForkResult::Parent { .. } => {
                // This child owns the write end of its pipe and the read
                // end of the previous one; the parent lets both go.
                if let Some(fd) = pipes[index].1.take() {
                    drop(fd);
                }
                if index > 0 {
                    if let Some(fd) = pipes[index - 1].0.take() {
                        drop(fd);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Everything after fork: signals, pipe wiring, redirections, dispatch.
/// Never returns; the process image is replaced or `_exit`s.
fn run_child(
    command: &Command,
    index: usize,
    count: usize,
    mut pipes: Vec<PipeEnds>,
    env: &Environment,
) -> ! {
    signals::default_job_signals();

    let (infile, outfile) = match open_redirections(command) {
        Ok(files) => files,
        Err(()) => child_exit(1),
    };

    if count > 1 {
        if index == 0 {
            if let Some(write) = &pipes[0].1 {
                let _ = dup2(write.as_raw_fd(), libc::STDOUT_FILENO);
            }
        } else if index == count - 1 {
            if let Some(read) = &pipes[index - 1].0 {
                let _ = dup2(read.as_raw_fd(), libc::STDIN_FILENO);
            }
        } else {
            if let Some(read) = &pipes[index - 1].0 {
                let _ = dup2(read.as_raw_fd(), libc::STDIN_FILENO);
            }
            if let Some(write) = &pipes[index].1 {
                let _ = dup2(write.as_raw_fd(), libc::STDOUT_FILENO);
            }
        }
    }
    // Closes every inherited pipe end in this child.
    pipes.clear();

    // Files override pipes on the shared descriptors.
    if let Some(file) = outfile {
        let _ = dup2(file.as_raw_fd(), libc::STDOUT_FILENO);
        drop(file);
    }
    if let Some(file) = infile {
        let _ = dup2(file.as_raw_fd(), libc::STDIN_FILENO);
        drop(file);
    }

    if command.argv.is_empty() {
        // Redirection-only node: targets were created, nothing to run.
        child_exit(0);
    }
    if builtins::is_child_builtin(&command.argv[0]) {
        let code = builtins::run_child(&command.argv, env);
        child_exit(code);
    }
    exec_external(&command.argv, env)
}

/// Open the node's redirections and return the effective (last) infile
/// and outfile. Earlier infiles are still probed in order so a missing
/// one aborts the child; earlier outfiles are left untouched.
fn open_redirections(command: &Command) -> Result<(Option<File>, Option<File>), ()> {
    let last_in = command
        .redirections
        .iter()
        .rposition(|r| matches!(r.kind, RedirKind::In | RedirKind::Heredoc));
    let last_out = command
        .redirections
        .iter()
        .rposition(|r| matches!(r.kind, RedirKind::Out | RedirKind::Append));

    let mut infile = None;
    let mut outfile = None;
    for (i, redirection) in command.redirections.iter().enumerate() {
        match redirection.kind {
            RedirKind::In | RedirKind::Heredoc => {
                let file = File::open(&redirection.target).map_err(|_| {
                    eprintln!(
                        "minishell: {}: No such file or directory",
                        redirection.target
                    );
                })?;
                if Some(i) == last_in {
                    infile = Some(file);
                }
            }
            RedirKind::Out | RedirKind::Append => {
                if Some(i) == last_out {
                    let mut options = OpenOptions::new();
                    options.read(true).write(true).create(true).mode(0o664);
                    if redirection.kind == RedirKind::Append {
                        options.append(true);
                    } else {
                        options.truncate(true);
                    }
                    let file = options.open(&redirection.target).map_err(|_| {
                        eprintln!(
                            "minishell: {}: No such file or directory",
                            redirection.target
                        );
                    })?;
                    outfile = Some(file);
                }
            }
        }
    }
    Ok((infile, outfile))
}

/// Resolve argv[0] against `$PATH` and replace the process image.
fn exec_external(argv: &[String], env: &Environment) -> ! {
    let resolved = if argv[0].starts_with('/') {
        Some(PathBuf::from(&argv[0]))
    } else {
        search_path(env, &argv[0])
    };
    let Some(program) = resolved else {
        command_not_found();
    };
    let Ok(program) = CString::new(program.into_os_string().into_vec()) else {
        command_not_found();
    };
    let Ok(args) = argv
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<Result<Vec<_>, _>>()
    else {
        command_not_found();
    };
    let Ok(envp) = env
        .envp()
        .into_iter()
        .map(CString::new)
        .collect::<Result<Vec<_>, _>>()
    else {
        command_not_found();
    };
    let _ = execve(&program, &args, &envp);
    command_not_found()
}

/// Split `$PATH` on `:`; an empty component is the current directory.
/// The first accessible candidate wins.
fn search_path(env: &Environment, program: &str) -> Option<PathBuf> {
    let path = env.get("PATH")?;
    for dir in path.split(':') {
        let candidate = if dir.is_empty() {
            PathBuf::from(program)
        } else {
            Path::new(dir).join(program)
        };
        if access(&candidate, AccessFlags::F_OK).is_ok() {
            return Some(candidate);
        }
    }
    None
}

fn command_not_found() -> ! {
    eprintln!("minishell: Command not found");
    child_exit(127)
}

/// Flush and leave without unwinding; plain `exit` would run the
/// parent's atexit state in the forked copy.
fn child_exit(code: i32) -> ! {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    unsafe { libc::_exit(code) }
}
