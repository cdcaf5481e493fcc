//! Signal disposition around pipeline execution
//!
//! The shell ignores SIGINT and SIGQUIT while a foreground pipeline runs
//! so a Ctrl-C reaches the children, not the shell; each child restores
//! the default disposition right after fork.

use nix::sys::signal::{signal, SigHandler, Signal};

/// Ignore job-control signals in the shell before forking a pipeline.
pub fn ignore_job_signals() {
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigIgn);
        let _ = signal(Signal::SIGQUIT, SigHandler::SigIgn);
    }
}

/// Restore the default disposition: in the parent after reaping, and in
/// every child immediately after fork.
pub fn default_job_signals() {
    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
        let _ = signal(Signal::SIGQUIT, SigHandler::SigDfl);
    }
}
