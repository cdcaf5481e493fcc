//! Heredoc collection
//!
//! Before a node forks, every `<<` redirection on it is drained from the
//! terminal into its own temp file, prompted line by line with `> `.
//! The redirection target is rewritten to the temp path so the executor
//! treats it like a plain `<` afterwards. One unique file per heredoc:
//! back-to-back heredocs on a line must not clobber each other, and the
//! files vanish when the collection state drops after reaping.

use std::collections::VecDeque;
use std::io::{self, Write};

use tempfile::NamedTempFile;

use crate::parser::{Command, RedirKind};

pub const PROMPT: &str = "> ";

/// The line-editing seam. The binary backs this with rustyline; tests
/// script it. `None` means end of input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// A canned sequence of input lines.
pub struct ScriptedReader {
    lines: VecDeque<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedReader {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Drain the bodies of all heredocs on `command`, in source order.
///
/// Each body is buffered into a fresh temp file whose path replaces the
/// delimiter as the redirection target. The returned handles keep the
/// files alive; drop them once the pipeline has been reaped.
pub fn collect_heredocs(
    command: &mut Command,
    reader: &mut dyn LineReader,
) -> io::Result<Vec<NamedTempFile>> {
    let mut bodies = Vec::new();
    for redirection in command
        .redirections
        .iter_mut()
        .filter(|r| r.kind == RedirKind::Heredoc)
    {
        let mut file = NamedTempFile::new()?;
        while let Some(line) = reader.read_line(PROMPT) {
            if line == redirection.target {
                break;
            }
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        redirection.target = file.path().to_string_lossy().into_owned();
        bodies.push(file);
    }
    Ok(bodies)
}
