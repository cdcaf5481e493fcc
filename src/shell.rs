//! The shell proper: one line through the whole pipeline
//!
//! `lex → validate → expand → parse → execute`, with the environment
//! store living across lines. An open quote is reported on stdout,
//! everything else on stderr, and no error short of `exit` or EOF ends
//! the loop.

use thiserror::Error;

use crate::env::Environment;
use crate::executor::{self, ExecError, LineOutcome};
use crate::expander::expand;
use crate::heredoc::LineReader;
use crate::lexer::{lex, LexError};
use crate::parser::{parse, ParseError};
use crate::syntax::{validate, SyntaxError};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub struct Shell {
    env: Environment,
}

impl Shell {
    /// A shell over the process environment.
    pub fn new() -> Self {
        Shell {
            env: Environment::new(),
        }
    }

    /// A shell over an explicit store (tests, mostly).
    pub fn with_env(env: Environment) -> Self {
        Shell { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluate one line. Heredoc bodies come through `reader`.
    pub fn eval(
        &mut self,
        line: &str,
        reader: &mut dyn LineReader,
    ) -> Result<LineOutcome, ShellError> {
        let mut tokens = lex(line)?;
        validate(&tokens)?;
        expand(&mut tokens, &self.env);
        let mut pipeline = parse(tokens)?;
        Ok(executor::execute(&mut pipeline, &mut self.env, reader)?)
    }

    /// Evaluate one line and report errors the way the prompt loop does:
    /// the line is discarded, the shell lives on.
    pub fn run_line(&mut self, line: &str, reader: &mut dyn LineReader) -> LineOutcome {
        match self.eval(line, reader) {
            Ok(outcome) => outcome,
            Err(ShellError::Lex(LexError::OpenQuote)) => {
                println!("Open quote");
                LineOutcome::Continue
            }
            Err(e) => {
                eprintln!("minishell: {e}");
                LineOutcome::Continue
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
