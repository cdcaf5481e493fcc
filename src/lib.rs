//! minishell - an interactive Unix command-line shell
//!
//! # Overview
//!
//! A read-eval loop over shell-like syntax: each line is tokenized,
//! checked against the token grammar, variable-expanded, folded into a
//! pipeline of commands with redirections, and executed as forked
//! children joined by pipes. A handful of built-ins (`cd`, `export`,
//! `unset`, `exit`) run in the shell process so they can mutate its
//! state; the printing built-ins (`echo`, `pwd`, `env`, bare `export`)
//! run in the children so they compose with pipes and redirections.
//!
//! # Example
//!
//! ```rust
//! use minishell::{lex, parse, Separator, TokenKind};
//!
//! let tokens = lex("echo hello | wc -l").unwrap();
//! assert!(tokens.iter().any(|t| t.kind == TokenKind::Pipe));
//!
//! let pipeline = parse(tokens).unwrap();
//! assert_eq!(pipeline.len(), 2);
//! assert_eq!(pipeline[0].argv, vec!["echo", "hello"]);
//! assert_eq!(pipeline[0].separator, Separator::Pipe);
//! ```

pub mod builtins;
pub mod env;
pub mod executor;
pub mod expander;
pub mod heredoc;
pub mod lexer;
pub mod parser;
pub mod shell;
pub mod signals;
pub mod syntax;

// Re-export commonly used items
pub use builtins::{classify, Dispatch};
pub use env::{EnvVar, Environment};
pub use executor::{execute, ExecError, LineOutcome};
pub use expander::expand;
pub use heredoc::{collect_heredocs, LineReader, ScriptedReader};
pub use lexer::{lex, LexError, Token, TokenKind};
pub use parser::{parse, Command, ParseError, RedirKind, Redirection, Separator};
pub use shell::{Shell, ShellError};
pub use syntax::{validate, SyntaxError};
