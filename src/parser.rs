//! Parser for minishell
//!
//! Folds the expanded token list into command nodes: adjacent word-like
//! tokens concatenate into one argv slot, a redirection operator captures
//! the following word-like token as its target, and `|` / the end-of-line
//! sentinel close the node with the matching separator.

use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a redirection target")]
    MissingRedirectTarget,
    #[error("unexpected end of input")]
    UnexpectedEof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirKind {
    In,
    Out,
    Append,
    Heredoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub kind: RedirKind,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    EndOfLine,
    Pipe,
}

/// One node of a pipeline: argv, redirections in source order, and the
/// separator that closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub argv: Vec<String>,
    pub redirections: Vec<Redirection>,
    pub separator: Separator,
}

/// Parser state
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Parse the whole token list into a pipeline.
    pub fn parse(mut self) -> Result<Vec<Command>, ParseError> {
        let mut commands = Vec::new();
        while !self.is_at_end() {
            if let Some(command) = self.parse_command()? {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Upper bound on the number of argv slots up to the next separator,
    /// so slot assembly never reallocates.
    fn count_slots(&self) -> usize {
        let mut count = 0;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::Pipe | TokenKind::EndOfLine => break,
                TokenKind::Space => i += 1,
                TokenKind::RedirectIn
                | TokenKind::RedirectOut
                | TokenKind::Append
                | TokenKind::Heredoc => {
                    i += 1;
                    if self.tokens.get(i).map(|t| t.kind) == Some(TokenKind::Space) {
                        i += 1;
                    }
                    if self.tokens.get(i).is_some_and(|t| t.kind.is_word_like()) {
                        i += 1;
                    }
                }
                _ => {
                    while self.tokens.get(i).is_some_and(|t| t.kind.is_word_like()) {
                        i += 1;
                    }
                    count += 1;
                }
            }
        }
        count
    }

    /// Parse one command node; `None` for an empty segment.
    fn parse_command(&mut self) -> Result<Option<Command>, ParseError> {
        let mut argv: Vec<String> = Vec::with_capacity(self.count_slots());
        let mut redirections = Vec::new();
        let mut slot = String::new();
        let mut slot_open = false;
        let mut slot_quoted = false;
        let separator;

        let mut close_slot = |argv: &mut Vec<String>,
                              slot: &mut String,
                              slot_open: &mut bool,
                              slot_quoted: &mut bool| {
            // An all-expansion slot that came out empty vanishes; a quoted
            // empty string is a real argument.
            if *slot_open && (!slot.is_empty() || *slot_quoted) {
                argv.push(std::mem::take(slot));
            } else {
                slot.clear();
            }
            *slot_open = false;
            *slot_quoted = false;
        };

        loop {
            let Some(token) = self.advance() else {
                return Err(ParseError::UnexpectedEof);
            };
            match token.kind {
                TokenKind::EndOfLine => {
                    separator = Separator::EndOfLine;
                    break;
                }
                TokenKind::Pipe => {
                    separator = Separator::Pipe;
                    break;
                }
                TokenKind::Space => {
                    close_slot(&mut argv, &mut slot, &mut slot_open, &mut slot_quoted);
                }
                TokenKind::RedirectIn => self.redirection(RedirKind::In, &mut redirections)?,
                TokenKind::RedirectOut => self.redirection(RedirKind::Out, &mut redirections)?,
                TokenKind::Append => self.redirection(RedirKind::Append, &mut redirections)?,
                TokenKind::Heredoc => self.redirection(RedirKind::Heredoc, &mut redirections)?,
                TokenKind::Word | TokenKind::Dollar | TokenKind::AfterDollar => {
                    slot_open = true;
                    slot.push_str(&token.value);
                }
                TokenKind::SingleQuoted | TokenKind::DoubleQuoted => {
                    slot_open = true;
                    slot_quoted = true;
                    slot.push_str(&token.value);
                }
            }
        }
        close_slot(&mut argv, &mut slot, &mut slot_open, &mut slot_quoted);

        if argv.is_empty() && redirections.is_empty() {
            return Ok(None);
        }
        Ok(Some(Command {
            argv,
            redirections,
            separator,
        }))
    }

    /// Capture the redirection target: one optional space, then exactly
    /// one word-like token.
    fn redirection(
        &mut self,
        kind: RedirKind,
        redirections: &mut Vec<Redirection>,
    ) -> Result<(), ParseError> {
        if self.peek().map(|t| t.kind) == Some(TokenKind::Space) {
            self.advance();
        }
        match self.peek() {
            Some(token) if token.kind.is_word_like() => {
                let target = token.value.clone();
                self.advance();
                redirections.push(Redirection { kind, target });
                Ok(())
            }
            _ => Err(ParseError::MissingRedirectTarget),
        }
    }
}

/// Parse tokens into a pipeline of command nodes.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Command>, ParseError> {
    Parser::new(tokens).parse()
}
