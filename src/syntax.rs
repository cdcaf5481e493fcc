//! Token-level grammar validation
//!
//! Runs between the lexer and the expander: a line that fails here is
//! discarded before any expansion or side effect.

use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("syntax error near unexpected token `{0}'")]
    UnexpectedToken(String),
}

fn offending(token: Option<&&Token>) -> String {
    match token {
        Some(t) if t.kind != TokenKind::EndOfLine => t.value.clone(),
        _ => "newline".to_string(),
    }
}

/// Reject malformed token streams: a pipe at the start, end, or next to
/// another pipe, and a redirection operator without a word-like target.
/// Space tokens are transparent (the lexer never emits two in a row).
pub fn validate(tokens: &[Token]) -> Result<(), SyntaxError> {
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Space)
        .collect();
    let mut prev: Option<TokenKind> = None;
    for (i, token) in significant.iter().enumerate() {
        match token.kind {
            TokenKind::Pipe => {
                if prev.is_none() || prev == Some(TokenKind::Pipe) {
                    return Err(SyntaxError::UnexpectedToken("|".to_string()));
                }
                if significant
                    .get(i + 1)
                    .map_or(true, |t| t.kind == TokenKind::EndOfLine)
                {
                    return Err(SyntaxError::UnexpectedToken("newline".to_string()));
                }
            }
            TokenKind::RedirectIn
            | TokenKind::RedirectOut
            | TokenKind::Append
            | TokenKind::Heredoc => {
                let next = significant.get(i + 1);
                if !next.is_some_and(|t| t.kind.is_word_like()) {
                    return Err(SyntaxError::UnexpectedToken(offending(next)));
                }
            }
            _ => {}
        }
        prev = Some(token.kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn check(line: &str) -> Result<(), SyntaxError> {
        validate(&lex(line).unwrap())
    }

    #[test]
    fn accepts_plain_commands_and_pipelines() {
        assert!(check("ls").is_ok());
        assert!(check("ls -la | grep foo | wc -l").is_ok());
        assert!(check("cat < in > out").is_ok());
        assert!(check("cat << EOF >> log").is_ok());
        assert!(check("").is_ok());
    }

    #[test]
    fn rejects_pipe_at_start() {
        assert_eq!(
            check("| ls"),
            Err(SyntaxError::UnexpectedToken("|".to_string()))
        );
    }

    #[test]
    fn rejects_pipe_at_end() {
        assert_eq!(
            check("ls |"),
            Err(SyntaxError::UnexpectedToken("newline".to_string()))
        );
    }

    #[test]
    fn rejects_adjacent_pipes() {
        assert_eq!(
            check("ls | | wc"),
            Err(SyntaxError::UnexpectedToken("|".to_string()))
        );
        assert_eq!(
            check("ls || wc"),
            Err(SyntaxError::UnexpectedToken("|".to_string()))
        );
    }

    #[test]
    fn rejects_redirection_without_target() {
        assert_eq!(
            check("echo hi >"),
            Err(SyntaxError::UnexpectedToken("newline".to_string()))
        );
        assert_eq!(
            check("echo hi > | wc"),
            Err(SyntaxError::UnexpectedToken("|".to_string()))
        );
        assert_eq!(
            check("cat < < in"),
            Err(SyntaxError::UnexpectedToken("<".to_string()))
        );
    }

    #[test]
    fn rejects_missing_heredoc_delimiter() {
        assert_eq!(
            check("cat <<"),
            Err(SyntaxError::UnexpectedToken("newline".to_string()))
        );
    }

    #[test]
    fn accepts_quoted_and_dollar_targets() {
        assert!(check("cat < 'a file'").is_ok());
        assert!(check("cat < \"file\"").is_ok());
        assert!(check("cat < $FILE").is_ok());
    }
}
