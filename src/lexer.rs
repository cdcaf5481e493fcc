//! Tokenization for minishell
//!
//! A line is scanned into a flat token list terminated by a synthetic
//! [`TokenKind::EndOfLine`] sentinel. Quoting decides token granularity:
//! single quotes yield one opaque token, double quotes yield literal
//! segments interleaved with `Dollar`/`AfterDollar` pairs so the expander
//! can substitute in place later.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::char,
    combinator::{map, opt},
    multi::many0,
    sequence::delimited,
    IResult,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of blanks, collapsed to one token.
    Space,
    /// Unquoted text.
    Word,
    /// The body of a `'…'` string, never expanded.
    SingleQuoted,
    /// A literal segment inside a `"…"` string.
    DoubleQuoted,
    /// A `$` sigil.
    Dollar,
    /// The identifier immediately following a `$`.
    AfterDollar,
    /// `|`
    Pipe,
    /// `<`
    RedirectIn,
    /// `>`
    RedirectOut,
    /// `<<`
    Heredoc,
    /// `>>`
    Append,
    /// Synthetic end-of-line sentinel.
    EndOfLine,
}

impl TokenKind {
    /// Tokens that may contribute to an argv slot or name a redirection
    /// target.
    pub fn is_word_like(self) -> bool {
        matches!(
            self,
            TokenKind::Word
                | TokenKind::SingleQuoted
                | TokenKind::DoubleQuoted
                | TokenKind::Dollar
                | TokenKind::AfterDollar
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            value: value.into(),
            kind,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("Open quote")]
    OpenQuote,
    #[error("unexpected character `{0}'")]
    UnexpectedChar(char),
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0B' | '\x0C' | '\r')
}

/// Bytes that end a bare word.
fn is_classifier(c: char) -> bool {
    is_blank(c) || matches!(c, '\'' | '"' | '$' | '|' | '<' | '>')
}

/// Parse a `$` sigil and, when an identifier follows, its name.
/// `$$` is two lone sigils; a trailing `$` stays a literal word later.
fn dollar(input: &str) -> IResult<&str, Vec<Token>> {
    let (input, _) = char('$')(input)?;
    let (input, ident) = opt(take_while1(|c: char| c.is_ascii_alphanumeric()))(input)?;
    let mut tokens = vec![Token::new(TokenKind::Dollar, "$")];
    if let Some(name) = ident {
        tokens.push(Token::new(TokenKind::AfterDollar, name));
    }
    Ok((input, tokens))
}

/// Parse a single-quoted string into one opaque token.
fn single_quoted(input: &str) -> IResult<&str, Vec<Token>> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| vec![Token::new(TokenKind::SingleQuoted, s)],
    )(input)
}

/// A literal run inside double quotes, up to the next `$` or closing quote.
fn double_quoted_segment(input: &str) -> IResult<&str, Vec<Token>> {
    map(take_while1(|c| c != '"' && c != '$'), |s: &str| {
        vec![Token::new(TokenKind::DoubleQuoted, s)]
    })(input)
}

/// Parse a double-quoted string into literal segments and dollar pairs.
/// `""` still yields one empty segment so the parser sees an argv slot.
fn double_quoted(input: &str) -> IResult<&str, Vec<Token>> {
    let (input, segments) = delimited(
        char('"'),
        many0(alt((dollar, double_quoted_segment))),
        char('"'),
    )(input)?;
    let mut tokens: Vec<Token> = segments.into_iter().flatten().collect();
    if tokens.is_empty() {
        tokens.push(Token::new(TokenKind::DoubleQuoted, ""));
    }
    Ok((input, tokens))
}

/// A run of blanks collapses to a single space token.
fn space(input: &str) -> IResult<&str, Vec<Token>> {
    map(take_while1(is_blank), |_| {
        vec![Token::new(TokenKind::Space, " ")]
    })(input)
}

/// Redirection and pipe operators; doubled forms tried first.
fn operator(input: &str) -> IResult<&str, Vec<Token>> {
    map(
        alt((
            map(tag("<<"), |s: &str| (TokenKind::Heredoc, s)),
            map(tag(">>"), |s: &str| (TokenKind::Append, s)),
            map(tag("<"), |s: &str| (TokenKind::RedirectIn, s)),
            map(tag(">"), |s: &str| (TokenKind::RedirectOut, s)),
            map(tag("|"), |s: &str| (TokenKind::Pipe, s)),
        )),
        |(kind, text)| vec![Token::new(kind, text)],
    )(input)
}

/// A bare word: a maximal run of non-classifier bytes.
fn word(input: &str) -> IResult<&str, Vec<Token>> {
    map(take_while1(|c| !is_classifier(c)), |s: &str| {
        vec![Token::new(TokenKind::Word, s)]
    })(input)
}

fn chunk(input: &str) -> IResult<&str, Vec<Token>> {
    alt((single_quoted, double_quoted, space, operator, dollar, word))(input)
}

/// Tokenize one input line.
///
/// Leading and trailing blanks are trimmed; interior runs collapse to one
/// `Space` token. An unterminated quote fails the whole line and the
/// tokens scanned so far are discarded.
pub fn lex(line: &str) -> Result<Vec<Token>, LexError> {
    let line = line.trim_matches(is_blank);
    let (rest, chunks) = many0(chunk)(line)
        .map_err(|_| LexError::UnexpectedChar(line.chars().next().unwrap_or(' ')))?;
    if !rest.is_empty() {
        if rest.starts_with('\'') || rest.starts_with('"') {
            return Err(LexError::OpenQuote);
        }
        return Err(LexError::UnexpectedChar(rest.chars().next().unwrap_or(' ')));
    }
    let mut tokens: Vec<Token> = chunks.into_iter().flatten().collect();
    tokens.push(Token::new(TokenKind::EndOfLine, ""));
    Ok(tokens)
}
