//! Variable expansion over the token list
//!
//! Each `Dollar` + `AfterDollar` pair is rewritten in place into a single
//! `Word` holding the variable's current value (empty when the name is
//! unknown or declared without a value). Single-quoted tokens never
//! contain a `Dollar`, so they are untouched by construction; a lone
//! `Dollar` stays literal and folds into its argv slot as `$`.

use crate::env::Environment;
use crate::lexer::{Token, TokenKind};

pub fn expand(tokens: &mut Vec<Token>, env: &Environment) {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::Dollar
            && tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::AfterDollar)
        {
            let value = env.get(&tokens[i + 1].value).unwrap_or("").to_string();
            tokens[i] = Token::new(TokenKind::Word, value);
            tokens.remove(i + 1);
        }
        i += 1;
    }
}
