use log::trace;

use crate::glob;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    /// `<`
    Input,
    /// `>`
    Output,
    /// `|`
    Pipe
}

impl Token {
    #[inline(always)]
    pub fn as_word(&self) -> Option::<&str> {
        match self {
            Self::Word(w) => Some(w.as_str()),
            _ => None
        }
    }

    #[inline(always)]
    fn operator(c: char) -> Option::<Self> {
        match c {
            '<' => Some(Self::Input),
            '>' => Some(Self::Output),
            '|' => Some(Self::Pipe),
            _ => None
        }
    }
}

#[inline(always)]
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Splits a raw line into tokens without touching the filesystem.
///
/// Everything from the first `#` on is a comment.
pub fn lex(line: &str) -> Vec::<Token> {
    let line = match line.find('#') {
        Some(hash) => &line[..hash],
        None => line
    };

    let mut tokens = Vec::new();
    let mut word = String::new();

    #[inline(always)]
    fn flush(word: &mut String, tokens: &mut Vec::<Token>) {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)))
        }
    }

    for c in line.chars() {
        if is_blank(c) {
            flush(&mut word, &mut tokens)
        } else if let Some(op) = Token::operator(c) {
            flush(&mut word, &mut tokens);
            tokens.push(op)
        } else {
            word.push(c)
        }
    }
    flush(&mut word, &mut tokens);

    tokens
}

/// Lexes `line` and expands wildcard words against the filesystem.
pub fn tokenize(line: &str) -> Vec::<Token> {
    let mut expanded = Vec::new();
    let mut tokens = Vec::new();
    for token in lex(line) {
        match token {
            Token::Word(w) => {
                glob::expand_into(&w, &mut expanded);
                tokens.extend(expanded.drain(..).map(Token::Word))
            }
            op => tokens.push(op)
        }
    }

    trace!("tokens: {tokens:?}");
    tokens
}
