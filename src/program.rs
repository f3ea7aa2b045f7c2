use crate::error::SyntaxError;
use crate::redirect::{Direction, Redirection};
use crate::token::Token;

/// One command of a pipeline: its argument vector with the redirections
/// pulled out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub argv: Vec::<String>,
    pub redirections: Vec::<Redirection>,
}

impl Program {
    /// Separates argv from redirections in a segment holding no `|`.
    ///
    /// A `|` in the segment means an empty command next to it.
    pub fn parse(tokens: &[Token]) -> Result::<Self, SyntaxError> {
        let mut argv = Vec::with_capacity(tokens.len());
        let mut redirections = Vec::new();

        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            let direction = match token {
                Token::Word(w) => {
                    argv.push(w.clone());
                    continue
                }
                Token::Input => Direction::Input,
                Token::Output => Direction::Output,
                Token::Pipe => return Err(SyntaxError::MissingCommandAfterPipe)
            };

            let Some(Token::Word(target)) = iter.next() else {
                return Err(SyntaxError::Redirection)
            };
            redirections.push(Redirection::new(direction, target));
        }

        if argv.is_empty() {
            return Err(SyntaxError::Redirection)
        }

        Ok(Self { argv, redirections })
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    #[inline(always)]
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}
