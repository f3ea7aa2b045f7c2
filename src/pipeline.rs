use crate::error::SyntaxError;
use crate::program::Program;
use crate::token::Token;

/// One or more programs connected left to right by pipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub programs: Vec::<Program>,
}

impl Pipeline {
    /// Splits `tokens` at every `|` and parses each segment.
    ///
    /// The whole line is checked before anything may run, so an empty segment
    /// or a malformed redirection anywhere rejects every stage.
    pub fn build(tokens: &[Token]) -> Result::<Self, SyntaxError> {
        let segments = tokens.split(|t| *t == Token::Pipe).collect::<Vec::<_>>();
        let last = segments.len() - 1;

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(if i == 0 && last > 0 {
                    SyntaxError::MissingCommandBeforePipe
                } else {
                    SyntaxError::MissingCommandAfterPipe
                })
            }
        }

        let programs = segments.into_iter()
            .map(Program::parse)
            .collect::<Result::<Vec::<_>, _>>()?;

        Ok(Self { programs })
    }

    #[inline(always)]
    pub fn is_single(&self) -> bool {
        self.programs.len() == 1
    }
}
