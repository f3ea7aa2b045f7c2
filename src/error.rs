use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// `<` or `>` followed by another redirection operator or by nothing.
    #[error("Syntax Error")]
    Redirection,
    #[error("Syntax error: missing command after pipe")]
    MissingCommandAfterPipe,
    #[error("Syntax error: missing command before pipe")]
    MissingCommandBeforePipe,
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("{0}: Invalid arguments")]
    InvalidArguments(&'static str),

    #[error("{builtin}: {source}")]
    Builtin {
        builtin: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what}: {source}")]
    Sys {
        what: &'static str,
        #[source]
        source: nix::Error,
    },
}

impl ShellError {
    #[inline(always)]
    pub fn sys(what: &'static str) -> impl FnOnce(nix::Error) -> Self {
        move |source| Self::Sys { what, source }
    }
}

pub type Result<T> = std::result::Result::<T, ShellError>;
