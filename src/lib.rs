//! Core of a small line-oriented command interpreter.
//!
//! A line is tokenized, gated on the previous line's [`Status`] by a leading
//! `and`/`or`, split into a [`Pipeline`] and run either in-process (built-ins)
//! or as one child process per stage.

pub mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod glob;
pub mod input;
pub mod pipeline;
pub mod program;
pub mod redirect;
pub mod shell;
pub mod status;
pub mod token;

pub use env::{Config, Env};
pub use error::{Result, ShellError, SyntaxError};
pub use pipeline::Pipeline;
pub use program::Program;
pub use shell::Shell;
pub use status::{Flow, Status};
pub use token::Token;
