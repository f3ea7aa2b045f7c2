use std::fs::File;
use std::io::{self, Write};

use log::debug;

use crate::builtin::Builtin;
use crate::command::Command;
use crate::env::Env;
use crate::pipeline::Pipeline;
use crate::redirect::Stdio;
use crate::status::{self, Flow, Gate, Status};
use crate::token;
use crate::Result;

/// Turns lines into processes.
///
/// The status of the previous line goes in, the status of this one comes out;
/// the shell itself keeps no record of it.
#[derive(Default)]
pub struct Shell {
    pub env: Env,
}

impl Shell {
    /// Runs one line. Diagnostics go to stderr and make the line fail.
    pub fn run_line(&self, line: &str, status: Status) -> Flow {
        self.run_line_to(line, status, &mut io::stdout())
    }

    /// Like [`Shell::run_line`], with built-in output going to `out` unless redirected.
    pub fn run_line_to(&self, line: &str, status: Status, out: &mut dyn Write) -> Flow {
        let tokens = token::tokenize(line);
        if tokens.is_empty() {
            return Flow::Continue(status)
        }

        let start = match status::gate(tokens.first(), status) {
            Gate::Run(start) => start,
            Gate::Skip => {
                debug!("skipping line, previous status {status:?}");
                return Flow::Continue(status)
            }
        };

        let tokens = &tokens[start..];
        if tokens.is_empty() {
            return Flow::Continue(status)
        }

        match self.execute(tokens, out) {
            Ok(flow) => flow,
            Err(e) => {
                eprintln!("{e}");
                Flow::Continue(Status::Failure)
            }
        }
    }

    fn execute(&self, tokens: &[token::Token], out: &mut dyn Write) -> Result::<Flow> {
        let mut pipeline = Pipeline::build(tokens)?;

        if !pipeline.is_single() {
            return Command::execute_pipeline(&pipeline, &self.env).map(Flow::Continue)
        }

        let program = pipeline.programs.remove(0);
        let Some(builtin) = Builtin::try_from_program(program.name(), program.args()) else {
            return Command::execute(&program, &self.env).map(Flow::Continue)
        };

        let stdio = Stdio::with_redirections(&program.redirections)?;
        match stdio.stdout {
            Some(fd) => builtin.run(&self.env, &mut File::from(fd)),
            None => builtin.run(&self.env, out)
        }
    }
}
