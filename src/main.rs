use std::env;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::os::fd::AsFd;
use std::process;

use anyhow::Context;
use log::debug;

use mysh::builtin::FAREWELL;
use mysh::env::{DEFAULT_LOG_FILTER, LOG_ENV};
use mysh::input::LineReader;
use mysh::{Config, Flow, Shell, Status};

const PROMPT: &str = "mysh> ";
const WELCOME: &str = "Welcome to my shell!";

fn main() -> anyhow::Result::<()> {
    let Some(config) = Config::from_args(env::args().skip(1)) else {
        let prog = env::args().next().unwrap_or_else(|| "mysh".to_owned());
        eprintln!("Usage: {prog} [batch_file]");
        process::exit(1)
    };

    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, DEFAULT_LOG_FILTER))
        .format_timestamp(None)
        .init();

    let input = match &config.batch_file {
        Some(path) => File::open(path)
            .with_context(|| format!("cannot open batch file {}", path.display()))?,
        None => io::stdin().as_fd()
            .try_clone_to_owned()
            .map(File::from)
            .context("cannot duplicate stdin")?
    };

    let interactive = input.is_terminal();
    debug!("{config:?}, interactive: {interactive}");

    let shell = Shell::default();
    let mut reader = LineReader::new(input);
    let mut status = Status::default();

    if interactive {
        println!("{WELCOME}");
    }

    loop {
        if interactive {
            print!("{PROMPT}");
            _ = io::stdout().flush()?;
        }

        let Some(line) = reader.next_line().context("could not read input")? else {
            break
        };

        match shell.run_line(&line, status) {
            Flow::Continue(next) => status = next,
            Flow::Exit(code) => {
                _ = io::stdout().flush();
                process::exit(code)
            }
        }
    }

    if interactive {
        println!("{FAREWELL}");
    }
    Ok(())
}
