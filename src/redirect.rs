use std::fs::{File, OpenOptions};
use std::os::fd::OwnedFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use crate::{Result, ShellError};

/// Permission bits for newly created output files, before the umask.
pub const OUTPUT_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub direction: Direction,
    pub target: PathBuf,
}

impl Redirection {
    #[inline(always)]
    pub fn new(direction: Direction, target: impl Into::<PathBuf>) -> Self {
        Self { direction, target: target.into() }
    }

    /// Opens the target the way its direction requires.
    pub fn open(&self) -> Result::<OwnedFd> {
        let file = match self.direction {
            Direction::Input => File::open(&self.target),
            Direction::Output => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(OUTPUT_MODE)
                .open(&self.target)
        };

        file.map(OwnedFd::from).map_err(|source| ShellError::Redirect {
            path: self.target.clone(),
            source
        })
    }
}

/// Descriptors a stage should see as its stdin and stdout.
///
/// `None` means the stream is inherited from the interpreter.
#[derive(Debug, Default)]
pub struct Stdio {
    pub stdin: Option::<OwnedFd>,
    pub stdout: Option::<OwnedFd>,
}

impl Stdio {
    /// Opens every redirection of the allowed directions, in order.
    ///
    /// Each target is opened, so all output files get created or truncated,
    /// but only the last one of each direction stays bound.
    pub fn apply<'a, I>(&mut self, redirections: I, allow: impl Fn(Direction) -> bool) -> Result::<()>
    where
        I: IntoIterator::<Item = &'a Redirection>
    {
        for r in redirections.into_iter().filter(|r| allow(r.direction)) {
            let fd = r.open()?;
            match r.direction {
                Direction::Input => self.stdin = Some(fd),
                Direction::Output => self.stdout = Some(fd)
            }
        } Ok(())
    }

    #[inline]
    pub fn with_redirections(redirections: &[Redirection]) -> Result::<Self> {
        let mut stdio = Self::default();
        stdio.apply(redirections, |_| true)?;
        Ok(stdio)
    }
}
