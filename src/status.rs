use nix::sys::wait::WaitStatus;

use crate::token::Token;

/// Outcome of the most recently completed top-level command.
///
/// Nothing has succeeded when the interpreter starts, so the default is
/// [`Status::Failure`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    #[default]
    Failure,
}

impl Status {
    #[inline(always)]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Success iff the process terminated normally with exit code 0.
    #[inline]
    pub fn from_wait(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, 0) => Self::Success,
            _ => Self::Failure
        }
    }

    #[inline(always)]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1
        }
    }
}

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue(Status),
    /// Terminate the interpreter with this exit code.
    Exit(i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Skip the whole line, leaving the status untouched.
    Skip,
    /// Run the line starting at this token index.
    Run(usize)
}

/// Decides whether a line runs, based on its first token and the previous status.
pub fn gate(first: Option::<&Token>, status: Status) -> Gate {
    match first.and_then(Token::as_word) {
        Some("and") if status.is_success() => Gate::Run(1),
        Some("or") if !status.is_success() => Gate::Run(1),
        Some("and" | "or") => Gate::Skip,
        _ => Gate::Run(0)
    }
}

#[cfg(test)]
mod tests {
    use nix::unistd::Pid;

    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_owned())
    }

    #[test]
    fn starts_as_failure() {
        assert_eq!(Status::default(), Status::Failure);
    }

    #[test]
    fn and_runs_only_after_success() {
        assert_eq!(gate(Some(&word("and")), Status::Success), Gate::Run(1));
        assert_eq!(gate(Some(&word("and")), Status::Failure), Gate::Skip);
    }

    #[test]
    fn or_runs_only_after_failure() {
        assert_eq!(gate(Some(&word("or")), Status::Failure), Gate::Run(1));
        assert_eq!(gate(Some(&word("or")), Status::Success), Gate::Skip);
    }

    #[test]
    fn other_first_tokens_always_run_from_the_start() {
        assert_eq!(gate(Some(&word("echo")), Status::Failure), Gate::Run(0));
        assert_eq!(gate(Some(&word("android")), Status::Success), Gate::Run(0));
        assert_eq!(gate(Some(&Token::Pipe), Status::Success), Gate::Run(0));
        assert_eq!(gate(None, Status::Success), Gate::Run(0));
    }

    #[test]
    fn wait_status_mapping() {
        let pid = Pid::from_raw(42);
        assert_eq!(Status::from_wait(WaitStatus::Exited(pid, 0)), Status::Success);
        assert_eq!(Status::from_wait(WaitStatus::Exited(pid, 3)), Status::Failure);
        assert_eq!(
            Status::from_wait(WaitStatus::Signaled(pid, nix::sys::signal::Signal::SIGPIPE, false)),
            Status::Failure
        );
    }
}
