use std::env;
use std::io::{self, Write};

use crate::env::Env;
use crate::status::{Flow, Status};
use crate::{Result, ShellError};

pub const NAMES: &[&str] = &["cd", "pwd", "which", "exit", "die"];

pub const FAREWELL: &str = "Exiting my shell.";

/// Commands that run inside the interpreter's own process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin<'a> {
    Cd(&'a [String]),
    Pwd,
    Which(&'a [String]),
    Exit,
    Die(&'a [String])
}

#[inline(always)]
pub fn is_builtin(name: &str) -> bool {
    NAMES.contains(&name)
}

impl<'a> Builtin<'a> {
    pub fn try_from_program(program: &str, args: &'a [String]) -> Option::<Self> {
        match program {
            "cd" => Some(Self::Cd(args)),
            "pwd" => Some(Self::Pwd),
            "which" => Some(Self::Which(args)),
            "exit" => Some(Self::Exit),
            "die" => Some(Self::Die(args)),
            _ => None
        }
    }

    /// Runs the built-in, writing its regular output to `out`.
    ///
    /// An `Err` is a diagnostic for the error stream, the status is then a failure.
    pub fn run(&self, env: &Env, out: &mut dyn Write) -> Result::<Flow> {
        #[inline(always)]
        fn io_err(builtin: &'static str) -> impl FnOnce(io::Error) -> ShellError {
            move |source| ShellError::Builtin { builtin, source }
        }

        match *self {
            Self::Cd(args) => {
                let [dir] = args else {
                    return Err(ShellError::InvalidArguments("cd"))
                };
                env::set_current_dir(dir).map_err(io_err("cd"))?;
                Ok(Flow::Continue(Status::Success))
            }
            Self::Pwd => {
                let cwd = env::current_dir().map_err(io_err("pwd"))?;
                writeln!(out, "{}", cwd.display()).map_err(io_err("pwd"))?;
                Ok(Flow::Continue(Status::Success))
            }
            Self::Which(args) => {
                let [name] = args else {
                    return Ok(Flow::Continue(Status::Failure))
                };
                if is_builtin(name) {
                    return Ok(Flow::Continue(Status::Failure))
                }
                let Some(path) = env.find_executable(name) else {
                    return Ok(Flow::Continue(Status::Failure))
                };
                writeln!(out, "{}", path.display()).map_err(io_err("which"))?;
                Ok(Flow::Continue(Status::Success))
            }
            Self::Exit => {
                _ = writeln!(out, "{FAREWELL}");
                _ = out.flush();
                Ok(Flow::Exit(0))
            }
            Self::Die(args) => {
                _ = writeln!(out, "{}", args.join(" "));
                _ = out.flush();
                Ok(Flow::Exit(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn strings(ws: &[&str]) -> Vec::<String> {
        ws.iter().map(|w| (*w).to_owned()).collect()
    }

    fn run(name: &str, args: &[&str], env: &Env) -> (Result::<Flow>, String) {
        let args = strings(args);
        let builtin = Builtin::try_from_program(name, &args).expect("a builtin");
        let mut out = Vec::new();
        let flow = builtin.run(env, &mut out);
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn other_names_are_not_handled() {
        assert!(Builtin::try_from_program("ls", &[]).is_none());
        assert!(Builtin::try_from_program("CD", &[]).is_none());
    }

    #[test]
    fn cd_needs_exactly_one_argument() {
        let env = Env::default();
        let (flow, _) = run("cd", &[], &env);
        assert!(matches!(flow, Err(ShellError::InvalidArguments("cd"))));

        let (flow, _) = run("cd", &["a", "b"], &env);
        assert_eq!(flow.unwrap_err().to_string(), "cd: Invalid arguments");
    }

    #[test]
    fn cd_to_missing_directory_keeps_cwd() {
        let before = env::current_dir().unwrap();
        let (flow, _) = run("cd", &["/definitely/not/a/dir"], &Env::default());
        assert!(matches!(flow, Err(ShellError::Builtin { builtin: "cd", .. })));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn pwd_prints_the_working_directory() {
        let (flow, out) = run("pwd", &[], &Env::default());
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Success));
        assert_eq!(out.trim_end(), env::current_dir().unwrap().display().to_string());
    }

    #[test]
    fn which_refuses_builtins() {
        for name in NAMES {
            let (flow, out) = run("which", &[*name], &Env::default());
            assert_eq!(flow.unwrap(), Flow::Continue(Status::Failure));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn which_echoes_paths_verbatim() {
        let (flow, out) = run("which", &["./whatever"], &Env::default());
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Success));
        assert_eq!(out, "./whatever\n");
    }

    #[test]
    fn which_prints_the_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        File::create(&tool).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let env = Env::with_search_dirs([dir.path()]);
        let (flow, out) = run("which", &["tool"], &env);
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Success));
        assert_eq!(out, format!("{}\n", tool.display()));
    }

    #[test]
    fn which_fails_on_unknown_names_and_bad_arity() {
        let env = Env::default();
        let (flow, _) = run("which", &["surely-not-a-real-command-42"], &env);
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Failure));

        let (flow, _) = run("which", &[], &env);
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Failure));

        let (flow, _) = run("which", &["ls", "cat"], &env);
        assert_eq!(flow.unwrap(), Flow::Continue(Status::Failure));
    }

    #[test]
    fn exit_says_goodbye() {
        let (flow, out) = run("exit", &[], &Env::default());
        assert_eq!(flow.unwrap(), Flow::Exit(0));
        assert_eq!(out, "Exiting my shell.\n");
    }

    #[test]
    fn die_prints_its_arguments_and_fails() {
        let (flow, out) = run("die", &["fatal", "error"], &Env::default());
        assert_eq!(flow.unwrap(), Flow::Exit(1));
        assert_eq!(out, "fatal error\n");
    }
}
