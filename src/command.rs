use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;
use std::{env, mem, ptr};

use log::{debug, warn};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult, Pid};

use crate::builtin::Builtin;
use crate::env::Env;
use crate::pipeline::Pipeline;
use crate::program::Program;
use crate::redirect::{Direction, Stdio};
use crate::status::{Flow, Status};
use crate::{Result, ShellError};

/// Both ends of one pipe between two neighbouring stages.
///
/// An end is taken out when the stage that uses it is spawned.
#[derive(Debug)]
struct Channel {
    read: Option::<OwnedFd>,
    write: Option::<OwnedFd>,
}

pub struct Command;

impl Command {
    /// Creates a close-on-exec pipe, so a spawned program only keeps the ends
    /// that were bound to its stdin or stdout.
    pub fn create_pipe() -> Result::<(OwnedFd, OwnedFd)> {
        unistd::pipe2(OFlag::O_CLOEXEC).map_err(ShellError::sys("pipe"))
    }

    /// Launches `program` with `argv`, installing the bindings of `stdio` onto
    /// fd 0 and fd 1 of the new process.
    pub fn spawn(program: &Path, argv: &[String], stdio: &Stdio) -> io::Result::<Pid> {
        let c_cmd = CString::new(program.as_os_str().as_bytes())?;
        let c_argv = argv.iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<std::result::Result::<Vec::<_>, _>>()?;
        let mut c_args = c_argv.iter().map(|s| s.as_ptr()).collect::<Vec::<_>>();
        c_args.push(ptr::null());

        let c_env = env::vars_os()
            .map(|(k, v)| {
                let mut kv = k.into_vec();
                kv.push(b'=');
                kv.extend(v.into_vec());
                CString::new(kv)
            })
            .collect::<std::result::Result::<Vec::<_>, _>>()?;
        let mut c_envp = c_env.iter().map(|s| s.as_ptr()).collect::<Vec::<_>>();
        c_envp.push(ptr::null());

        let bindings = [
            (stdio.stdin.as_ref(), libc::STDIN_FILENO),
            (stdio.stdout.as_ref(), libc::STDOUT_FILENO)
        ];

        let mut file_actions: libc::posix_spawn_file_actions_t = unsafe { mem::zeroed() };
        let ret = unsafe { libc::posix_spawn_file_actions_init(&mut file_actions) };
        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret))
        }

        let mut ret = 0;
        for (fd, target) in bindings {
            let Some(fd) = fd else { continue };
            ret = unsafe {
                libc::posix_spawn_file_actions_adddup2(&mut file_actions, fd.as_raw_fd(), target)
            };
            if ret != 0 { break }
        }

        let mut pid = 0;
        if ret == 0 {
            _ = io::stdout().flush();
            ret = unsafe {
                libc::posix_spawn(
                    &mut pid,
                    c_cmd.as_ptr(),
                    &file_actions,
                    ptr::null(),
                    c_args.as_ptr() as *const _,
                    c_envp.as_ptr() as *const _
                )
            };
        }

        unsafe {
            _ = libc::posix_spawn_file_actions_destroy(&mut file_actions)
        }

        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret))
        }

        let pid = Pid::from_raw(pid);
        debug!("spawned {} as {pid}", program.display());
        Ok(pid)
    }

    /// Runs a built-in in a forked copy of the interpreter, so it can sit in a
    /// pipeline without touching the interpreter's own state.
    ///
    /// The child closes every descriptor in `channels` before running.
    fn fork_builtin(builtin: Builtin<'_>, env: &Env, stdio: Stdio, channels: &mut Vec::<Channel>) -> Result::<Pid> {
        _ = io::stdout().flush();

        match unsafe { unistd::fork() }.map_err(ShellError::sys("fork"))? {
            ForkResult::Parent { child } => {
                debug!("forked {builtin:?} as {child}");
                Ok(child)
            }
            ForkResult::Child => {
                let bound = [
                    (stdio.stdin.as_ref(), libc::STDIN_FILENO),
                    (stdio.stdout.as_ref(), libc::STDOUT_FILENO)
                ].into_iter().try_for_each(|(fd, target)| match fd {
                    Some(fd) => unistd::dup2(fd.as_raw_fd(), target).map(drop),
                    None => Ok(())
                });

                drop(stdio);
                channels.clear();

                let code = match bound {
                    Err(e) => {
                        eprintln!("dup2: {e}");
                        1
                    }
                    Ok(()) => match builtin.run(env, &mut io::stdout()) {
                        Ok(Flow::Continue(status)) => status.exit_code(),
                        Ok(Flow::Exit(code)) => code,
                        Err(e) => {
                            eprintln!("{e}");
                            1
                        }
                    }
                };

                _ = io::stdout().flush();
                unsafe { libc::_exit(code) }
            }
        }
    }

    /// Blocks until `pid` terminates.
    pub fn wait(pid: Pid) -> Result::<Status> {
        loop {
            match waitpid(pid, None) {
                Ok(status) => {
                    debug!("{pid} finished: {status:?}");
                    return Ok(Status::from_wait(status))
                }
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ShellError::sys("waitpid")(e))
            }
        }
    }

    /// Runs one external program, honoring all of its redirections.
    pub fn execute(program: &Program, env: &Env) -> Result::<Status> {
        let path = env.find_executable(program.name())
            .ok_or_else(|| ShellError::CommandNotFound(program.name().to_owned()))?;

        let stdio = Stdio::with_redirections(&program.redirections)?;
        let pid = Self::spawn(&path, &program.argv, &stdio)
            .map_err(|source| ShellError::Spawn { program: path, source })?;
        drop(stdio);

        Self::wait(pid)
    }

    /// Runs every stage of `pipeline` concurrently, each in its own process.
    ///
    /// A stage that cannot be started is reported and counted as failed, the
    /// other stages still run. The result is the status of the last stage,
    /// taken after all stages have been waited on.
    pub fn execute_pipeline(pipeline: &Pipeline, env: &Env) -> Result::<Status> {
        let n = pipeline.programs.len();

        let mut channels = (1..n)
            .map(|_| Self::create_pipe().map(|(r, w)| Channel { read: Some(r), write: Some(w) }))
            .collect::<Result::<Vec::<_>>>()?;

        let mut stages = Vec::with_capacity(n);
        for (i, program) in pipeline.programs.iter().enumerate() {
            let mut stdio = Stdio::default();
            if i > 0 {
                stdio.stdin = channels[i - 1].read.take()
            }
            if i < n - 1 {
                stdio.stdout = channels[i].write.take()
            }

            let stage = Self::spawn_stage(i, n, program, env, stdio, &mut channels)
                .inspect_err(|e| eprintln!("{e}"))
                .ok();
            stages.push(stage);
        }

        drop(channels);

        let mut last = Status::Failure;
        for (i, stage) in stages.into_iter().enumerate() {
            let status = match stage {
                Some(pid) => Self::wait(pid).unwrap_or_else(|e| {
                    eprintln!("{e}");
                    Status::Failure
                }),
                None => Status::Failure
            };
            if i == n - 1 {
                last = status
            }
        } Ok(last)
    }

    fn spawn_stage(
        i: usize,
        n: usize,
        program: &Program,
        env: &Env,
        mut stdio: Stdio,
        channels: &mut Vec::<Channel>
    ) -> Result::<Pid> {
        let honored = |direction: Direction| match direction {
            Direction::Input => i == 0,
            Direction::Output => i == n - 1
        };

        for r in program.redirections.iter().filter(|r| !honored(r.direction)) {
            warn!("{}: ignoring redirection to {} inside a pipeline", program.name(), r.target.display());
        }

        if let Some(builtin) = Builtin::try_from_program(program.name(), program.args()) {
            stdio.apply(&program.redirections, honored)?;
            return Self::fork_builtin(builtin, env, stdio, channels)
        }

        let path = env.find_executable(program.name())
            .ok_or_else(|| ShellError::CommandNotFound(program.name().to_owned()))?;

        stdio.apply(&program.redirections, honored)?;
        Self::spawn(&path, &program.argv, &stdio)
            .map_err(|source| ShellError::Spawn { program: path, source })
    }
}
