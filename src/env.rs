use std::path::{Path, PathBuf};

use log::debug;
use nix::unistd::{self, AccessFlags};

/// Directories probed for bare command names, in order.
///
/// `PATH` is deliberately not consulted.
pub const SEARCH_DIRS: &[&str] = &[".", "/usr/local/bin", "/usr/bin", "/bin"];

/// Environment variable holding the `env_logger` filter, read by the binary.
pub const LOG_ENV: &str = "MYSH_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub struct Env {
    pub search_dirs: Vec::<PathBuf>,
}

impl Default for Env {
    fn default() -> Self {
        let search_dirs = SEARCH_DIRS.iter().map(PathBuf::from).collect();
        Self { search_dirs }
    }
}

impl Env {
    #[inline]
    pub fn with_search_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator::<Item = P>,
        P: Into::<PathBuf>
    {
        Self { search_dirs: dirs.into_iter().map(Into::into).collect() }
    }

    /// Maps a command name to an executable path.
    ///
    /// Names containing `/` come back unchanged, existence is checked at spawn time.
    pub fn find_executable(&self, name: &str) -> Option::<PathBuf> {
        #[inline(always)]
        fn is_exe(path: &Path) -> bool {
            path.is_file() && unistd::access(path, AccessFlags::X_OK).is_ok()
        }

        if name.contains('/') {
            return Some(PathBuf::from(name))
        }
        if name.is_empty() {
            return None
        }

        for dir in self.search_dirs.iter() {
            let path_buf = dir.join(name);
            if is_exe(&path_buf) {
                debug!("resolved {name} to {}", path_buf.display());
                return Some(path_buf)
            }
        } None
    }
}

/// Startup configuration of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub batch_file: Option::<PathBuf>,
}

impl Config {
    /// Builds the config from the arguments after the program name.
    ///
    /// Returns `None` on a usage error.
    pub fn from_args<I>(args: I) -> Option::<Self>
    where
        I: IntoIterator::<Item = String>
    {
        let mut args = args.into_iter();
        let batch_file = args.next().map(PathBuf::from);
        if args.next().is_some() {
            return None
        }

        Some(Self { batch_file })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn touch(path: &Path, mode: u32) {
        File::create(path).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn paths_pass_through_unchanged() {
        let env = Env::default();
        assert_eq!(env.find_executable("./nope"), Some(PathBuf::from("./nope")));
        assert_eq!(env.find_executable("/no/such/bin"), Some(PathBuf::from("/no/such/bin")));
    }

    #[test]
    fn first_directory_with_an_executable_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(&first.path().join("tool"), 0o755);
        touch(&second.path().join("tool"), 0o755);

        let env = Env::with_search_dirs([first.path(), second.path()]);
        assert_eq!(env.find_executable("tool"), Some(first.path().join("tool")));
    }

    #[test]
    fn non_executable_files_are_skipped() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(&first.path().join("tool"), 0o644);
        touch(&second.path().join("tool"), 0o700);

        let env = Env::with_search_dirs([first.path(), second.path()]);
        assert_eq!(env.find_executable("tool"), Some(second.path().join("tool")));
    }

    #[test]
    fn directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tool")).unwrap();

        let env = Env::with_search_dirs([dir.path()]);
        assert_eq!(env.find_executable("tool"), None);
    }

    #[test]
    fn missing_commands_resolve_to_none() {
        let env = Env::default();
        assert_eq!(env.find_executable("surely-not-a-real-command-42"), None);
        assert_eq!(env.find_executable(""), None);
    }

    #[test]
    fn default_dirs_find_sh() {
        let env = Env::default();
        let sh = env.find_executable("sh").expect("sh in a standard directory");
        assert!(sh.ends_with("sh"));
    }

    #[test]
    fn config_takes_at_most_one_argument() {
        let config = Config::from_args(Vec::new()).unwrap();
        assert_eq!(config.batch_file, None);

        let config = Config::from_args(vec!["script.sh".to_owned()]).unwrap();
        assert_eq!(config.batch_file, Some(PathBuf::from("script.sh")));

        assert!(Config::from_args(vec!["a".to_owned(), "b".to_owned()]).is_none());
    }
}
