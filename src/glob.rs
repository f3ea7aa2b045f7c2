//! Single-wildcard expansion.
//!
//! Only the first `*` in a pattern is special: it matches any run of
//! characters, including none. There is no `?`, no character class and no
//! second wildcard (a later `*` is matched literally).

use std::fs;
use std::path::Path;

use log::{debug, trace};

const DEFAULT_DIR: &str = ".";

/// Whether `name` matches `pattern`.
pub fn matches(name: &str, pattern: &str) -> bool {
    let Some(star) = pattern.find('*') else {
        return name == pattern
    };

    let prefix = &pattern[..star];
    let suffix = &pattern[star + 1..];

    name.len() >= prefix.len() + suffix.len()
        && name.starts_with(prefix)
        && name.ends_with(suffix)
}

#[inline(always)]
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Splits a word into its directory and pattern portions at the last `/`.
///
/// Returns `None` for the directory when the word has no `/`.
#[inline]
fn split_dir(word: &str) -> (Option::<&str>, &str) {
    match word.rfind('/') {
        Some(0) => (Some("/"), &word[1..]),
        Some(slash) => (Some(&word[..slash]), &word[slash + 1..]),
        None => (None, word)
    }
}

/// Puts a matched name back under the directory it was found in.
///
/// Matches in the default directory come back bare, even when it was spelled out.
#[inline]
fn rejoin(dir: Option::<&str>, name: &str) -> String {
    match dir {
        None | Some(DEFAULT_DIR) => name.to_owned(),
        Some(dir) => Path::new(dir).join(name).to_string_lossy().into_owned()
    }
}

/// Expands `word` against its directory, appending the results to `out`.
///
/// A word without `*`, an unreadable directory or a pattern with no matches
/// all leave the word as-is. Matches come in directory-listing order.
pub fn expand_into(word: &str, out: &mut Vec::<String>) {
    if !word.contains('*') {
        out.push(word.to_owned());
        return
    }

    let (dir, pattern) = split_dir(word);

    let entries = match fs::read_dir(dir.unwrap_or(DEFAULT_DIR)) {
        Ok(ok) => ok,
        Err(e) => {
            debug!("{word}: cannot read directory: {e}");
            out.push(word.to_owned());
            return
        }
    };

    let show_hidden = is_hidden(pattern);
    let before = out.len();

    for entry in entries.filter_map(Result::ok) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            trace!("skipping non UTF-8 entry {file_name:?}");
            continue
        };

        if is_hidden(name) && !show_hidden { continue }
        if !matches(name, pattern) { continue }

        out.push(rejoin(dir, name));
    }

    if out.len() == before {
        out.push(word.to_owned());
    }
}
