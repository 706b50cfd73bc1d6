use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Walk up from `start` looking for the first directory that contains one of `names`.
///
/// Within a directory, `names` are tried in order. Returns the full path of the
/// first match, or `None` once the filesystem root has been checked.
#[must_use]
pub fn find_upward(start: &Path, names: &[&str]) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        for name in names {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
