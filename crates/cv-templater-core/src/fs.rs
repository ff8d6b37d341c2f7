use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tempfile::Builder;

/// Write `contents` to `path` unless something already lives there.
///
/// The content is staged in a temporary file next to `path` and moved into
/// place without clobbering, so a concurrent writer or an interrupted run
/// never leaves a half-written file behind. Returns `false` when `path`
/// already existed and was left untouched.
pub fn write_new(path: &Path, contents: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = Builder::new().prefix(".cv-templater").tempfile_in(parent)?;
    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(err.error),
    }
}
