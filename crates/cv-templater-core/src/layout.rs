use std::fs;
use std::path::{Path, PathBuf};

use cv_templater_config::PathSettings;

use crate::error::{ConvertError, ConvertResult};
use crate::format::OutputFormat;

/// `<output_dir>/<format>/<input stem>.<ext>`.
pub fn default_output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "output".into());
    let mut file_name = stem;
    file_name.push(".");
    file_name.push(format.extension());
    output_dir.join(format.as_str()).join(file_name)
}

/// Create `dir` and its parents. Returns `true` when it did not exist before.
pub fn ensure_dir(dir: &Path) -> ConvertResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|err| ConvertError::io(dir, err))?;
    Ok(true)
}

/// Make sure the source folder and one output folder per format exist.
/// Returns the directories that had to be created.
pub fn ensure_layout(paths: &PathSettings) -> ConvertResult<Vec<PathBuf>> {
    let mut created = Vec::new();
    if ensure_dir(&paths.source_dir)? {
        created.push(paths.source_dir.clone());
    }
    for format in OutputFormat::ALL {
        let dir = paths.output_dir.join(format.as_str());
        if ensure_dir(&dir)? {
            created.push(dir);
        }
    }
    Ok(created)
}
