use std::path::PathBuf;

/// Resolves executable names to paths.
pub trait ExecutableLookup {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Searches the process `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPath;

impl ExecutableLookup for SystemPath {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}
