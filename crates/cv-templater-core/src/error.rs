use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    ToolchainUnavailable = 1,
    InvalidConfig = 2,
    Io = 3,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input file '{}' not found", path.display())]
    InputNotFound { path: PathBuf },

    #[error("unable to run {}: {source}", program.display())]
    ToolchainMissing { program: PathBuf, source: io::Error },

    #[error("{} exited with {status}: {stderr}", program.display())]
    Pandoc {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{} produced no output at {}", program.display(), output.display())]
    MissingOutput { program: PathBuf, output: PathBuf },

    #[error("unrecognised version banner: {0:?}")]
    UnknownVersion(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ToolchainMissing { .. } | Self::UnknownVersion(_) => {
                ExitCode::ToolchainUnavailable
            }
            Self::Io { .. } => ExitCode::Io,
            // Per-document failures are reported and counted, never fatal.
            Self::InputNotFound { .. } | Self::Pandoc { .. } | Self::MissingOutput { .. } => {
                ExitCode::Success
            }
        }
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;
