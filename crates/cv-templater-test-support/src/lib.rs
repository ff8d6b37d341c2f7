//! Shared test harness utilities for cv-templater crates.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cv_templater_config::Config;
use cv_templater_core::{
    ConversionRequest, ConvertError, ConvertResult, Converter, ExecutableLookup, Notice,
    NoticeSink,
};
use tempfile::TempDir;

/// Scratch directory plus default configuration anchored inside it.
pub struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = fs::canonicalize(dir.path()).expect("canonicalize tempdir");
        let config = Config::defaults_at(root);
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        &self.config.sources.working_directory
    }

    /// Write `contents` to `relative`, creating parent folders.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
        path
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// What the scripted converter was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// `None` for in-memory text conversions.
    pub input: Option<PathBuf>,
    pub request: ConversionRequest,
}

/// In-process stand-in for pandoc.
///
/// Successful conversions write a small marker file at the requested output.
/// Any request naming a broken engine, or converting one of the broken
/// inputs, fails the way pandoc would.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConverter {
    broken_engines: HashSet<String>,
    broken_inputs: HashSet<PathBuf>,
    unavailable: bool,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter whose toolchain cannot be started at all.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_broken_engine(mut self, engine: &str) -> Self {
        self.broken_engines.insert(engine.to_string());
        self
    }

    pub fn with_broken_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.broken_inputs.insert(input.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// File conversions only, without engine probes.
    pub fn file_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.input.is_some())
            .collect()
    }

    fn run(&self, input: Option<&Path>, request: &ConversionRequest) -> ConvertResult<()> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            input: input.map(Path::to_path_buf),
            request: request.clone(),
        });

        if self.unavailable {
            return Err(missing_toolchain());
        }

        let broken_engine = request.extra_args.iter().find_map(|arg| {
            arg.strip_prefix("--pdf-engine=")
                .filter(|engine| self.broken_engines.contains(*engine))
        });
        if let Some(engine) = broken_engine {
            return Err(ConvertError::Io {
                path: request.output.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("{engine} not found. Please select a different --pdf-engine"),
                ),
            });
        }

        if let Some(input) = input {
            if self.broken_inputs.contains(input) {
                return Err(ConvertError::Io {
                    path: input.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "could not parse YAML metadata",
                    ),
                });
            }
        }

        let marker = match input {
            Some(input) => format!("{} -> {}\n", input.display(), request.format),
            None => format!("probe -> {}\n", request.format),
        };
        fs::write(&request.output, marker).map_err(|source| ConvertError::Io {
            path: request.output.clone(),
            source,
        })
    }
}

fn missing_toolchain() -> ConvertError {
    ConvertError::ToolchainMissing {
        program: PathBuf::from("pandoc"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    }
}

impl Converter for ScriptedConverter {
    fn version(&self) -> ConvertResult<String> {
        if self.unavailable {
            Err(missing_toolchain())
        } else {
            Ok("3.1.11".to_string())
        }
    }

    fn convert_file(&self, input: &Path, request: &ConversionRequest) -> ConvertResult<()> {
        self.run(Some(input), request)
    }

    fn convert_text(&self, _text: &str, request: &ConversionRequest) -> ConvertResult<()> {
        self.run(None, request)
    }
}

/// `PATH` replacement that only knows the executables it was given.
#[derive(Debug, Default, Clone)]
pub struct FixedLookup {
    known: HashMap<String, PathBuf>,
}

impl FixedLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str) -> Self {
        self.known
            .insert(name.to_string(), PathBuf::from("/usr/bin").join(name));
        self
    }
}

impl ExecutableLookup for FixedLookup {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.known.get(name).cloned()
    }
}

/// Collects rendered notices for assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordedNotices {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordedNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock").clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.notices().iter().map(ToString::to_string).collect()
    }
}

impl NoticeSink for RecordedNotices {
    fn notice(&self, notice: Notice) {
        self.notices.lock().expect("notices lock").push(notice);
    }
}
