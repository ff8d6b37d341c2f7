//! The conversion seam. Everything that actually turns Markdown into a
//! document goes through [`Converter`]; [`PandocConverter`] is the production
//! implementation and shells out to the `pandoc` executable.

use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::format::OutputFormat;

/// One invocation of the converter: what to produce, where, and with which
/// extra options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub format: OutputFormat,
    pub output: PathBuf,
    pub extra_args: Vec<String>,
}

impl ConversionRequest {
    pub fn new(format: OutputFormat, output: impl Into<PathBuf>) -> Self {
        Self {
            format,
            output: output.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// External document converter treated as a black box.
pub trait Converter {
    /// Version string of the underlying toolchain; failing here means the
    /// toolchain is unusable.
    fn version(&self) -> ConvertResult<String>;

    /// Convert a Markdown file on disk.
    fn convert_file(&self, input: &Path, request: &ConversionRequest) -> ConvertResult<()>;

    /// Convert Markdown text held in memory.
    fn convert_text(&self, text: &str, request: &ConversionRequest) -> ConvertResult<()>;
}

/// Converter backed by the pandoc executable.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one conversion, with the input file (if any) last.
    pub fn command_args(input: Option<&Path>, request: &ConversionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--from".into(), "markdown".into()];
        if let Some(writer) = request.format.pandoc_writer() {
            args.push("--to".into());
            args.push(writer.into());
        }
        args.push("--output".into());
        args.push(request.output.as_os_str().to_owned());
        args.extend(request.extra_args.iter().map(OsString::from));
        if let Some(input) = input {
            args.push(input.as_os_str().to_owned());
        }
        args
    }

    fn spawn_error(&self, source: std::io::Error) -> ConvertError {
        ConvertError::ToolchainMissing {
            program: self.program.clone(),
            source,
        }
    }

    fn finish(&self, output: Output, request: &ConversionRequest) -> ConvertResult<()> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(status = %output.status, stderr = %stderr, "pandoc failed");
            return Err(ConvertError::Pandoc {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        if !request.output.exists() {
            return Err(ConvertError::MissingOutput {
                program: self.program.clone(),
                output: request.output.clone(),
            });
        }

        Ok(())
    }
}

impl Converter for PandocConverter {
    fn version(&self) -> ConvertResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| self.spawn_error(err))?;

        let banner = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            return Err(ConvertError::Pandoc {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_version(&banner)
    }

    fn convert_file(&self, input: &Path, request: &ConversionRequest) -> ConvertResult<()> {
        let args = Self::command_args(Some(input), request);
        debug!(program = %self.program.display(), ?args, "running pandoc");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| self.spawn_error(err))?;
        self.finish(output, request)
    }

    fn convert_text(&self, text: &str, request: &ConversionRequest) -> ConvertResult<()> {
        let args = Self::command_args(None, request);
        debug!(program = %self.program.display(), ?args, "running pandoc on stdin");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| self.spawn_error(err))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()) {
                Ok(()) => {}
                // pandoc may bail out before reading; its exit status tells the story.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
                Err(err) => return Err(ConvertError::io(&self.program, err)),
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|err| ConvertError::io(&self.program, err))?;
        self.finish(output, request)
    }
}

/// Extract `3.1.11` from a banner such as `pandoc 3.1.11\nFeatures: ...`.
pub fn parse_version(banner: &str) -> ConvertResult<String> {
    banner
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .filter(|version| version.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .ok_or_else(|| ConvertError::UnknownVersion(banner.trim().to_string()))
}
