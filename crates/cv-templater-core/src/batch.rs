use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::convert::{ConversionOutcome, CvConverter, EngineCache};
use crate::error::{ConvertError, ConvertResult};
use crate::format::OutputFormat;
use crate::layout::{default_output_path, ensure_dir};
use crate::lookup::ExecutableLookup;
use crate::notice::Notice;
use crate::pandoc::Converter;

/// Summary of a batch run over the source directory.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Markdown files discovered, in conversion order.
    pub found: Vec<PathBuf>,
    pub converted: Vec<ConversionOutcome>,
    pub failures: Vec<BatchFailure>,
    /// The source directory was missing and has just been created.
    pub created_source_dir: bool,
}

impl BatchOutcome {
    pub fn success_count(&self) -> usize {
        self.converted.len()
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: ConvertError,
}

/// Top-level `*.md` files of `dir`, sorted by name.
pub fn markdown_files(dir: &Path) -> ConvertResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            ConvertError::io(path, err.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

impl<C: Converter, L: ExecutableLookup> CvConverter<C, L> {
    /// Convert every Markdown file in the source directory. Individual
    /// failures are recorded and the run continues.
    pub fn convert_all(&self, format: OutputFormat) -> ConvertResult<BatchOutcome> {
        let source_dir = self.config().paths.source_dir.clone();
        if source_dir.exists() && !source_dir.is_dir() {
            debug!(path = %source_dir.display(), "source path is not a directory");
            self.notify(Notice::NoMarkdownFiles {
                dir: self.display_path(&source_dir),
            });
            return Ok(BatchOutcome::default());
        }
        if !source_dir.is_dir() {
            ensure_dir(&source_dir)?;
            self.notify(Notice::SourceDirCreated {
                path: self.display_path(&source_dir),
            });
            return Ok(BatchOutcome {
                created_source_dir: true,
                ..BatchOutcome::default()
            });
        }

        let output_dir = self.config().paths.output_dir.clone();
        ensure_dir(&output_dir.join(format.as_str()))?;

        let found = markdown_files(&source_dir)?;
        if found.is_empty() {
            self.notify(Notice::NoMarkdownFiles {
                dir: self.display_path(&source_dir),
            });
            return Ok(BatchOutcome {
                found,
                ..BatchOutcome::default()
            });
        }

        self.notify(Notice::BatchStarted {
            count: found.len(),
            format,
        });

        let mut engines = EngineCache::default();
        let mut outcome = BatchOutcome::default();
        for input in &found {
            let name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.notify(Notice::Converting { name });

            let target = default_output_path(&output_dir, input, format);
            match self.convert_with(input, format, Some(target.as_path()), &mut engines) {
                Ok(converted) => outcome.converted.push(converted),
                Err(error) => {
                    debug!(input = %input.display(), %error, "batch entry failed");
                    outcome.failures.push(BatchFailure {
                        input: input.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            converted = outcome.converted.len(),
            total = found.len(),
            "batch conversion finished"
        );
        self.notify(Notice::BatchFinished {
            converted: outcome.converted.len(),
            total: found.len(),
        });

        outcome.found = found;
        Ok(outcome)
    }
}
