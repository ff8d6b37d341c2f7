//! PDF engine discovery.
//!
//! Candidates are tried in priority order. An engine counts as usable only
//! when it is on `PATH` *and* a throwaway conversion of a one-word document
//! succeeds with it. The probe output lives in a [`tempfile::NamedTempFile`],
//! so it is removed however the probe ends.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::format::OutputFormat;
use crate::lookup::ExecutableLookup;
use crate::notice::{Notice, NoticeSink};
use crate::pandoc::{ConversionRequest, Converter};

const PROBE_DOCUMENT: &str = "Test";

/// How pandoc feeds an engine, which decides the styling options it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Typesets LaTeX; understands `mainfont`.
    Latex,
    /// Renders HTML; understands `--css`.
    Html,
    Other,
}

impl EngineKind {
    pub fn classify(name: &str) -> Self {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(name);
        match stem {
            "pdflatex" | "xelatex" | "lualatex" | "latexmk" | "tectonic" => EngineKind::Latex,
            "weasyprint" | "wkhtmltopdf" | "prince" | "pagedjs-cli" => EngineKind::Html,
            _ => EngineKind::Other,
        }
    }
}

/// An engine that passed the probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEngine {
    pub name: String,
    pub path: PathBuf,
    pub kind: EngineKind,
}

impl PdfEngine {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let kind = EngineKind::classify(&name);
        Self {
            name,
            path: path.into(),
            kind,
        }
    }

    pub fn pandoc_flag(&self) -> String {
        format!("--pdf-engine={}", self.name)
    }
}

/// Return the first engine in `candidates` that is installed and renders
/// the probe document, or `None` when none does.
pub fn select_pdf_engine<C, L>(
    converter: &C,
    lookup: &L,
    candidates: &[String],
    notices: &dyn NoticeSink,
) -> Option<PdfEngine>
where
    C: Converter + ?Sized,
    L: ExecutableLookup + ?Sized,
{
    for name in candidates {
        let Some(path) = lookup.locate(name) else {
            debug!(engine = %name, "engine not on PATH");
            notices.notice(Notice::EngineMissing {
                engine: name.clone(),
            });
            continue;
        };

        notices.notice(Notice::EngineFound {
            engine: name.clone(),
            path: path.clone(),
        });

        let engine = PdfEngine::new(name.as_str(), path);
        match probe(converter, &engine) {
            Ok(()) => {
                info!(engine = %engine.name, path = %engine.path.display(), "selected PDF engine");
                notices.notice(Notice::EngineSelected {
                    engine: engine.name.clone(),
                });
                return Some(engine);
            }
            Err(err) => {
                warn!(engine = %engine.name, error = %err, "PDF engine probe failed");
                notices.notice(Notice::EngineFailed {
                    engine: engine.name.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    None
}

/// Render the probe document with `engine` into a scratch file.
pub fn probe<C>(converter: &C, engine: &PdfEngine) -> ConvertResult<()>
where
    C: Converter + ?Sized,
{
    let scratch = tempfile::Builder::new()
        .prefix("cv-templater-probe")
        .suffix(".pdf")
        .tempfile()
        .map_err(|err| ConvertError::io(std::env::temp_dir(), err))?;

    let request = probe_request(&scratch, engine);
    debug!(engine = %engine.name, output = %request.output.display(), "probing PDF engine");
    converter.convert_text(PROBE_DOCUMENT, &request)
}

fn probe_request(scratch: &NamedTempFile, engine: &PdfEngine) -> ConversionRequest {
    ConversionRequest::new(OutputFormat::Pdf, scratch.path()).with_args([engine.pandoc_flag()])
}
