use std::path::{Path, PathBuf};

use cv_templater_config::Config;
use tracing::{debug, info, warn};

use crate::engine::{select_pdf_engine, EngineKind, PdfEngine};
use crate::error::{ConvertError, ConvertResult};
use crate::format::OutputFormat;
use crate::fs::write_new;
use crate::layout::{default_output_path, ensure_dir, ensure_layout};
use crate::lookup::{ExecutableLookup, SystemPath};
use crate::notice::{Notice, NoticeSink, Silent};
use crate::pandoc::{ConversionRequest, Converter, PandocConverter};
use crate::sample::{SAMPLE_CV, SAMPLE_FILE_NAME};
use crate::styles::PRINT_STYLESHEET;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub requested: OutputFormat,
    /// Format actually produced; differs from `requested` after a PDF fallback.
    pub format: OutputFormat,
    pub output: PathBuf,
    pub engine: Option<String>,
}

impl ConversionOutcome {
    pub fn fell_back(&self) -> bool {
        self.requested != self.format
    }
}

/// Whether a generated file was written or already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scaffold {
    Created(PathBuf),
    AlreadyPresent(PathBuf),
}

impl Scaffold {
    pub fn path(&self) -> &Path {
        match self {
            Scaffold::Created(path) | Scaffold::AlreadyPresent(path) => path,
        }
    }
}

/// Engine probing is done at most once per cache; a batch shares one.
#[derive(Debug, Default)]
pub(crate) struct EngineCache(Option<Option<PdfEngine>>);

/// Converts CVs according to a resolved [`Config`].
pub struct CvConverter<C = PandocConverter, L = SystemPath> {
    config: Config,
    converter: C,
    lookup: L,
    notices: Box<dyn NoticeSink>,
}

impl CvConverter {
    /// Production wiring: pandoc from the configuration, engines from `PATH`.
    pub fn from_config(config: Config) -> Self {
        let converter = PandocConverter::new(config.pandoc.program.clone());
        CvConverter::new(config, converter, SystemPath)
    }
}

impl<C: Converter, L: ExecutableLookup> CvConverter<C, L> {
    pub fn new(config: Config, converter: C, lookup: L) -> Self {
        Self {
            config,
            converter,
            lookup,
            notices: Box::new(Silent),
        }
    }

    pub fn with_notices(mut self, notices: impl NoticeSink + 'static) -> Self {
        self.notices = Box::new(notices);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notices.notice(notice);
    }

    /// Path as shown to the user: relative to the working directory when possible.
    pub(crate) fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.config.sources.working_directory)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// Verify that the conversion toolchain answers. Returns its version.
    pub fn check_toolchain(&self) -> ConvertResult<String> {
        let version = self.converter.version()?;
        info!(%version, "conversion toolchain ready");
        Ok(version)
    }

    /// Create the source and output directories, announcing each new one.
    pub fn ensure_layout(&self) -> ConvertResult<Vec<PathBuf>> {
        let created = ensure_layout(&self.config.paths)?;
        for dir in &created {
            self.notify(Notice::DirectoryCreated {
                path: self.display_path(dir),
            });
        }
        Ok(created)
    }

    pub fn default_output_path(&self, input: &Path, format: OutputFormat) -> PathBuf {
        default_output_path(&self.config.paths.output_dir, input, format)
    }

    /// First configured PDF engine that is installed and works.
    pub fn select_pdf_engine(&self) -> Option<PdfEngine> {
        select_pdf_engine(
            &self.converter,
            &self.lookup,
            &self.config.pdf.engines,
            &*self.notices,
        )
    }

    /// Convert one Markdown file. Without `output`, the file lands in
    /// `<output_dir>/<format>/<stem>.<format>`.
    pub fn convert(
        &self,
        input: &Path,
        format: OutputFormat,
        output: Option<&Path>,
    ) -> ConvertResult<ConversionOutcome> {
        self.convert_with(input, format, output, &mut EngineCache::default())
    }

    pub(crate) fn convert_with(
        &self,
        input: &Path,
        format: OutputFormat,
        output: Option<&Path>,
        engines: &mut EngineCache,
    ) -> ConvertResult<ConversionOutcome> {
        let result = self.try_convert(input, format, output, engines);
        match &result {
            Ok(outcome) => self.notify(Notice::Converted {
                output: self.display_path(&outcome.output),
            }),
            Err(ConvertError::InputNotFound { path }) => self.notify(Notice::InputMissing {
                path: path.clone(),
            }),
            Err(err) => self.notify(Notice::ConversionFailed {
                message: err.to_string(),
            }),
        }
        result
    }

    fn try_convert(
        &self,
        input: &Path,
        requested: OutputFormat,
        output: Option<&Path>,
        engines: &mut EngineCache,
    ) -> ConvertResult<ConversionOutcome> {
        if !input.is_file() {
            return Err(ConvertError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let mut output = match output {
            Some(path) => path.to_path_buf(),
            None => self.default_output_path(input, requested),
        };

        let mut format = requested;
        let mut engine_name = None;
        let extra_args = match requested {
            OutputFormat::Pdf => match self.cached_engine(engines) {
                Some(engine) => {
                    engine_name = Some(engine.name.clone());
                    self.pdf_args(&engine)
                }
                None => {
                    warn!(input = %input.display(), "no usable PDF engine, falling back to HTML");
                    self.notify(Notice::PdfFallback);
                    format = OutputFormat::Html;
                    output.set_extension(OutputFormat::Html.extension());
                    self.html_args()
                }
            },
            OutputFormat::Docx => self.docx_args(),
            OutputFormat::Html => self.html_args(),
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }

        let request = ConversionRequest::new(format, &output).with_args(extra_args);
        debug!(input = %input.display(), output = %output.display(), %format, "converting");
        self.converter.convert_file(input, &request)?;

        Ok(ConversionOutcome {
            input: input.to_path_buf(),
            requested,
            format,
            output,
            engine: engine_name,
        })
    }

    fn cached_engine(&self, cache: &mut EngineCache) -> Option<PdfEngine> {
        cache
            .0
            .get_or_insert_with(|| self.select_pdf_engine())
            .clone()
    }

    /// Options for a PDF rendered through `engine`.
    pub fn pdf_args(&self, engine: &PdfEngine) -> Vec<String> {
        let pdf = &self.config.pdf;
        let mut args = vec![
            engine.pandoc_flag(),
            "-V".to_string(),
            format!("geometry:margin={}", pdf.margin),
            "-V".to_string(),
            format!("fontsize={}", pdf.font_size),
        ];
        match engine.kind {
            EngineKind::Latex => {
                args.push("-V".to_string());
                args.push(format!("mainfont={}", pdf.latex_main_font));
            }
            EngineKind::Html => args.extend(self.stylesheet_arg()),
            EngineKind::Other => {}
        }
        args.push(format!("--highlight-style={}", pdf.highlight_style));
        args
    }

    /// Options for Word output: the reference document, when one exists.
    pub fn docx_args(&self) -> Vec<String> {
        let reference = self.config.reference_doc_path();
        if reference.is_file() {
            vec![format!("--reference-doc={}", reference.display())]
        } else {
            Vec::new()
        }
    }

    /// Options for standalone HTML, styled when the stylesheet exists.
    pub fn html_args(&self) -> Vec<String> {
        let mut args = vec!["--standalone".to_string()];
        args.extend(self.stylesheet_arg());
        args
    }

    fn stylesheet_arg(&self) -> Option<String> {
        let stylesheet = self.config.stylesheet_path();
        stylesheet
            .is_file()
            .then(|| format!("--css={}", stylesheet.display()))
    }

    /// Write the sample CV into the source directory unless it is already there.
    pub fn create_sample(&self) -> ConvertResult<Scaffold> {
        let path = self.config.paths.source_dir.join(SAMPLE_FILE_NAME);
        let created = write_new(&path, SAMPLE_CV).map_err(|err| ConvertError::io(&path, err))?;
        if created {
            self.notify(Notice::SampleCreated {
                path: self.display_path(&path),
            });
            Ok(Scaffold::Created(path))
        } else {
            debug!(path = %path.display(), "sample CV already present");
            Ok(Scaffold::AlreadyPresent(path))
        }
    }

    /// Write the print stylesheet into the templates directory unless present.
    pub fn init_styles(&self) -> ConvertResult<Scaffold> {
        let path = self.config.stylesheet_path();
        let created =
            write_new(&path, PRINT_STYLESHEET).map_err(|err| ConvertError::io(&path, err))?;
        if created {
            self.notify(Notice::StylesheetCreated {
                path: self.display_path(&path),
            });
            Ok(Scaffold::Created(path))
        } else {
            debug!(path = %path.display(), "stylesheet already present");
            Ok(Scaffold::AlreadyPresent(path))
        }
    }
}
