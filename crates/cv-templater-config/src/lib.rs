//! Configuration primitives and loader for cv-templater.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Relative paths are anchored at the directory of the layer that declared
//! them, so a `.cv-templater.toml` at the git root keeps pointing at the same
//! folders no matter where the tool is launched from.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".cv-templater.toml";

/// PDF engines tried in priority order when nothing else is configured.
pub const DEFAULT_PDF_ENGINES: &[&str] =
    &["weasyprint", "wkhtmltopdf", "prince", "pdflatex", "xelatex"];

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub paths: PathSettings,
    pub pandoc: PandocSettings,
    pub pdf: PdfSettings,
    pub templates: TemplateSettings,
    pub sources: ConfigSources,
}

/// Directory layout used by every command.
#[derive(Clone, Debug)]
pub struct PathSettings {
    /// Folder holding the Markdown CVs (`cv_templates/`).
    pub source_dir: PathBuf,
    /// Root of the generated artifacts (`output/`); one subfolder per format.
    pub output_dir: PathBuf,
    /// Optional styling assets (`templates/`).
    pub templates_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct PandocSettings {
    pub program: PathBuf,
}

/// Rendering knobs forwarded to pandoc when producing PDF.
#[derive(Clone, Debug)]
pub struct PdfSettings {
    pub engines: Vec<String>,
    pub margin: String,
    pub font_size: String,
    pub latex_main_font: String,
    pub highlight_style: String,
}

/// Styling assets looked up inside `paths.templates_dir`.
#[derive(Clone, Debug)]
pub struct TemplateSettings {
    pub reference_doc: PathBuf,
    pub stylesheet: PathBuf,
}

impl Config {
    /// Reference DOCX consulted for Word output.
    pub fn reference_doc_path(&self) -> PathBuf {
        self.paths.templates_dir.join(&self.templates.reference_doc)
    }

    /// Stylesheet consulted for HTML output and HTML-based PDF engines.
    pub fn stylesheet_path(&self) -> PathBuf {
        self.paths.templates_dir.join(&self.templates.stylesheet)
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let local_config_path = working_dir.join(CONFIG_FILE_NAME);
        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            paths: resolved.paths,
            pandoc: resolved.pandoc,
            pdf: resolved.pdf,
            templates: resolved.templates,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults anchored at `working_dir`, without touching the disk.
    pub fn defaults_at(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let source = ConfigSource::default(working_dir.clone());
        // Every field has a built-in value that passes validation.
        let resolved = defaults_layer(source.clone())
            .finalize()
            .expect("built-in defaults satisfy validation");
        Config {
            paths: resolved.paths,
            pandoc: resolved.pandoc,
            pdf: resolved.pdf,
            templates: resolved.templates,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: vec![source],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let located = |value| Some(Located::new(value, source.clone()));
    let text = |value: &str| Some(Located::new(value.to_string(), source.clone()));

    PartialConfig {
        paths: PathsPartial {
            source_dir: located(PathBuf::from("cv_templates")),
            output_dir: located(PathBuf::from("output")),
            templates_dir: located(PathBuf::from("templates")),
        },
        pandoc: PandocPartial {
            program: Some(Located::new(PathBuf::from("pandoc"), source.clone())),
        },
        pdf: PdfPartial {
            engines: Some(Located::new(
                DEFAULT_PDF_ENGINES.iter().map(|e| e.to_string()).collect(),
                source.clone(),
            )),
            margin: text("2cm"),
            font_size: text("11pt"),
            latex_main_font: text("DejaVu Sans"),
            highlight_style: text("tango"),
        },
        templates: TemplatesPartial {
            reference_doc: Some(Located::new(PathBuf::from("reference.docx"), source.clone())),
            stylesheet: Some(Located::new(PathBuf::from("cv_style.css"), source.clone())),
        },
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    paths: PathsPartial,
    pandoc: PandocPartial,
    pdf: PdfPartial,
    templates: TemplatesPartial,
}

macro_rules! merge_fields {
    ($target:expr, $other:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if $other.$field.is_some() {
                $target.$field = $other.$field;
            }
        )+
    };
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        merge_fields!(self.paths, other.paths, [source_dir, output_dir, templates_dir]);
        merge_fields!(self.pandoc, other.pandoc, [program]);
        merge_fields!(
            self.pdf,
            other.pdf,
            [engines, margin, font_size, latex_main_font, highlight_style]
        );
        merge_fields!(self.templates, other.templates, [reference_doc, stylesheet]);
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let paths = PathSettings {
            source_dir: required_path(self.paths.source_dir, "paths.source_dir", &mut errors),
            output_dir: required_path(self.paths.output_dir, "paths.output_dir", &mut errors),
            templates_dir: required_path(
                self.paths.templates_dir,
                "paths.templates_dir",
                &mut errors,
            ),
        };

        // Bare program names are looked up on PATH; only explicit paths are anchored.
        let program = match self.pandoc.program {
            Some(located) if located.value.as_os_str().is_empty() => {
                errors.push(ConfigValidationError::new(
                    Some(located.source),
                    "pandoc.program cannot be empty".into(),
                ));
                PathBuf::new()
            }
            Some(located) if located.value.components().count() > 1 => resolve_path(&located),
            Some(located) => located.value,
            None => PathBuf::from("pandoc"),
        };

        let engines = match self.pdf.engines {
            Some(located) => {
                if located.value.is_empty() {
                    errors.push(ConfigValidationError::new(
                        Some(located.source.clone()),
                        "pdf.engines must list at least one engine".into(),
                    ));
                }
                for engine in &located.value {
                    if engine.trim().is_empty() {
                        errors.push(ConfigValidationError::new(
                            Some(located.source.clone()),
                            "pdf.engines cannot contain blank names".into(),
                        ));
                    }
                }
                located.value
            }
            None => DEFAULT_PDF_ENGINES.iter().map(|e| e.to_string()).collect(),
        };

        let pdf = PdfSettings {
            engines,
            margin: required_text(self.pdf.margin, "pdf.margin", &mut errors),
            font_size: required_text(self.pdf.font_size, "pdf.font_size", &mut errors),
            latex_main_font: required_text(
                self.pdf.latex_main_font,
                "pdf.latex_main_font",
                &mut errors,
            ),
            highlight_style: required_text(
                self.pdf.highlight_style,
                "pdf.highlight_style",
                &mut errors,
            ),
        };

        let templates = TemplateSettings {
            reference_doc: required_file_name(
                self.templates.reference_doc,
                "templates.reference_doc",
                &mut errors,
            ),
            stylesheet: required_file_name(
                self.templates.stylesheet,
                "templates.stylesheet",
                &mut errors,
            ),
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            paths,
            pandoc: PandocSettings { program },
            pdf,
            templates,
        })
    }
}

fn required_path(
    located: Option<Located<PathBuf>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> PathBuf {
    match located {
        Some(located) if located.value.as_os_str().is_empty() => {
            errors.push(ConfigValidationError::new(
                Some(located.source),
                format!("{context} cannot be empty"),
            ));
            PathBuf::new()
        }
        Some(located) => resolve_path(&located),
        None => {
            errors.push(ConfigValidationError::new(None, format!("{context} is not set")));
            PathBuf::new()
        }
    }
}

fn required_text(
    located: Option<Located<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> String {
    match located {
        Some(located) if located.value.trim().is_empty() => {
            errors.push(ConfigValidationError::new(
                Some(located.source),
                format!("{context} cannot be empty"),
            ));
            String::new()
        }
        Some(located) => located.value,
        None => {
            errors.push(ConfigValidationError::new(None, format!("{context} is not set")));
            String::new()
        }
    }
}

/// Template entries are file names relative to `paths.templates_dir`.
fn required_file_name(
    located: Option<Located<PathBuf>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> PathBuf {
    match located {
        Some(located) if located.value.as_os_str().is_empty() => {
            errors.push(ConfigValidationError::new(
                Some(located.source),
                format!("{context} cannot be empty"),
            ));
            PathBuf::new()
        }
        Some(located) => located.value,
        None => {
            errors.push(ConfigValidationError::new(None, format!("{context} is not set")));
            PathBuf::new()
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PathsPartial {
    source_dir: Option<Located<PathBuf>>,
    output_dir: Option<Located<PathBuf>>,
    templates_dir: Option<Located<PathBuf>>,
}

#[derive(Clone, Debug, Default)]
struct PandocPartial {
    program: Option<Located<PathBuf>>,
}

#[derive(Clone, Debug, Default)]
struct PdfPartial {
    engines: Option<Located<Vec<String>>>,
    margin: Option<Located<String>>,
    font_size: Option<Located<String>>,
    latex_main_font: Option<Located<String>>,
    highlight_style: Option<Located<String>>,
}

#[derive(Clone, Debug, Default)]
struct TemplatesPartial {
    reference_doc: Option<Located<PathBuf>>,
    stylesheet: Option<Located<PathBuf>>,
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    paths: PathSettings,
    pandoc: PandocSettings,
    pdf: PdfSettings,
    templates: TemplateSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError { source, message }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    paths: Option<RawPaths>,
    #[serde(default)]
    pandoc: Option<RawPandoc>,
    #[serde(default)]
    pdf: Option<RawPdf>,
    #[serde(default)]
    templates: Option<RawTemplates>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let locate = |value| Located::new(value, source.clone());
        let paths = self.paths.unwrap_or_default();
        let pandoc = self.pandoc.unwrap_or_default();
        let pdf = self.pdf.unwrap_or_default();
        let templates = self.templates.unwrap_or_default();

        PartialConfig {
            paths: PathsPartial {
                source_dir: paths.source_dir.map(locate),
                output_dir: paths.output_dir.map(locate),
                templates_dir: paths.templates_dir.map(locate),
            },
            pandoc: PandocPartial {
                program: pandoc.program.map(locate),
            },
            pdf: PdfPartial {
                engines: pdf.engines.map(|value| Located::new(value, source.clone())),
                margin: pdf.margin.map(|value| Located::new(value, source.clone())),
                font_size: pdf.font_size.map(|value| Located::new(value, source.clone())),
                latex_main_font: pdf
                    .latex_main_font
                    .map(|value| Located::new(value, source.clone())),
                highlight_style: pdf
                    .highlight_style
                    .map(|value| Located::new(value, source.clone())),
            },
            templates: TemplatesPartial {
                reference_doc: templates.reference_doc.map(locate),
                stylesheet: templates.stylesheet.map(locate),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaths {
    #[serde(default)]
    source_dir: Option<PathBuf>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    templates_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPandoc {
    #[serde(default)]
    program: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPdf {
    #[serde(default)]
    engines: Option<Vec<String>>,
    #[serde(default)]
    margin: Option<String>,
    #[serde(default)]
    font_size: Option<String>,
    #[serde(default)]
    latex_main_font: Option<String>,
    #[serde(default)]
    highlight_style: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplates {
    #[serde(default)]
    reference_doc: Option<PathBuf>,
    #[serde(default)]
    stylesheet: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_anchored_at_working_dir() {
        let config = Config::defaults_at("/work");
        assert_eq!(config.paths.source_dir, PathBuf::from("/work/cv_templates"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/work/output"));
        assert_eq!(
            config.reference_doc_path(),
            PathBuf::from("/work/templates/reference.docx")
        );
        assert_eq!(config.pandoc.program, PathBuf::from("pandoc"));
        assert_eq!(config.pdf.engines.len(), DEFAULT_PDF_ENGINES.len());
    }

    #[test]
    fn built_in_defaults_pass_validation() {
        let resolved = defaults_layer(ConfigSource::default(PathBuf::from("/work"))).finalize();
        assert!(resolved.is_ok(), "{}", resolved.unwrap_err());
    }

    #[test]
    fn later_layers_override_earlier_fields_only() {
        let mut base = defaults_layer(ConfigSource::default(PathBuf::from("/work")));
        let raw: RawConfig = toml::from_str("[pdf]\nmargin = \"1cm\"\n").unwrap();
        base.merge(raw.into_partial(ConfigSource::for_file(
            ConfigSourceKind::Local,
            PathBuf::from("/work/.cv-templater.toml"),
        )));

        let resolved = base.finalize().unwrap();
        assert_eq!(resolved.pdf.margin, "1cm");
        assert_eq!(resolved.pdf.font_size, "11pt");
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut base = defaults_layer(ConfigSource::default(PathBuf::from("/work")));
        let raw: RawConfig =
            toml::from_str("[pdf]\nengines = []\nmargin = \" \"\n[pandoc]\nprogram = \"\"\n")
                .unwrap();
        base.merge(raw.into_partial(ConfigSource::default(PathBuf::from("/work"))));

        let errors = base.finalize().unwrap_err();
        assert_eq!(errors.iter().count(), 3);
    }
}
