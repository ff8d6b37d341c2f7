//! Progress notices emitted while converting. The CLI prints them; tests
//! record them.

use std::fmt;
use std::path::PathBuf;

use crate::format::OutputFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InputMissing { path: PathBuf },
    EngineMissing { engine: String },
    EngineFound { engine: String, path: PathBuf },
    EngineFailed { engine: String, message: String },
    EngineSelected { engine: String },
    PdfFallback,
    Converted { output: PathBuf },
    ConversionFailed { message: String },
    SourceDirCreated { path: PathBuf },
    NoMarkdownFiles { dir: PathBuf },
    BatchStarted { count: usize, format: OutputFormat },
    Converting { name: String },
    BatchFinished { converted: usize, total: usize },
    SampleCreated { path: PathBuf },
    StylesheetCreated { path: PathBuf },
    DirectoryCreated { path: PathBuf },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InputMissing { path } => {
                write!(f, "Error: Input file '{}' not found", path.display())
            }
            Notice::EngineMissing { engine } => write!(f, "Engine {engine} not found in PATH"),
            Notice::EngineFound { engine, path } => {
                write!(f, "Found {engine} at: {}", path.display())
            }
            Notice::EngineFailed { engine, message } => {
                write!(f, "Engine {engine} failed: {message}")
            }
            Notice::EngineSelected { engine } => write!(f, "Using PDF engine: {engine}"),
            Notice::PdfFallback => f.write_str("No PDF engine found. Converting to HTML instead."),
            Notice::Converted { output } => {
                write!(f, "✅ Successfully converted to: {}", output.display())
            }
            Notice::ConversionFailed { message } => write!(f, "❌ Conversion failed: {message}"),
            Notice::SourceDirCreated { path } => {
                let dir = path.display();
                writeln!(f, "Error: Source directory '{dir}' not found")?;
                writeln!(f, "Creating {dir} directory...")?;
                write!(f, "Please add your CV markdown files to {dir}/")
            }
            Notice::NoMarkdownFiles { dir } => {
                let dir = dir.display();
                writeln!(f, "No markdown files found in '{dir}'")?;
                write!(f, "Add your CV files as .md files in the {dir}/ directory")
            }
            Notice::BatchStarted { count, format } => write!(
                f,
                "Found {count} CV files to convert to {}",
                format.as_str().to_ascii_uppercase()
            ),
            Notice::Converting { name } => write!(f, "Converting: {name}"),
            Notice::BatchFinished { converted, total } => {
                write!(f, "\n🎉 Successfully converted {converted}/{total} files")
            }
            Notice::SampleCreated { path } => {
                write!(f, "📝 Created sample CV: {}", path.display())
            }
            Notice::StylesheetCreated { path } => {
                write!(f, "🎨 Created stylesheet: {}", path.display())
            }
            Notice::DirectoryCreated { path } => {
                write!(f, "Created directory: {}", path.display())
            }
        }
    }
}

/// Receiver for [`Notice`]s.
pub trait NoticeSink {
    fn notice(&self, notice: Notice);
}

/// Drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl NoticeSink for Silent {
    fn notice(&self, _notice: Notice) {}
}

/// Prints notices to stdout, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl NoticeSink for Console {
    fn notice(&self, notice: Notice) {
        println!("{notice}");
    }
}
