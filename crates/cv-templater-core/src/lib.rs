//! Conversion engine behind `cv-templater`.
//!
//! Markdown CVs are handed to an external converter (pandoc); this crate owns
//! everything around that call: output paths, per-format options, PDF engine
//! discovery with HTML fallback, batch runs and the bundled sample files.

pub mod batch;
pub mod convert;
pub mod engine;
pub mod error;
pub mod format;
pub mod fs;
pub mod layout;
pub mod lookup;
pub mod notice;
pub mod pandoc;
pub mod sample;
pub mod styles;

pub use batch::{BatchFailure, BatchOutcome};
pub use convert::{ConversionOutcome, CvConverter, Scaffold};
pub use cv_templater_config::Config;
pub use engine::{EngineKind, PdfEngine};
pub use error::{ConvertError, ConvertResult, ExitCode};
pub use format::OutputFormat;
pub use lookup::{ExecutableLookup, SystemPath};
pub use notice::{Console, Notice, NoticeSink, Silent};
pub use pandoc::{ConversionRequest, Converter, PandocConverter};
