use std::fmt;
use std::str::FromStr;

/// Target document formats the converter can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pdf,
    Docx,
    Html,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] =
        &[OutputFormat::Pdf, OutputFormat::Docx, OutputFormat::Html];

    /// Token used on the command line and as the output subdirectory name.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Html => "html",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Pandoc writer name. PDF has none: pandoc picks the intermediate
    /// writer from `--pdf-engine` and the `.pdf` output extension.
    pub fn pandoc_writer(self) -> Option<&'static str> {
        match self {
            OutputFormat::Pdf => None,
            OutputFormat::Docx => Some("docx"),
            OutputFormat::Html => Some("html"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("unsupported output format '{other}'")),
        }
    }
}
