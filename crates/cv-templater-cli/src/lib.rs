use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use cv_templater_config::{Config, ConfigError, LoadOptions};
use cv_templater_core::{Console, CvConverter, ExitCode, OutputFormat};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = match Config::load(options) {
        Ok(config) => config,
        Err(err @ (ConfigError::Validation(_) | ConfigError::Parse { .. })) => {
            eprintln!("{err}");
            return Ok(ExitCode::InvalidConfig as i32);
        }
        Err(ConfigError::OverrideNotFound { path }) => {
            eprintln!("config file {} not found", path.display());
            return Ok(ExitCode::InvalidConfig as i32);
        }
        Err(err) => return Err(err.into()),
    };
    debug!(layers = ?config.sources.layers, "configuration loaded");

    let cv = CvConverter::from_config(config).with_notices(Console);

    print_banner();
    if let Err(err) = cv.ensure_layout() {
        eprintln!("{err}");
        return Ok(err.exit_code() as i32);
    }

    if let Err(err) = cv.check_toolchain() {
        debug!(error = %err, "toolchain check failed");
        println!("Error setting up pandoc: {err}");
        println!("Failed to set up pandoc. Please check your installation.");
        return Ok(ExitCode::ToolchainUnavailable as i32);
    }

    if cli.sample || cli.init_styles {
        if cli.sample {
            if let Err(err) = cv.create_sample() {
                eprintln!("{err}");
                return Ok(err.exit_code() as i32);
            }
        }
        if cli.init_styles {
            if let Err(err) = cv.init_styles() {
                eprintln!("{err}");
                return Ok(err.exit_code() as i32);
            }
        }
        return Ok(ExitCode::Success as i32);
    }

    let format = OutputFormat::from(cli.format);
    if cli.all {
        return match cv.convert_all(format) {
            Ok(_) => Ok(ExitCode::Success as i32),
            Err(err) => {
                eprintln!("{err}");
                Ok(err.exit_code() as i32)
            }
        };
    }

    if let Some(input) = &cli.input {
        // The outcome has already been reported; a failed document is not a failed run.
        let _ = cv.convert(input, format, cli.output.as_deref());
        return Ok(ExitCode::Success as i32);
    }

    print_usage();
    Ok(ExitCode::Success as i32)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_banner() {
    println!("Welcome to CV Templater!");
    println!("A simple tool to create and convert CV templates using Pandoc");
    println!("-----------------------------------------------------------");
}

fn print_usage() {
    println!("🔧 CV Converter - Usage Examples:");
    println!();
    println!("  Create sample CV:");
    println!("    cv-templater --sample");
    println!();
    println!("  Convert single CV:");
    println!("    cv-templater cv_templates/my_cv.md");
    println!();
    println!("  Convert all CVs to PDF:");
    println!("    cv-templater --all");
    println!();
    println!("  Convert all CVs to DOCX:");
    println!("    cv-templater --all -f docx");
    println!();
    println!("  Convert with custom output:");
    println!("    cv-templater cv_templates/my_cv.md -o resume.pdf");
    println!();
    println!("  Write a print stylesheet to templates/:");
    println!("    cv-templater --init-styles");
}

#[derive(Parser)]
#[command(
    name = "cv-templater",
    version,
    about = "Convert CV Markdown files to PDF, DOCX or HTML using pandoc"
)]
struct Cli {
    /// Input markdown file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatValue::Pdf)]
    format: FormatValue,
    /// Output file path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Convert all CVs in the source directory
    #[arg(long)]
    all: bool,
    /// Create a sample CV template
    #[arg(long)]
    sample: bool,
    /// Write the print stylesheet into the templates directory
    #[arg(long = "init-styles")]
    init_styles: bool,
    /// Load settings from this file on top of `.cv-templater.toml`
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log every pandoc invocation to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatValue {
    Pdf,
    Docx,
    Html,
}

impl From<FormatValue> for OutputFormat {
    fn from(value: FormatValue) -> Self {
        match value {
            FormatValue::Pdf => OutputFormat::Pdf,
            FormatValue::Docx => OutputFormat::Docx,
            FormatValue::Html => OutputFormat::Html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn format_defaults_to_pdf() {
        let cli = Cli::try_parse_from(["cv-templater", "cv.md"]).unwrap();
        assert!(matches!(cli.format, FormatValue::Pdf));
        assert_eq!(cli.input, Some(PathBuf::from("cv.md")));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cv-templater", "--all", "-f", "odt"]).is_err());
        let cli = Cli::try_parse_from(["cv-templater", "--all", "-f", "docx"]).unwrap();
        assert!(cli.all);
        assert!(matches!(cli.format, FormatValue::Docx));
    }
}
