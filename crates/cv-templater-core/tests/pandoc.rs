//! Drives `PandocConverter` against a shell script standing in for pandoc.
//! Everything lives in one test so no other thread forks while the script is
//! being written.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cv_templater_core::{ConversionRequest, ConvertError, Converter, OutputFormat, PandocConverter};
use tempfile::TempDir;

const FAKE_PANDOC: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "pandoc 3.1.11"
    echo "Features: +server +lua"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    case "$1" in
        --output) out="$2"; shift ;;
        --pdf-engine=*)
            engine="${1#--pdf-engine=}"
            echo "$engine not found. Please select a different --pdf-engine or install $engine" >&2
            exit 47 ;;
    esac
    shift
done
cat > /dev/null
case "$out" in
    *skip*) exit 0 ;;
esac
echo "converted" > "$out"
"#;

fn install_script(dir: &Path) -> PathBuf {
    let path = dir.join("pandoc");
    fs::write(&path, FAKE_PANDOC).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

#[test]
fn pandoc_converter_round_trip_through_script() {
    let temp = TempDir::new().expect("tempdir");
    let converter = PandocConverter::new(install_script(temp.path()));

    assert_eq!(converter.version().expect("version"), "3.1.11");

    let input = temp.path().join("cv.md");
    fs::write(&input, "# CV\n").unwrap();
    let output = temp.path().join("cv.html");
    let request = ConversionRequest::new(OutputFormat::Html, &output).with_args(["--standalone"]);
    converter
        .convert_file(&input, &request)
        .expect("file conversion");
    assert_eq!(fs::read_to_string(&output).unwrap(), "converted\n");

    let text_output = temp.path().join("inline.docx");
    converter
        .convert_text("Test", &ConversionRequest::new(OutputFormat::Docx, &text_output))
        .expect("text conversion");
    assert!(text_output.is_file());

    let probe = ConversionRequest::new(OutputFormat::Pdf, temp.path().join("probe.pdf"))
        .with_args(["--pdf-engine=weasyprint"]);
    match converter.convert_text("Test", &probe) {
        Err(ConvertError::Pandoc { status, stderr, .. }) => {
            assert_eq!(status.code(), Some(47));
            assert!(stderr.contains("weasyprint not found"));
        }
        other => panic!("expected pandoc failure, got {other:?}"),
    }

    let silent = ConversionRequest::new(OutputFormat::Html, temp.path().join("skip.html"));
    assert!(matches!(
        converter.convert_file(&input, &silent),
        Err(ConvertError::MissingOutput { .. })
    ));
}
