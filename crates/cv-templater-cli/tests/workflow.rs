//! End-to-end runs of the binary against a shell script standing in for
//! pandoc. Kept in a single test so the script is never written while
//! another test thread is forking.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_PANDOC: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "pandoc 3.1.11"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    case "$1" in
        --output) out="$2"; shift ;;
        --pdf-engine=*) echo "engine unavailable" >&2; exit 47 ;;
    esac
    shift
done
cat > /dev/null
echo "converted" > "$out"
"#;

fn setup(dir: &Path) {
    let script = dir.join("bin").join("pandoc");
    fs::create_dir_all(script.parent().unwrap()).unwrap();
    fs::write(&script, FAKE_PANDOC).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.join(".cv-templater.toml"),
        "[pandoc]\nprogram = \"bin/pandoc\"\n\n[pdf]\nengines = [\"cv-templater-missing-engine\"]\n",
    )
    .unwrap();
}

fn cargo_bin(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cv-templater").expect("binary");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn scripted_pandoc_workflow() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    setup(root);

    // No arguments: usage examples.
    cargo_bin(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("CV Converter - Usage Examples"));

    // Sample creation is idempotent.
    cargo_bin(root)
        .arg("--sample")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "📝 Created sample CV: cv_templates/sample_cv.md",
        ));
    let sample = root.join("cv_templates/sample_cv.md");
    fs::write(&sample, "# Edited\n").unwrap();
    cargo_bin(root)
        .arg("--sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sample CV").not());
    assert_eq!(fs::read_to_string(&sample).unwrap(), "# Edited\n");

    // Single HTML conversion with the default output path.
    cargo_bin(root)
        .args(["cv_templates/sample_cv.md", "-f", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✅ Successfully converted to: output/html/sample_cv.html",
        ));
    assert!(root.join("output/html/sample_cv.html").is_file());

    // PDF without a usable engine falls back to HTML next to the PDF target.
    cargo_bin(root)
        .args(["cv_templates/sample_cv.md", "-o", "out/resume.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Engine cv-templater-missing-engine not found in PATH",
        ))
        .stdout(predicate::str::contains(
            "No PDF engine found. Converting to HTML instead.",
        ));
    assert!(root.join("out/resume.html").is_file());
    assert!(!root.join("out/resume.pdf").exists());

    // Missing input is reported but does not fail the run.
    cargo_bin(root)
        .args(["cv_templates/ghost.md", "-f", "docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: Input file 'cv_templates/ghost.md' not found",
        ));

    // Batch conversion.
    fs::write(root.join("cv_templates/second.md"), "# Second\n").unwrap();
    cargo_bin(root)
        .args(["--all", "-f", "docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 CV files to convert to DOCX"))
        .stdout(predicate::str::contains("Successfully converted 2/2 files"));
    assert!(root.join("output/docx/sample_cv.docx").is_file());
    assert!(root.join("output/docx/second.docx").is_file());

    // Stylesheet scaffold.
    cargo_bin(root)
        .arg("--init-styles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created stylesheet: templates/cv_style.css"));
    assert!(root.join("templates/cv_style.css").is_file());
}
