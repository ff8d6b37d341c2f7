use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use cv_templater_config::{Config, ConfigError, ConfigSourceKind, LoadOptions, DEFAULT_PDF_ENGINES};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.paths.source_dir, working_dir.join("cv_templates"));
    assert_eq!(config.paths.output_dir, working_dir.join("output"));
    assert_eq!(config.paths.templates_dir, working_dir.join("templates"));
    assert_eq!(config.pandoc.program, PathBuf::from("pandoc"));
    assert_eq!(config.pdf.engines, DEFAULT_PDF_ENGINES);
    assert_eq!(config.pdf.margin, "2cm");
    assert_eq!(config.pdf.font_size, "11pt");
    assert_eq!(config.pdf.latex_main_font, "DejaVu Sans");
    assert_eq!(config.pdf.highlight_style, "tango");
    assert_eq!(
        config.stylesheet_path(),
        working_dir.join("templates").join("cv_style.css")
    );

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_anchors_paths_at_declaring_layer() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".cv-templater.toml"),
        r#"
        [paths]
        templates_dir = "shared/templates"

        [pdf]
        engines = ["xelatex"]
        margin = "1.5cm"
        "#,
    );

    let workspace = git_root.join("resumes");
    fs::create_dir(&workspace).expect("create workspace");
    write_file(
        workspace.join(".cv-templater.toml"),
        r#"
        [paths]
        output_dir = "build"

        [pdf]
        font_size = "10pt"
        "#,
    );

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [pdf]
        margin = "1cm"

        [templates]
        stylesheet = "print.css"
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&workspace)
            .with_override_path(&override_path),
    )
    .expect("load layered config");

    let workspace = canonical(&workspace);
    assert_eq!(config.paths.templates_dir, git_root.join("shared/templates"));
    assert_eq!(config.paths.output_dir, workspace.join("build"));
    assert_eq!(config.paths.source_dir, workspace.join("cv_templates"));
    assert_eq!(config.pdf.engines, vec!["xelatex".to_string()]);
    assert_eq!(config.pdf.margin, "1cm");
    assert_eq!(config.pdf.font_size, "10pt");
    assert_eq!(
        config.stylesheet_path(),
        git_root.join("shared/templates/print.css")
    );

    let kinds: Vec<_> = config.sources.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override,
        ]
    );
}

#[test]
fn explicit_pandoc_path_is_anchored_but_bare_name_is_kept() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    write_file(
        working_dir.join(".cv-templater.toml"),
        "[pandoc]\nprogram = \"tools/pandoc\"\n",
    );
    let config = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect("load config");
    assert_eq!(config.pandoc.program, working_dir.join("tools/pandoc"));

    write_file(
        working_dir.join(".cv-templater.toml"),
        "[pandoc]\nprogram = \"pandoc-3\"\n",
    );
    let config = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect("load config");
    assert_eq!(config.pandoc.program, PathBuf::from("pandoc-3"));
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path())
            .with_override_path("missing.toml"),
    )
    .expect_err("override must exist");

    assert!(matches!(err, ConfigError::OverrideNotFound { .. }));
}

#[test]
fn unknown_keys_are_parse_errors() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".cv-templater.toml"),
        "[pdf]\nengine = \"xelatex\"\n",
    );

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("typo in key");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn validation_errors_name_their_source() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".cv-templater.toml"),
        "[pdf]\nengines = [\"weasyprint\", \"  \"]\n",
    );

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path()))
        .expect_err("blank engine name");
    match err {
        ConfigError::Validation(errors) => {
            let rendered = errors.to_string();
            assert!(rendered.contains("pdf.engines cannot contain blank names"));
            assert!(rendered.contains("local config"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
