use std::fs;
use std::path::PathBuf;

use dualtext_types::OutputFormat;
use job_file::*;

// ── Load / Save ────────────────────────────────────────────────────────────

#[test]
fn save_then_load_keeps_params() {
    let params = RunParams {
        text1: "ABC".to_string(),
        text2: "XYZ".to_string(),
        font: FontChoice::Path {
            path: PathBuf::from("fonts/lato/Lato-Bold.ttf"),
        },
        format: OutputFormat::Step,
        depth: Some(30.0),
        ..RunParams::default()
    };
    let json = save_job(&params).unwrap();
    assert!(json.contains("\"format\": \"dualtext-job\""));
    assert_eq!(load_job(&json).unwrap(), params);
}

#[test]
fn missing_params_take_defaults() {
    let json = r#"{"format": "dualtext-job", "version": 1, "params": {"text1": "AB"}}"#;
    let params = load_job(json).unwrap();
    assert_eq!(params.text1, "AB");
    assert_eq!(params.text2, "2025!");
    assert_eq!(params.font_size, 20.0);
    assert_eq!(params.format, OutputFormat::Stl);
    assert_eq!(params.font, FontChoice::default());
}

#[test]
fn family_font_choice_parses() {
    let json = r#"{"format": "dualtext-job", "version": 1,
        "params": {"font": {"family": "roboto", "style": "Black"}}}"#;
    let params = load_job(json).unwrap();
    assert_eq!(
        params.font,
        FontChoice::Family {
            family: "roboto".to_string(),
            style: Some("Black".to_string())
        }
    );
}

#[test]
fn rejects_unknown_format() {
    let json = r#"{"format": "cad-project", "version": 1, "params": {}}"#;
    assert!(matches!(load_job(json), Err(LoadError::UnknownFormat(f)) if f == "cad-project"));
}

#[test]
fn rejects_future_and_past_versions() {
    let json = r#"{"format": "dualtext-job", "version": 7, "params": {}}"#;
    assert!(matches!(
        load_job(json),
        Err(LoadError::FutureVersion {
            file_version: 7,
            supported_version: FORMAT_VERSION
        })
    ));

    let json = r#"{"format": "dualtext-job", "version": 0, "params": {}}"#;
    assert!(matches!(
        load_job(json),
        Err(LoadError::MigrationFailed { from: 0, to: 1 })
    ));
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(load_job("{not json"), Err(LoadError::ParseError(_))));
    let json = r#"{"format": "dualtext-job", "version": 1, "params": {"format": "obj"}}"#;
    assert!(matches!(load_job(json), Err(LoadError::ParseError(_))));
}

#[test]
fn load_job_file_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_job_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));

    let path = dir.path().join("job.json");
    fs::write(&path, save_job(&RunParams::default()).unwrap()).unwrap();
    assert_eq!(load_job_file(&path).unwrap(), RunParams::default());
}

// ── Font library ───────────────────────────────────────────────────────────

fn library() -> (tempfile::TempDir, FontLibrary) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for (family, files) in [
        ("roboto", &["Roboto-Regular.ttf", "Roboto-Bold.ttf", "LICENSE.txt"][..]),
        ("lato", &["Lato-Regular.ttf"][..]),
        ("pacifico", &["pacifico.ttf"][..]),
        ("empty", &["README.md"][..]),
    ] {
        fs::create_dir(root.join(family)).unwrap();
        for f in files {
            fs::write(root.join(family).join(f), b"").unwrap();
        }
    }
    fs::write(root.join("stray.ttf"), b"").unwrap();
    let lib = FontLibrary::new(root);
    (dir, lib)
}

#[test]
fn families_list_default_first_then_sorted() {
    let (_dir, lib) = library();
    assert_eq!(
        lib.families().unwrap(),
        vec!["lato", "empty", "pacifico", "roboto"]
    );
}

#[test]
fn resolve_prefixed_family() {
    let (_dir, lib) = library();
    let font = lib.resolve("roboto", Some("Bold")).unwrap();
    assert_eq!(font.path, lib.root().join("roboto").join("Roboto-Bold.ttf"));
    assert_eq!(font.style, "Bold");

    let first = lib.resolve("roboto", None).unwrap();
    assert_eq!(first.style, "Bold");
}

#[test]
fn resolve_bare_family() {
    let (_dir, lib) = library();
    let font = lib.resolve("pacifico", None).unwrap();
    assert_eq!(font.path, lib.root().join("pacifico").join("pacifico.ttf"));
}

#[test]
fn resolve_errors() {
    let (_dir, lib) = library();
    assert!(matches!(
        lib.resolve("comic", None),
        Err(FontError::NoSuchFamily(_))
    ));
    assert!(matches!(
        lib.resolve("roboto", Some("Thin")),
        Err(FontError::NoSuchStyle { .. })
    ));
    assert!(matches!(
        lib.resolve("empty", None),
        Err(FontError::EmptyFamily(_))
    ));
}

#[test]
fn run_params_resolve_through_library() {
    let (_dir, lib) = library();
    let params = RunParams::default();
    let font = params.resolve_font(Some(&lib)).unwrap();
    assert_eq!(font.family, "lato");
    assert_eq!(font.style, "Regular");
    assert_eq!(params.download_name(&font), "TextTango_HAPPY_2025!_lato-Regular.stl");

    let illusion = params.to_illusion_params(&font);
    assert_eq!(illusion.font_path, font.path);
    assert_eq!(illusion.export_name, "file");
}
