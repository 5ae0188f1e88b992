use std::fs;

use cssrebase_core::cli_ops::{ensure_output_dir, load_unit, validate_css_path, write_outcome, CLIError};
use cssrebase_core::{process, MapPayload, Options};
use sourcemap::SourceMapBuilder;
use tempfile::tempdir;

fn blanket_map_json(source: &str) -> String {
    let mut builder = SourceMapBuilder::new(Some("bundle.css"));
    builder.add(0, 0, 0, 0, Some(source), None, false);
    let map = builder.into_sourcemap();
    let mut buf = Vec::new();
    map.to_writer(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn validate_rejects_wrong_extension_and_missing_files() {
    let dir = tempdir().unwrap();
    let txt = dir.path().join("style.txt");
    fs::write(&txt, "x").unwrap();
    assert!(matches!(validate_css_path(&txt), Err(CLIError::InvalidExtension(_))));
    assert!(matches!(
        validate_css_path(dir.path().join("gone.css")),
        Err(CLIError::NotFound(_))
    ));
}

#[test]
fn load_discovers_sibling_map() {
    let dir = tempdir().unwrap();
    let css = dir.path().join("bundle.css");
    fs::write(&css, ".a { color: red; }\n").unwrap();
    fs::write(dir.path().join("bundle.css.map"), blanket_map_json("main.scss")).unwrap();

    let unit = load_unit(&css, None).unwrap();
    assert!(matches!(unit.source_map, Some(MapPayload::Json(_))));
    assert_eq!(unit.base, fs::canonicalize(dir.path()).unwrap());
}

#[test]
fn load_follows_local_annotation() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("maps")).unwrap();
    let css = dir.path().join("bundle.css");
    fs::write(
        &css,
        ".a { color: red; }\n/*# sourceMappingURL=maps/b.map */\n",
    )
    .unwrap();
    fs::write(dir.path().join("maps/b.map"), blanket_map_json("main.scss")).unwrap();

    let unit = load_unit(&css, None).unwrap();
    assert!(unit.source_map.is_some());
    // sources resolve against the map file's directory
    assert_eq!(unit.base, fs::canonicalize(dir.path()).unwrap().join("maps"));
}

#[test]
fn load_without_any_map_leaves_unit_mapless() {
    let dir = tempdir().unwrap();
    let css = dir.path().join("bundle.css");
    fs::write(&css, ".a { color: red; }\n").unwrap();
    let unit = load_unit(&css, None).unwrap();
    assert!(unit.source_map.is_none());
}

#[test]
fn ensure_output_dir_rejects_files() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("occupied");
    fs::write(&file, "x").unwrap();
    assert!(ensure_output_dir(&file).is_err());
    assert!(ensure_output_dir(dir.path().join("fresh/nested")).is_ok());
}

#[test]
fn write_outcome_emits_css_map_and_annotation() {
    let dir = tempdir().unwrap();
    let proj = dir.path();
    fs::create_dir_all(proj.join("src")).unwrap();
    fs::create_dir_all(proj.join("dist")).unwrap();
    fs::write(proj.join("src/a.png"), b"png").unwrap();
    let css_path = proj.join("dist/bundle.css");
    fs::write(&css_path, ".logo {\n  background: url('a.png');\n}\n").unwrap();
    fs::write(proj.join("dist/bundle.css.map"), blanket_map_json("../src/main.scss")).unwrap();

    let unit = load_unit(&css_path, None).unwrap();
    let outcome = process(unit, &Options::default()).unwrap();

    let out_dir = proj.join("out");
    let written = write_outcome(&outcome, &out_dir).unwrap();
    assert_eq!(written, out_dir.join("bundle.css"));

    let css_out = fs::read_to_string(&written).unwrap();
    assert!(css_out.contains("url('../src/a.png')"), "{css_out}");
    assert!(css_out.ends_with("/*# sourceMappingURL=bundle.css.map */\n"), "{css_out}");
    assert!(out_dir.join("bundle.css.map").is_file());
}
