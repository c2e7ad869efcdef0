//! Integration tests for the wc-hmr binary.
//!
//! Each test builds a small project in a temp directory and runs the
//! binary inside it.

use std::path::Path;
use std::process::{Command, Output};

const ELEMENT: &str = "import { LitElement } from 'lit-element';\n\nclass MyElement extends LitElement {}\n";
const PLAIN: &str = "export const add = (a, b) => a + b;\n";

fn wc_hmr(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wc-hmr"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wc-hmr")
}

fn write(dir: &Path, file: &str, content: &str) {
    let path = dir.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// transform
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_transform_single_file_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "my-element.js", ELEMENT);

    let output = wc_hmr(dir.path(), &["transform", "my-element.js"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let code = stdout(&output);
    assert!(code.starts_with("import '/__web-dev-server__/wc-hmr/patch/0.js';\n"));
    assert!(code.contains("import * as __$wc_hmr$__ from '/__web-dev-server__/wc-hmr/runtime.js';"));
    assert!(code.ends_with(
        "class MyElement extends LitElement {}\n\n__$wc_hmr$__.register(import.meta.url, MyElement);\n"
    ));
    assert!(stderr(&output).contains("Instrumented 1 of 1 file(s), 1 class(es) registered."));
}

#[test]
fn test_transform_untouched_file_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "add.js", PLAIN);

    let output = wc_hmr(dir.path(), &["transform", "add.js"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), PLAIN);
}

#[test]
fn test_transform_out_dir_mirrors_tree() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/elements/my-element.js", ELEMENT);
    write(dir.path(), "src/add.mjs", PLAIN);
    write(dir.path(), "node_modules/lib/index.js", ELEMENT);

    let output = wc_hmr(dir.path(), &["transform", "src", "-o", "dist"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let element = std::fs::read_to_string(dir.path().join("dist/src/elements/my-element.js")).unwrap();
    assert!(element.contains("__$wc_hmr$__.register(import.meta.url, MyElement);"));
    let add = std::fs::read_to_string(dir.path().join("dist/src/add.mjs")).unwrap();
    assert_eq!(add, PLAIN);
    assert!(!dir.path().join("dist/node_modules").exists());
}

#[test]
fn test_transform_check_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.js", ELEMENT);
    write(dir.path(), "b.js", PLAIN);

    let output = wc_hmr(dir.path(), &["transform", "--check", "-o", "dist"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(!dir.path().join("dist").exists());

    let report = stderr(&output);
    assert!(report.contains("would instrument a.js (MyElement)"));
    assert!(!report.contains("b.js"));
    assert!(report.contains("Would instrument 1 of 2 file(s)"));
}

#[test]
fn test_transform_syntax_error_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.js", "const a = ;\n");
    write(dir.path(), "ok.js", ELEMENT);

    let output = wc_hmr(dir.path(), &["transform", "-o", "dist"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stderr(&output);
    assert!(report.contains("error"));
    assert!(report.contains("broken.js:1:11"));
    assert!(report.contains("1 file(s) failed to parse."));
    assert!(dir.path().join("dist/ok.js").exists());
    assert!(!dir.path().join("dist/broken.js").exists());
}

#[test]
fn test_transform_json_format() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.js", ELEMENT);
    write(dir.path(), "b.js", "class {");

    let output = wc_hmr(dir.path(), &["transform", "--format", "json", "--check"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let files = report.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file"], "a.js");
    assert_eq!(files[0]["changed"], true);
    assert_eq!(files[0]["registered"], serde_json::json!(["MyElement"]));
    assert_eq!(files[0]["patches"], serde_json::json!([0]));
    assert!(files[0].get("code").is_none());
    assert_eq!(files[1]["file"], "b.js");
    assert_eq!(files[1]["error"]["line"], 1);
}

#[test]
fn test_transform_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "wc-hmr.toml",
        r#"
exclude = ["src/vendor/**"]

[[baseClasses]]
name = "HTMLElement"
"#,
    );
    write(dir.path(), "src/a.js", "class A extends HTMLElement {}\n");
    write(dir.path(), "src/vendor/b.js", "class B extends HTMLElement {}\n");
    write(dir.path(), "src/c.js", ELEMENT);

    let output = wc_hmr(dir.path(), &["transform", "-o", "dist"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let a = std::fs::read_to_string(dir.path().join("dist/src/a.js")).unwrap();
    assert!(a.starts_with("import * as __$wc_hmr$__"));
    assert!(a.ends_with("__$wc_hmr$__.register(import.meta.url, A);\n"));
    let c = std::fs::read_to_string(dir.path().join("dist/src/c.js")).unwrap();
    assert_eq!(c, ELEMENT);
    assert!(!dir.path().join("dist/src/vendor").exists());
}

#[test]
fn test_transform_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = wc_hmr(dir.path(), &["transform", "nope.js"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("File not found: nope.js"));
}

// ────────────────────────────────────────────────────────────────────────────
// virtual
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_virtual_prints_patch() {
    let dir = tempfile::tempdir().unwrap();
    let output = wc_hmr(dir.path(), &["virtual", "/__web-dev-server__/wc-hmr/patch/0.js"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("updateClassMembers"));
}

#[test]
fn test_virtual_runtime_is_host_provided() {
    let dir = tempfile::tempdir().unwrap();
    let output = wc_hmr(dir.path(), &["virtual", "/__web-dev-server__/wc-hmr/runtime.js"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("provided by the host"));
}

#[test]
fn test_virtual_unknown_patch() {
    let dir = tempfile::tempdir().unwrap();
    let output = wc_hmr(dir.path(), &["virtual", "/__web-dev-server__/wc-hmr/patch/3.js"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Can't find a patch with index 3"));
}

#[test]
fn test_virtual_outside_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let output = wc_hmr(dir.path(), &["virtual", "/src/app.js"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is not a wc-hmr virtual module"));
}

// ────────────────────────────────────────────────────────────────────────────
// config
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_lists_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "hmr.json",
        r#"{
  "baseClasses": [
    { "name": "HTMLElement" },
    { "name": "SharedElement", "import": "./src/shared.js" }
  ],
  "presets": ["lit-element"]
}"#,
    );

    let output = wc_hmr(dir.path(), &["config", "-c", "hmr.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let table = stdout(&output);
    let lines: Vec<&str> = table.lines().filter(|line| line.starts_with(char::is_numeric)).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("HTMLElement") && lines[0].contains("(global)"));
    assert!(lines[1].contains("SharedElement") && lines[1].contains("src/shared.js"));
    assert!(lines[2].contains("LitElement") && lines[2].contains("lit-element") && lines[2].contains("yes"));
    assert!(table.contains("Config is valid."));
}

#[test]
fn test_config_reports_invalid_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "wc-hmr.toml", "[[baseClasses]]\norigin = \"lit-element\"\n");

    let output = wc_hmr(dir.path(), &["config"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid config"));
}
