//! `wc-hmr transform`: instrument modules on disk.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Context;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use serde_json::json;
use termcolor::ColorChoice;
use wc_hmr_engine::{SyntaxError, TransformOutput, Transformer};

use super::files::{collect_js_files, FileFilter};
use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

pub struct TransformArgs {
    pub paths: Vec<String>,
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub check: bool,
    pub format: String,
    pub color: Option<String>,
}

struct FileResult {
    path: PathBuf,
    source: String,
    outcome: Result<TransformOutput, SyntaxError>,
}

pub fn execute(args: TransformArgs) -> anyhow::Result<()> {
    let choice = resolve_color_choice(args.color.as_deref());
    let json = args.format == "json";

    // 1. Load config
    let config = load_config(args.config.as_deref(), args.root.as_deref())?;
    let root = config.project_root().to_path_buf();
    let filter = FileFilter::new(&config)?;

    // 2. Collect source files
    let source_files: Vec<PathBuf> = collect_js_files(&args.paths)?
        .into_iter()
        .filter(|path| filter.matches(path))
        .collect();
    if source_files.is_empty() {
        eprintln!("No .js files found.");
        std::process::exit(1);
    }

    // 3. Transform each file
    let transformer = Transformer::new(config);
    let mut results = Vec::with_capacity(source_files.len());
    for path in source_files {
        let source = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
        let outcome = transformer.transform_module(&source, &path);
        results.push(FileResult { path, source, outcome });
    }

    // 4. Write results
    if !args.check {
        match &args.out_dir {
            Some(out_dir) => write_out_dir(&results, &root, out_dir)?,
            None if !json => print_code(&results, &root, choice),
            None => {}
        }
    }

    // 5. Report
    if json {
        emit_json(&results, &root, args.out_dir.is_none() && !args.check);
    } else {
        emit_pretty(&results, choice);
        print_summary(&results, &root, args.check, choice);
    }

    // 6. Exit code
    if results.iter().any(|result| result.outcome.is_err()) {
        std::process::exit(1);
    }
    Ok(())
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Mirror every transformed file under `out_dir`.
///
/// Files outside the root land at `out_dir/<file name>`.
fn write_out_dir(results: &[FileResult], root: &Path, out_dir: &Path) -> anyhow::Result<()> {
    for result in results {
        let Ok(output) = &result.outcome else { continue };

        let target = match result.path.strip_prefix(root) {
            Ok(relative) => out_dir.join(relative),
            Err(_) => out_dir.join(result.path.file_name().unwrap_or(result.path.as_os_str())),
        };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(&target, &output.code).with_context(|| format!("cannot write {}", target.display()))?;
    }
    Ok(())
}

fn print_code(results: &[FileResult], root: &Path, choice: ColorChoice) {
    let mut out = StyledOutput::stdout(choice);
    let headers = results.len() > 1;

    for result in results {
        let Ok(output) = &result.outcome else { continue };
        if headers {
            out.dim(&format!("// ==> {} <==", relative(&result.path, root).display()));
            out.newline();
        }
        out.plain(&output.code);
        if headers && !output.code.ends_with('\n') {
            out.newline();
        }
    }
    out.flush();
}

// ── Pretty output (codespan bridge) ────────────────────────────────────────

fn emit_pretty(results: &[FileResult], choice: ColorChoice) {
    let mut out = StyledOutput::stderr(choice);
    let config = term::Config::default();

    for result in results {
        let Err(error) = &result.outcome else { continue };

        let mut files = SimpleFiles::new();
        let file_id = files.add(result.path.display().to_string(), result.source.clone());

        let mut diagnostic = Diagnostic::error()
            .with_message(error.message.clone())
            .with_labels(vec![Label::primary(file_id, label_range(&result.source, error.offset))]);
        if let Some(hint) = &error.hint {
            diagnostic = diagnostic.with_notes(vec![format!("help: {}", hint)]);
        }

        let _ = term::emit(out.stream(), &config, &files, &diagnostic);
    }
}

/// One character at `offset`, clamped to the source.
fn label_range(source: &str, offset: usize) -> Range<usize> {
    let mut start = offset.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let width = source[start..].chars().next().map_or(0, char::len_utf8);
    start..start + width
}

fn print_summary(results: &[FileResult], root: &Path, check: bool, choice: ColorChoice) {
    let mut out = StyledOutput::stderr(choice);

    let changed: Vec<(&FileResult, &TransformOutput)> = results
        .iter()
        .filter_map(|result| match &result.outcome {
            Ok(output) if output.is_changed() => Some((result, output)),
            _ => None,
        })
        .collect();
    let errors = results.iter().filter(|result| result.outcome.is_err()).count();

    if check {
        for (result, output) in &changed {
            out.info("would instrument ");
            out.bold(&relative(&result.path, root).display().to_string());
            out.dim(&format!(" ({})", output.registered.join(", ")));
            out.newline();
        }
    }

    let classes: usize = changed.iter().map(|(_, output)| output.registered.len()).sum();
    out.newline();
    if errors > 0 {
        out.error(&format!("{} file(s) failed to parse. ", errors));
    }
    let verb = if check { "Would instrument" } else { "Instrumented" };
    let summary = format!(
        "{} {} of {} file(s), {} class(es) registered.",
        verb,
        changed.len(),
        results.len(),
        classes
    );
    if changed.is_empty() {
        out.warning(&summary);
    } else {
        out.success(&summary);
    }
    out.newline();
    out.flush();
}

// ── JSON output ────────────────────────────────────────────────────────────

fn emit_json(results: &[FileResult], root: &Path, include_code: bool) {
    let files: Vec<serde_json::Value> = results
        .iter()
        .map(|result| {
            let file = relative(&result.path, root).display().to_string();
            match &result.outcome {
                Ok(output) => {
                    let mut entry = json!({
                        "file": file,
                        "changed": output.is_changed(),
                        "registered": output.registered,
                        "patches": output.patches,
                    });
                    if include_code {
                        entry["code"] = json!(output.code);
                    }
                    entry
                }
                Err(error) => json!({
                    "file": file,
                    "error": {
                        "message": error.message,
                        "hint": error.hint,
                        "line": error.line,
                        "column": error.column,
                        "offset": error.offset,
                    },
                }),
            }
        })
        .collect();

    println!("{}", serde_json::Value::Array(files));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_range() {
        assert_eq!(label_range("const a = ;", 10), 10..11);
        assert_eq!(label_range("abc", 3), 3..3);
        assert_eq!(label_range("abc", 9), 3..3);
        assert_eq!(label_range("a\u{e9}b", 2), 1..3);
    }

    #[test]
    fn test_relative_falls_back_to_full_path() {
        let root = Path::new("/app");
        assert_eq!(relative(Path::new("/app/src/a.js"), root), Path::new("src/a.js"));
        assert_eq!(relative(Path::new("/lib/a.js"), root), Path::new("/lib/a.js"));
    }
}
