//! Source file collection and include/exclude filtering.

use anyhow::Context;
use glob::Pattern;
use std::path::{Path, PathBuf};
use wc_hmr_engine::config::normalize_path;
use wc_hmr_engine::{should_transform, HmrConfig};

const EXTENSIONS: &[&str] = &["js", "mjs"];

/// Collect all JavaScript modules from the given paths (files or
/// directories). Returned paths are absolute.
pub fn collect_js_files(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir()?;
    let mut files = Vec::new();

    for path_str in paths {
        let path = normalize_path(&cwd.join(path_str));
        if path.is_file() {
            if is_js_module(&path) {
                files.push(path);
            }
        } else if path.is_dir() {
            collect_js_in_dir(&path, &mut files)?;
        } else {
            anyhow::bail!("File not found: {}", path_str);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Recursively collect JavaScript modules in a directory.
fn collect_js_in_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        // Skip hidden dirs and node_modules
        if path.is_dir() {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || name_str == "node_modules" {
                continue;
            }
            collect_js_in_dir(&path, files)?;
        } else if is_js_module(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_js_module(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

// ── Include / exclude ──────────────────────────────────────────────────────

/// Compiled include/exclude globs of a config.
///
/// No include globs means everything is included. Exclude wins over
/// include.
#[derive(Debug)]
pub struct FileFilter {
    root: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileFilter {
    pub fn new(config: &HmrConfig) -> anyhow::Result<Self> {
        let root = config.project_root().to_path_buf();
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    let resolved = resolve_pattern(pattern, &root);
                    Pattern::new(&resolved).with_context(|| format!("invalid glob '{}'", pattern))
                })
                .collect::<anyhow::Result<Vec<_>>>()
        };

        let include = compile(config.include())?;
        let exclude = compile(config.exclude())?;
        Ok(Self { root, include, exclude })
    }

    /// Whether `path` (absolute) should be transformed.
    pub fn matches(&self, path: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(&self.root) {
            if !should_transform(&relative.to_string_lossy()) {
                return false;
            }
        }

        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches_path(path));
        included && !self.exclude.iter().any(|p| p.matches_path(path))
    }
}

/// Relative patterns not starting with `*` are anchored at the root.
fn resolve_pattern(pattern: &str, root: &Path) -> String {
    if pattern.starts_with('*') || Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        root.join(pattern).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wc_hmr_engine::BaseClassDescriptor;

    fn filter(include: &[&str], exclude: &[&str]) -> FileFilter {
        let config = HmrConfig::new("/app", vec![BaseClassDescriptor::global("HTMLElement")])
            .unwrap()
            .with_filters(
                include.iter().map(|s| s.to_string()).collect(),
                exclude.iter().map(|s| s.to_string()).collect(),
            );
        FileFilter::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_pattern() {
        let root = Path::new("/app");
        assert_eq!(resolve_pattern("src/**/*.js", root), "/app/src/**/*.js");
        assert_eq!(resolve_pattern("./src/*.js", root), "/app/src/*.js");
        assert_eq!(resolve_pattern("**/*.js", root), "**/*.js");
        assert_eq!(resolve_pattern("/other/*.js", root), "/other/*.js");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = filter(&[], &[]);
        assert!(filter.matches(Path::new("/app/src/a.js")));
        assert!(filter.matches(Path::new("/elsewhere/a.js")));
    }

    #[test]
    fn test_include_and_exclude() {
        let filter = filter(&["src/**/*.js"], &["**/*.test.js"]);
        assert!(filter.matches(Path::new("/app/src/elements/a.js")));
        assert!(!filter.matches(Path::new("/app/lib/a.js")));
        assert!(!filter.matches(Path::new("/app/src/a.test.js")));
    }

    #[test]
    fn test_virtual_namespace_is_skipped() {
        let filter = filter(&[], &[]);
        assert!(!filter.matches(Path::new("/app/__web-dev-server__/wc-hmr/runtime.js")));
    }

    #[test]
    fn test_collect_skips_hidden_and_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for file in ["a.js", "b.mjs", "c.ts", "src/d.js", ".cache/e.js", "node_modules/f.js"] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "").unwrap();
        }

        let files = collect_js_files(&[root.display().to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.js", "b.mjs", "src/d.js"]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.js");
        assert!(collect_js_files(&[missing.display().to_string()]).is_err());
    }
}
