//! Base class resolution
//!
//! Works out which local names in a module denote a configured base class:
//! globals by their own name, imported classes by the local binding of a
//! matching import specifier. Every descriptor whose origin an import
//! refers to contributes its patch, whichever names the import binds.

use crate::config::{normalize_path, BaseClassDescriptor, HmrConfig, Origin};
use crate::parser::ast::{ImportSpecifier, Module};
use crate::parser::{Interner, Symbol};
use rustc_hash::FxHashSet;
use std::path::Path;

/// Base class names visible in one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBaseClasses {
    /// Local names that denote a base class
    pub names: FxHashSet<Symbol>,

    /// Indices of descriptors whose patch must be imported, deduplicated,
    /// in first-seen order
    pub patches: Vec<usize>,
}

impl ResolvedBaseClasses {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.names.contains(&name)
    }

    fn add_patch(&mut self, index: usize) {
        if !self.patches.contains(&index) {
            self.patches.push(index);
        }
    }
}

/// Resolve the base class names of `module`.
///
/// `module_path` must be absolute and normalized; relative import
/// specifiers are resolved against its directory.
pub fn resolve_base_classes(
    module: &Module,
    interner: &Interner,
    config: &HmrConfig,
    module_path: &Path,
) -> ResolvedBaseClasses {
    let mut resolved = ResolvedBaseClasses::default();

    // A global that never occurs in the module cannot be referenced by it
    for descriptor in config.descriptors().iter().filter(|d| d.origin.is_none()) {
        if let Some(symbol) = interner.get(&descriptor.name) {
            resolved.names.insert(symbol);
        }
    }

    for import in module.imports() {
        let specifier = interner.resolve(import.source.value);
        let matches = descriptors_for_import(config, specifier, module_path);
        if matches.is_empty() {
            continue;
        }

        tracing::trace!(
            specifier,
            descriptors = ?matches,
            "import matches base class descriptors"
        );

        for &index in &matches {
            if config.descriptors()[index].patch.is_some() {
                resolved.add_patch(index);
            }
        }

        for spec in &import.specifiers {
            let (imported, local) = match spec {
                ImportSpecifier::Default(local) => ("default", local),
                ImportSpecifier::Named { name, alias } => {
                    let Some(local) = alias.as_ref().or(name.as_identifier()) else {
                        continue;
                    };
                    (interner.resolve(name.symbol()), local)
                }
                ImportSpecifier::Namespace(_) => continue,
            };

            for &index in &matches {
                let descriptor = &config.descriptors()[index];
                if descriptor.name != imported {
                    continue;
                }

                tracing::trace!(
                    imported,
                    local = interner.resolve(local.name),
                    index,
                    "imported base class"
                );
                resolved.names.insert(local.name);
            }
        }
    }

    if !resolved.is_empty() {
        let mut names: Vec<&str> = resolved.names.iter().map(|&name| interner.resolve(name)).collect();
        names.sort_unstable();
        tracing::debug!(
            module = %module_path.display(),
            ?names,
            patches = ?resolved.patches,
            "resolved base classes"
        );
    }

    resolved
}

/// Indices of the descriptors whose origin `specifier` refers to.
///
/// Relative (`./`, `../`) specifiers resolve against the module's directory
/// and absolute ones against the project root; both then compare as file
/// paths. Bare specifiers compare as strings, also accepting `<origin>.js`
/// for an origin without an extension.
pub fn descriptors_for_import(config: &HmrConfig, specifier: &str, module_path: &Path) -> Vec<usize> {
    let target = if specifier.starts_with("./") || specifier.starts_with("../") {
        let dir = module_path.parent().unwrap_or_else(|| Path::new("/"));
        Some(normalize_path(&dir.join(specifier)))
    } else if let Some(rooted) = specifier.strip_prefix('/') {
        Some(normalize_path(&config.project_root().join(rooted)))
    } else {
        None
    };

    config
        .descriptors()
        .iter()
        .enumerate()
        .filter(|(_, descriptor)| origin_matches(descriptor, specifier, target.as_deref()))
        .map(|(index, _)| index)
        .collect()
}

fn origin_matches(descriptor: &BaseClassDescriptor, specifier: &str, target: Option<&Path>) -> bool {
    match (&descriptor.origin, target) {
        (Some(Origin::File(path)), Some(target)) => path == target,
        (Some(Origin::Module(origin)), None) => {
            origin == specifier
                || (Path::new(origin).extension().is_none()
                    && specifier.strip_suffix(".js") == Some(origin.as_str()))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    const MODULE_PATH: &str = "/root/projects/my-project/src/foo.js";

    fn config(descriptors: Vec<BaseClassDescriptor>) -> HmrConfig {
        HmrConfig::new("/root/projects/my-project/", descriptors).unwrap()
    }

    fn resolve(source: &str, config: &HmrConfig) -> (Vec<String>, Vec<usize>) {
        let (module, interner) = Parser::new(source).unwrap().parse().unwrap();
        let resolved = resolve_base_classes(&module, &interner, config, Path::new(MODULE_PATH));
        let mut names: Vec<String> = resolved
            .names
            .iter()
            .map(|&name| interner.resolve(name).to_string())
            .collect();
        names.sort();
        (names, resolved.patches)
    }

    #[test]
    fn test_global_needs_a_reference() {
        let config = config(vec![BaseClassDescriptor::global("HTMLElement")]);
        assert_eq!(resolve("class A extends HTMLElement {}", &config).0, vec!["HTMLElement"]);
        assert!(resolve("class A {}", &config).0.is_empty());
    }

    #[test]
    fn test_named_default_and_renamed_imports() {
        let config = config(vec![
            BaseClassDescriptor::from_module("default", "my-package"),
            BaseClassDescriptor::from_module("A", "my-package"),
            BaseClassDescriptor::from_module("B", "my-package"),
        ]);
        let (names, _) = resolve("import Foo, { A, B as Baz, C } from 'my-package';", &config);
        assert_eq!(names, vec!["A", "Baz", "Foo"]);
    }

    #[test]
    fn test_string_import_names() {
        let config = config(vec![BaseClassDescriptor::from_module("my-base", "my-package")]);
        let (names, _) = resolve("import { 'my-base' as Base } from 'my-package';", &config);
        assert_eq!(names, vec!["Base"]);
    }

    #[test]
    fn test_namespace_import_is_ignored() {
        let config = config(vec![BaseClassDescriptor::from_module("A", "my-package")]);
        assert!(resolve("import * as A from 'my-package';", &config).0.is_empty());
    }

    #[test]
    fn test_js_extension_fallback() {
        let config = config(vec![
            BaseClassDescriptor::from_module("A", "my-package/base"),
            BaseClassDescriptor::from_module("B", "my-package/other.mjs"),
        ]);
        assert_eq!(resolve("import { A } from 'my-package/base.js';", &config).0, vec!["A"]);
        assert!(resolve("import { B } from 'my-package/other.mjs.js';", &config).0.is_empty());
    }

    #[test]
    fn test_relative_and_rooted_specifiers() {
        let config = config(vec![BaseClassDescriptor::from_file("Base", "./src/my-base-class.js")]);

        for source in [
            "import { Base } from './my-base-class.js';",
            "import { Base } from '../src/my-base-class.js';",
            "import { Base } from '/src/my-base-class.js';",
        ] {
            assert_eq!(resolve(source, &config).0, vec!["Base"], "{}", source);
        }
        assert!(resolve("import { Base } from 'src/my-base-class.js';", &config).0.is_empty());
    }

    #[test]
    fn test_bare_origin_never_matches_relative_import() {
        let config = config(vec![BaseClassDescriptor::from_module("A", "a.js")]);
        assert!(resolve("import { A } from './a.js';", &config).0.is_empty());
    }

    #[test]
    fn test_patches_are_deduplicated_in_order() {
        let config = config(vec![
            BaseClassDescriptor::global("HTMLElement"),
            BaseClassDescriptor::from_module("B", "pkg").with_patch("// b"),
            BaseClassDescriptor::from_module("A", "pkg").with_patch("// a"),
            BaseClassDescriptor::from_module("C", "pkg"),
        ]);
        let (names, patches) = resolve(
            "import { A, C } from 'pkg';\nimport { A as A2, B } from 'pkg';",
            &config,
        );
        assert_eq!(names, vec!["A", "A2", "B", "C"]);
        assert_eq!(patches, vec![1, 2]);
    }

    #[test]
    fn test_patch_follows_the_import_not_the_binding() {
        let config = config(vec![
            BaseClassDescriptor::global("HTMLElement"),
            BaseClassDescriptor::lit_element(),
        ]);
        let (names, patches) = resolve(
            "import { html } from 'lit-element';\nclass A extends HTMLElement {}",
            &config,
        );
        assert_eq!(names, vec!["HTMLElement"]);
        assert_eq!(patches, vec![1]);
    }

    #[test]
    fn test_descriptors_for_import() {
        let config = config(vec![
            BaseClassDescriptor::from_module("A", "pkg"),
            BaseClassDescriptor::from_module("B", "other"),
            BaseClassDescriptor::from_module("C", "pkg"),
        ]);
        assert_eq!(descriptors_for_import(&config, "pkg", Path::new(MODULE_PATH)), vec![0, 2]);
        assert!(descriptors_for_import(&config, "./pkg", Path::new(MODULE_PATH)).is_empty());
    }
}
