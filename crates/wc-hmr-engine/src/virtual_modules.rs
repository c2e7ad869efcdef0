//! Virtual module namespace
//!
//! The transform emits imports of modules that do not exist on disk: the
//! hot-reload runtime and one module per base class patch. A dev server
//! hosting the transform serves them from this namespace, leaves their
//! specifiers alone when rewriting imports, and never transforms them.

use crate::config::HmrConfig;
use crate::error::ServeError;

/// Local name the runtime namespace is imported under
pub const NAMESPACE: &str = "__$wc_hmr$__";

/// Every virtual module path starts with this prefix
pub const MODULE_PREFIX: &str = "/__web-dev-server__/wc-hmr/";

/// Path of the runtime module
pub const RUNTIME_PATH: &str = "/__web-dev-server__/wc-hmr/runtime.js";

/// Patch modules live at `PATCH_PREFIX<index>.js`
pub const PATCH_PREFIX: &str = "/__web-dev-server__/wc-hmr/patch/";

/// Dev server internals (the runtime included) start with this segment
const DEV_SERVER_SEGMENT: &str = "__web-dev-server__";

/// Path of the patch module for descriptor `index`.
pub fn patch_module_path(index: usize) -> String {
    format!("{}{}.js", PATCH_PREFIX, index)
}

/// Whether an import specifier points into the virtual namespace and must be
/// passed through unresolved.
pub fn is_virtual_module(specifier: &str) -> bool {
    specifier.starts_with(MODULE_PREFIX)
}

/// Whether a served path is a candidate for transformation.
///
/// Virtual modules and other dev server internals are skipped, with or
/// without the leading slash.
pub fn should_transform(path: &str) -> bool {
    !path.trim_start_matches('/').starts_with(DEV_SERVER_SEGMENT)
}

/// A request for a virtual module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualModule<'a> {
    /// The runtime; its source is provided by the host
    Runtime,
    /// A base class patch
    Patch {
        /// Descriptor index
        index: usize,
        /// Patch source to serve
        source: &'a str,
    },
}

impl<'a> VirtualModule<'a> {
    /// Resolve a request path against the configured patches.
    ///
    /// Returns `Ok(None)` for paths outside the namespace (and for unknown
    /// paths inside it that are neither the runtime nor a patch).
    pub fn resolve(request_path: &str, config: &'a HmrConfig) -> Result<Option<Self>, ServeError> {
        if request_path == RUNTIME_PATH {
            return Ok(Some(VirtualModule::Runtime));
        }

        let Some(rest) = request_path.strip_prefix(PATCH_PREFIX) else {
            return Ok(None);
        };

        let index_text = rest.strip_suffix(".js").unwrap_or(rest);
        let not_found = || ServeError::PatchNotFound {
            index: index_text.to_string(),
            request_path: request_path.to_string(),
        };

        let index: usize = index_text.parse().map_err(|_| not_found())?;
        let source = config
            .descriptors()
            .get(index)
            .and_then(|descriptor| descriptor.patch.as_deref())
            .ok_or_else(not_found)?;

        Ok(Some(VirtualModule::Patch { index, source }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseClassDescriptor;

    fn config() -> HmrConfig {
        HmrConfig::new(
            "/project",
            vec![
                BaseClassDescriptor::global("HTMLElement"),
                BaseClassDescriptor::lit_element(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_paths() {
        assert_eq!(patch_module_path(2), "/__web-dev-server__/wc-hmr/patch/2.js");
        assert!(RUNTIME_PATH.starts_with(MODULE_PREFIX));
        assert!(PATCH_PREFIX.starts_with(MODULE_PREFIX));
    }

    #[test]
    fn test_is_virtual_module() {
        assert!(is_virtual_module(RUNTIME_PATH));
        assert!(is_virtual_module(&patch_module_path(0)));
        assert!(!is_virtual_module("lit-element"));
        assert!(!is_virtual_module("./__web-dev-server__/wc-hmr/runtime.js"));
    }

    #[test]
    fn test_should_transform() {
        assert!(should_transform("/src/my-element.js"));
        assert!(!should_transform("/__web-dev-server__/wc-hmr/runtime.js"));
        assert!(!should_transform("__web-dev-server__/other.js"));
    }

    #[test]
    fn test_resolve_runtime_and_patch() {
        let config = config();
        assert_eq!(VirtualModule::resolve(RUNTIME_PATH, &config), Ok(Some(VirtualModule::Runtime)));

        match VirtualModule::resolve(&patch_module_path(1), &config) {
            Ok(Some(VirtualModule::Patch { index, source })) => {
                assert_eq!(index, 1);
                assert_eq!(source, crate::patches::LIT_ELEMENT_PATCH);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_resolve_outside_namespace() {
        assert_eq!(VirtualModule::resolve("/src/app.js", &config()), Ok(None));
    }

    #[test]
    fn test_resolve_missing_patch() {
        let config = config();
        for index in ["0", "7", "abc"] {
            let path = format!("{}{}.js", PATCH_PREFIX, index);
            let err = VirtualModule::resolve(&path, &config).unwrap_err();
            assert_eq!(
                err,
                ServeError::PatchNotFound {
                    index: index.to_string(),
                    request_path: path.clone(),
                }
            );
        }
    }
}
