//! Built-in base class patches
//!
//! A patch is module source served at `/__web-dev-server__/wc-hmr/patch/<n>.js`
//! and imported for its side effects before the runtime. It installs the
//! `hotReplaceCallback` hooks a base class needs to update live instances.

/// Hot-replace callbacks for `LitElement` (from `lit-element`).
///
/// The static callback re-finalizes both classes and copies members onto
/// the running class; the instance callback re-adopts styles and requests
/// an update.
pub const LIT_ELEMENT_PATCH: &str = r#"// @ts-nocheck
import { LitElement } from 'lit-element';
import { updateClassMembers } from '/__web-dev-server__/wc-hmr/runtime.js';

// static callback
LitElement.hotReplaceCallback = function hotReplaceCallback(newClass) {
  newClass.finalize();
  updateClassMembers(this, newClass);
  this.finalize();
};

// instance callback
LitElement.prototype.hotReplaceCallback = function hotReplaceCallback() {
  this.constructor._getUniqueStyles();
  if (window.ShadowRoot && this.renderRoot instanceof window.ShadowRoot) {
    this.adoptStyles();
  }
  this.requestUpdate();
};
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_modules::RUNTIME_PATH;

    #[test]
    fn test_lit_element_patch_imports_runtime() {
        assert!(LIT_ELEMENT_PATCH.contains(&format!("from '{}'", RUNTIME_PATH)));
        assert!(LIT_ELEMENT_PATCH.contains("import { LitElement } from 'lit-element';"));
    }

    #[test]
    fn test_lit_element_patch_parses() {
        let parser = crate::parser::Parser::new(LIT_ELEMENT_PATCH).unwrap();
        let (module, _) = parser.parse().unwrap();
        assert_eq!(module.imports().count(), 2);
    }
}
