//! Transform configuration
//!
//! Raw [`HmrOptions`] come from JSON or TOML (a `wc-hmr.toml`, a dev server
//! plugin's options object) and are validated into an immutable
//! [`HmrConfig`]:
//!
//! ```toml
//! projectRoot = "/home/me/app"
//! presets = ["lit-element"]
//! exclude = ["**/node_modules/**"]
//!
//! [[baseClasses]]
//! name = "HTMLElement"
//!
//! [[baseClasses]]
//! name = "SharedElement"
//! import = "./src/shared-element.js"
//! ```

use crate::error::ConfigError;
use crate::patches::LIT_ELEMENT_PATCH;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Base class descriptors
// ============================================================================

/// Where a base class is exported from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Bare package specifier: `lit-element`, `@scope/pkg/base.js`
    Module(String),
    /// Absolute, normalized file path
    File(PathBuf),
}

impl Origin {
    /// Classify a configured origin. `./` and `../` origins are joined onto
    /// the project root; absolute ones are normalized.
    pub fn parse(raw: &str, project_root: &Path) -> Self {
        if raw.starts_with("./") || raw.starts_with("../") {
            Origin::File(normalize_path(&project_root.join(raw)))
        } else if Path::new(raw).is_absolute() {
            Origin::File(normalize_path(Path::new(raw)))
        } else {
            Origin::Module(raw.to_string())
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Module(specifier) => write!(f, "{}", specifier),
            Origin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A class whose subclasses get hot-reload registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseClassDescriptor {
    /// Exported name, `default` for a default export, or a global such as
    /// `HTMLElement` when there is no origin
    pub name: String,

    /// Module exporting the class; `None` for globals
    pub origin: Option<Origin>,

    /// Patch source served as a virtual module and imported before the
    /// runtime
    pub patch: Option<String>,
}

impl BaseClassDescriptor {
    /// A global base class such as `HTMLElement`.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            patch: None,
        }
    }

    /// A base class exported from a package.
    pub fn from_module(name: impl Into<String>, specifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: Some(Origin::Module(specifier.into())),
            patch: None,
        }
    }

    /// A base class exported from a file. A relative path is resolved
    /// against the project root when the config is built.
    pub fn from_file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            origin: Some(Origin::File(path.into())),
            patch: None,
        }
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = Some(patch.into());
        self
    }

    /// `LitElement` from `lit-element`, with its hot-replace patch.
    pub fn lit_element() -> Self {
        Self::from_module("LitElement", "lit-element").with_patch(LIT_ELEMENT_PATCH)
    }

    /// Look up a built-in descriptor by preset name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "lit-element" => Some(Self::lit_element()),
            _ => None,
        }
    }
}

// ============================================================================
// Raw options
// ============================================================================

/// Options as written by the user, before validation.
///
/// `descriptors` stays loosely typed so each malformed entry gets its own
/// error instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HmrOptions {
    /// Base class descriptors: `[{ name, origin?, patch? }]`
    #[serde(default, alias = "baseClasses", alias = "base-classes")]
    pub descriptors: Option<Value>,

    /// Built-in descriptors appended after `descriptors`
    #[serde(default)]
    pub presets: Vec<String>,

    /// Root for `./` origins and `/` import specifiers
    #[serde(default, alias = "rootDir", alias = "project-root")]
    pub project_root: Option<PathBuf>,

    /// Globs of files to transform
    #[serde(default)]
    pub include: Vec<String>,

    /// Globs of files to leave alone
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Config file syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

impl HmrOptions {
    /// Parse options without validating them.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let options = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(options)
    }
}

// ============================================================================
// Validated config
// ============================================================================

/// Validated, immutable transform configuration.
///
/// Descriptor order is significant: a descriptor's index names its patch
/// module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmrConfig {
    project_root: PathBuf,
    descriptors: Vec<BaseClassDescriptor>,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl HmrConfig {
    /// Build a config from typed descriptors.
    pub fn new(
        project_root: impl Into<PathBuf>,
        descriptors: Vec<BaseClassDescriptor>,
    ) -> Result<Self, ConfigError> {
        let project_root = normalize_path(&project_root.into());

        if descriptors.is_empty() {
            return Err(ConfigError::EmptyDescriptors);
        }

        let descriptors = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, mut descriptor)| {
                if descriptor.name.is_empty() {
                    return Err(ConfigError::MissingName { index });
                }
                if let Some(Origin::File(path)) = &descriptor.origin {
                    descriptor.origin = Some(Origin::File(normalize_path(&project_root.join(path))));
                }
                Ok(descriptor)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            project_root,
            descriptors,
            include: Vec::new(),
            exclude: Vec::new(),
        })
    }

    /// Validate raw options.
    pub fn from_options(options: &HmrOptions) -> Result<Self, ConfigError> {
        let project_root = options
            .project_root
            .as_deref()
            .ok_or(ConfigError::MissingProjectRoot)?;

        let mut descriptors = match &options.descriptors {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| parse_descriptor(index, entry, project_root))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ConfigError::DescriptorsNotArray),
            None if options.presets.is_empty() => return Err(ConfigError::MissingDescriptors),
            None => Vec::new(),
        };

        for preset in &options.presets {
            let descriptor = BaseClassDescriptor::preset(preset)
                .ok_or_else(|| ConfigError::UnknownPreset(preset.clone()))?;
            descriptors.push(descriptor);
        }

        let mut config = Self::new(project_root, descriptors)?;
        config.include = options.include.clone();
        config.exclude = options.exclude.clone();
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_str(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        Self::from_options(&HmrOptions::parse(content, format)?)
    }

    /// Load a `.toml` or `.json` config file.
    ///
    /// A relative `projectRoot` is resolved against the file's directory,
    /// which is also the default when the key is absent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let format =
            ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut options = HmrOptions::parse(&content, format)?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
        options.project_root = Some(match options.project_root.take() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        });

        Self::from_options(&options)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn descriptors(&self) -> &[BaseClassDescriptor] {
        &self.descriptors
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Replace the include/exclude globs.
    pub fn with_filters(mut self, include: Vec<String>, exclude: Vec<String>) -> Self {
        self.include = include;
        self.exclude = exclude;
        self
    }
}

fn parse_descriptor(index: usize, entry: &Value, project_root: &Path) -> Result<BaseClassDescriptor, ConfigError> {
    let Value::Object(fields) = entry else {
        return Err(ConfigError::DescriptorNotObject { index });
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => return Err(ConfigError::MissingName { index }),
    };

    let origin = match fields.get("origin").or_else(|| fields.get("import")) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(Origin::parse(raw, project_root)),
        Some(_) => return Err(ConfigError::InvalidOrigin { index }),
    };

    let patch = match fields.get("patch") {
        None | Some(Value::Null) => None,
        Some(Value::String(source)) => Some(source.clone()),
        Some(_) => return Err(ConfigError::InvalidPatch { index }),
    };

    Ok(BaseClassDescriptor { name, origin, patch })
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent.
///
/// Never touches the file system; `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> HmrOptions {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("./foo/../bar/./baz")), PathBuf::from("bar/baz"));
        assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_origin_classification() {
        let root = Path::new("/project");
        assert_eq!(
            Origin::parse("./src/base.js", root),
            Origin::File(PathBuf::from("/project/src/base.js"))
        );
        assert_eq!(
            Origin::parse("../shared/base.js", root),
            Origin::File(PathBuf::from("/shared/base.js"))
        );
        assert_eq!(Origin::parse("/abs/./x.js", root), Origin::File(PathBuf::from("/abs/x.js")));
        assert_eq!(Origin::parse("lit-element", root), Origin::Module("lit-element".into()));
        assert_eq!(Origin::parse("@scope/pkg", root), Origin::Module("@scope/pkg".into()));
    }

    #[test]
    fn test_from_options_with_aliases() {
        let config = HmrConfig::from_options(&options(json!({
            "rootDir": "/project/",
            "baseClasses": [
                { "name": "HTMLElement" },
                { "name": "Base", "import": "./src/base.js" },
                { "name": "LitElement", "origin": "lit-element", "patch": "// patch" },
            ],
            "exclude": ["**/node_modules/**"],
        })))
        .unwrap();

        assert_eq!(config.project_root(), Path::new("/project"));
        let descriptors = config.descriptors();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].origin, None);
        assert_eq!(descriptors[1].origin, Some(Origin::File(PathBuf::from("/project/src/base.js"))));
        assert_eq!(descriptors[2].patch.as_deref(), Some("// patch"));
        assert_eq!(config.exclude(), ["**/node_modules/**".to_string()]);
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            (json!({ "descriptors": [{ "name": "A" }] }), "MissingProjectRoot"),
            (json!({ "projectRoot": "/p" }), "MissingDescriptors"),
            (json!({ "projectRoot": "/p", "descriptors": { "name": "A" } }), "DescriptorsNotArray"),
            (json!({ "projectRoot": "/p", "descriptors": [] }), "EmptyDescriptors"),
            (json!({ "projectRoot": "/p", "descriptors": ["A"] }), "DescriptorNotObject"),
            (json!({ "projectRoot": "/p", "descriptors": [{ "origin": "x" }] }), "MissingName"),
            (json!({ "projectRoot": "/p", "descriptors": [{ "name": "" }] }), "MissingName"),
            (json!({ "projectRoot": "/p", "descriptors": [{ "name": "A", "origin": 1 }] }), "InvalidOrigin"),
            (json!({ "projectRoot": "/p", "descriptors": [{ "name": "A", "patch": true }] }), "InvalidPatch"),
            (json!({ "projectRoot": "/p", "presets": ["vue"] }), "UnknownPreset"),
        ];

        for (value, expected) in cases {
            let err = HmrConfig::from_options(&options(value.clone())).unwrap_err();
            assert!(
                format!("{:?}", err).starts_with(expected),
                "{} gave {:?}",
                value,
                err
            );
        }
    }

    #[test]
    fn test_error_index_points_at_entry() {
        let err = HmrConfig::from_options(&options(json!({
            "projectRoot": "/p",
            "descriptors": [{ "name": "A" }, { "name": "B", "patch": 3 }],
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPatch { index: 1 }));
    }

    #[test]
    fn test_presets_follow_descriptors() {
        let config = HmrConfig::from_options(&options(json!({
            "projectRoot": "/p",
            "descriptors": [{ "name": "HTMLElement" }],
            "presets": ["lit-element"],
        })))
        .unwrap();
        assert_eq!(config.descriptors()[1], BaseClassDescriptor::lit_element());

        let only_presets = HmrConfig::from_options(&options(json!({
            "projectRoot": "/p",
            "presets": ["lit-element"],
        })))
        .unwrap();
        assert_eq!(only_presets.descriptors().len(), 1);
    }

    #[test]
    fn test_from_str_toml() {
        let config = HmrConfig::from_str(
            r#"
project-root = "/p"
include = ["src/**/*.js"]

[[base-classes]]
name = "SharedElement"
origin = "/p/lib/shared.js"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.include(), ["src/**/*.js".to_string()]);
        assert_eq!(
            config.descriptors()[0].origin,
            Some(Origin::File(PathBuf::from("/p/lib/shared.js")))
        );
    }

    #[test]
    fn test_from_file_resolves_root_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wc-hmr.json");
        std::fs::write(&path, r#"{ "projectRoot": "app", "descriptors": [{ "name": "A", "origin": "./a.js" }] }"#)
            .unwrap();

        let config = HmrConfig::from_file(&path).unwrap();
        assert_eq!(config.project_root(), normalize_path(&dir.path().join("app")));
        assert_eq!(
            config.descriptors()[0].origin,
            Some(Origin::File(normalize_path(&dir.path().join("app/a.js"))))
        );
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("wc-hmr.yaml");
        assert!(matches!(HmrConfig::from_file(&yaml), Err(ConfigError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(HmrConfig::from_file(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "descriptors = [").unwrap();
        assert!(matches!(HmrConfig::from_file(&broken), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_new_resolves_relative_files() {
        let config = HmrConfig::new(
            "/p/",
            vec![BaseClassDescriptor::from_file("Base", "src/../lib/base.js")],
        )
        .unwrap();
        assert_eq!(
            config.descriptors()[0].origin,
            Some(Origin::File(PathBuf::from("/p/lib/base.js")))
        );

        assert!(matches!(
            HmrConfig::new("/p", vec![BaseClassDescriptor::global("")]),
            Err(ConfigError::MissingName { index: 0 })
        ));
    }
}
