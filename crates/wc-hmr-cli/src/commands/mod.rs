//! Subcommand implementations

pub mod config;
pub mod files;
pub mod transform;
pub mod virtual_module;

use anyhow::Context;
use std::path::{Path, PathBuf};
use wc_hmr_engine::config::normalize_path;
use wc_hmr_engine::{ConfigError, ConfigFormat, HmrConfig, HmrOptions};

/// Config file picked up from the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "wc-hmr.toml";

/// Preset used when no config file exists
const FALLBACK_PRESET: &str = "lit-element";

/// Load the transform config.
///
/// Uses `config_path`, else `./wc-hmr.toml`, else the LitElement preset
/// rooted at the working directory. `root` overrides the project root in
/// every case.
pub fn load_config(config_path: Option<&Path>, root: Option<&Path>) -> anyhow::Result<HmrConfig> {
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let root = root.map(|root| normalize_path(&cwd.join(root)));

    let config_path = match config_path {
        Some(path) => Some(cwd.join(path)),
        None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
    };

    let Some(config_path) = config_path else {
        tracing::debug!("no {} found, using the {} preset", DEFAULT_CONFIG_FILE, FALLBACK_PRESET);
        let options = HmrOptions {
            presets: vec![FALLBACK_PRESET.to_string()],
            project_root: Some(root.unwrap_or(cwd)),
            ..HmrOptions::default()
        };
        return Ok(HmrConfig::from_options(&options)?);
    };

    let config = match root {
        None => HmrConfig::from_file(&config_path),
        Some(root) => load_with_root(&config_path, root),
    }
    .with_context(|| format!("invalid config {}", config_path.display()))?;

    tracing::debug!(
        config = %config_path.display(),
        root = %config.project_root().display(),
        descriptors = config.descriptors().len(),
        "loaded config"
    );
    Ok(config)
}

fn load_with_root(config_path: &Path, root: PathBuf) -> Result<HmrConfig, ConfigError> {
    let format = ConfigFormat::from_path(config_path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(config_path.to_path_buf()))?;
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;

    let mut options = HmrOptions::parse(&content, format)?;
    options.project_root = Some(root);
    HmrConfig::from_options(&options)
}
