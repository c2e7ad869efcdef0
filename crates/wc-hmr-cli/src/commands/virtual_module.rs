//! `wc-hmr virtual`: show what the dev server serves for a virtual path.

use std::path::Path;

use wc_hmr_engine::VirtualModule;

use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(request_path: &str, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path, None)?;

    match VirtualModule::resolve(request_path, &config)? {
        Some(VirtualModule::Patch { index, source }) => {
            tracing::debug!(index, "serving patch");
            let mut out = StyledOutput::stdout(resolve_color_choice(None));
            out.plain(source);
            out.flush();
        }
        Some(VirtualModule::Runtime) => {
            let mut out = StyledOutput::stderr(resolve_color_choice(None));
            out.info(&format!("{} is the runtime module; its source is provided by the host.", request_path));
            out.newline();
        }
        None => anyhow::bail!("{} is not a wc-hmr virtual module", request_path),
    }
    Ok(())
}
