//! `wc-hmr config`: validate a config and list its base classes.

use std::path::Path;

use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path, None)?;
    let mut out = StyledOutput::stdout(resolve_color_choice(None));

    out.bold("Project root: ");
    out.plain(&config.project_root().display().to_string());
    out.newline();
    out.newline();

    let rows: Vec<[String; 4]> = config
        .descriptors()
        .iter()
        .enumerate()
        .map(|(index, descriptor)| {
            [
                index.to_string(),
                descriptor.name.clone(),
                descriptor
                    .origin
                    .as_ref()
                    .map_or_else(|| "(global)".to_string(), |origin| origin.to_string()),
                if descriptor.patch.is_some() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let header = ["INDEX", "NAME", "ORIGIN", "PATCH"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for (i, title) in header.iter().enumerate() {
        out.bold(&format!("{:<width$}  ", title, width = widths[i]));
    }
    out.newline();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            out.plain(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.newline();
    }

    if !config.include().is_empty() || !config.exclude().is_empty() {
        out.newline();
        out.dim(&format!("include: {:?}", config.include()));
        out.newline();
        out.dim(&format!("exclude: {:?}", config.exclude()));
        out.newline();
    }

    out.newline();
    out.success("Config is valid.");
    out.newline();
    out.flush();
    Ok(())
}
