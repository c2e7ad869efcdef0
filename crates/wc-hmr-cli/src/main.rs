//! wc-hmr command-line tool
//!
//! Runs the hot-reload transform over files on disk, validates configs and
//! shows what a dev server would serve for the virtual modules.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::transform::TransformArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wc-hmr")]
#[command(about = "Hot-module-reload instrumentation for web components", long_about = None)]
#[command(version)]
struct Cli {
    /// Log transform decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Instrument JavaScript modules
    Transform {
        /// Files or directories to transform
        #[arg(default_value = ".")]
        paths: Vec<String>,
        /// Config file (defaults to ./wc-hmr.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Project root, overriding the config
        #[arg(long)]
        root: Option<PathBuf>,
        /// Write transformed files here instead of stdout
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Only report which files would change
        #[arg(long)]
        check: bool,
        /// Output format (pretty, json)
        #[arg(long, default_value = "pretty")]
        format: String,
        /// Color output (auto, always, never)
        #[arg(long)]
        color: Option<String>,
    },

    /// Print the source served at a virtual module path
    Virtual {
        /// Request path, e.g. /__web-dev-server__/wc-hmr/patch/0.js
        request_path: String,
        /// Config file (defaults to ./wc-hmr.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a config and list its base classes
    Config {
        /// Config file (defaults to ./wc-hmr.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transform {
            paths,
            config,
            root,
            out_dir,
            check,
            format,
            color,
        } => commands::transform::execute(TransformArgs {
            paths,
            config,
            root,
            out_dir,
            check,
            format,
            color,
        }),

        Commands::Virtual { request_path, config } => {
            commands::virtual_module::execute(&request_path, config.as_deref())
        }

        Commands::Config { config } => commands::config::execute(config.as_deref()),
    }
}
