//! CLI for the imgconv batch converter.

mod commands;
mod console;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use imgconv_core::config::{self, ImgconvConfig};
use imgconv_core::format::{FitMode, TargetFormat};
use std::path::PathBuf;

use commands::{run_completions, run_config, run_convert, run_man, run_route, ConvertOptions};

/// Top-level CLI for imgconv.
#[derive(Debug, Parser)]
#[command(name = "imgconv")]
#[command(about = "Batch-convert images to WebP or AVIF", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert one or more image files.
    Convert {
        /// Input image files.
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Target format: webp or avif (default from config).
        #[arg(long, short = 'f')]
        format: Option<TargetFormat>,

        /// Output width in pixels.
        #[arg(long, value_name = "PX")]
        width: Option<u32>,

        /// Output height in pixels.
        #[arg(long, value_name = "PX")]
        height: Option<u32>,

        /// How to fit the image into width x height: cover, contain, fill, inside, outside.
        #[arg(long, value_name = "MODE")]
        fit: Option<FitMode>,

        /// Directory for converted files (default: config output_dir, else current dir).
        #[arg(long, short = 'o', value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Send every file to the remote endpoint, even WebP.
        #[arg(long)]
        remote: bool,

        /// Replace existing files in the output directory.
        #[arg(long)]
        overwrite: bool,
    },

    /// Show the config file path and effective settings.
    Config,

    /// Show whether a format would be converted locally or remotely.
    Route {
        /// Target format.
        format: TargetFormat,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Shell to generate for.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Convert {
                files,
                format,
                width,
                height,
                fit,
                out_dir,
                remote,
                overwrite,
            } => {
                let cfg = load_config()?;
                let opts = ConvertOptions {
                    files,
                    format,
                    width,
                    height,
                    fit,
                    out_dir,
                    force_remote: remote,
                    overwrite,
                };
                run_convert(&cfg, opts).await?;
            }
            CliCommand::Config => run_config(&load_config()?)?,
            CliCommand::Route { format } => run_route(&load_config()?, format),
            CliCommand::Completions { shell } => run_completions(Cli::command(), shell),
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

fn load_config() -> Result<ImgconvConfig> {
    let cfg = config::load_or_init()?;
    cfg.validate()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
