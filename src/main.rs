//! maskcorr CLI - mask correlation filtering and contrast enhancement.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use maskcorr::pipeline::{self, Operation, PipelineConfig};

#[derive(Parser)]
#[command(name = "maskcorr")]
#[command(about = "Spatial-domain mask filtering and contrast enhancement for raster images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate the image with a mask description file.
    Correlate {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Path to the mask description file.
        #[arg(long)]
        mask: PathBuf,

        /// Path to write the filtered image.
        #[arg(long)]
        out: PathBuf,

        /// Rescale the signed response per channel (for edge masks)
        /// instead of clamping it to [0, 255].
        #[arg(long)]
        rescale: bool,
    },

    /// Equalize the histogram globally, then expand contrast locally.
    Enhance {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Path to write the enhanced image.
        #[arg(long)]
        out: PathBuf,

        /// Structuring window height for the local min/max.
        #[arg(long, default_value = "7")]
        rows: usize,

        /// Structuring window width for the local min/max.
        #[arg(long, default_value = "7")]
        cols: usize,
    },

    /// Apply the midtone tent point transform.
    Tent {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Path to write the transformed image.
        #[arg(long)]
        out: PathBuf,
    },
}

impl Commands {
    fn into_config(self) -> PipelineConfig {
        match self {
            Commands::Correlate {
                image,
                mask,
                out,
                rescale,
            } => PipelineConfig {
                image_path: image,
                output_path: out,
                operation: Operation::Correlate {
                    mask_path: mask,
                    rescale,
                },
            },
            Commands::Enhance {
                image,
                out,
                rows,
                cols,
            } => PipelineConfig {
                image_path: image,
                output_path: out,
                operation: Operation::Enhance {
                    window_rows: rows,
                    window_cols: cols,
                },
            },
            Commands::Tent { image, out } => PipelineConfig {
                image_path: image,
                output_path: out,
                operation: Operation::Tent,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.command.into_config();

    match pipeline::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
