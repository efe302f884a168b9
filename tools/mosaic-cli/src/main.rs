//! Mosaic CLI: lay out, estimate and export photo collages.
//!
//! Usage:
//!   mosaic init <PHOTOS...>         Write a collage.json document
//!   mosaic layout <DOC|PHOTOS...>   Print the computed layout as JSON
//!   mosaic estimate <DOC>           Estimate the exported file size
//!   mosaic export <DOC>             Export the collage as a JPEG
//!   mosaic check                    Show the platform pixel budget

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::LayoutArgs;
use mosaic_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "mosaic",
    about = "Photo collages that export within platform pixel limits",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a collage.json document from image files
    Init {
        /// Image files, in placement order
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// Document path to write
        #[arg(short, long, default_value = "collage.json")]
        output: PathBuf,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Compute a layout and print it as JSON
    Layout {
        /// A collage.json document, or one or more image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Estimate the exported file size of a collage
    Estimate {
        /// Path to the collage.json document
        path: PathBuf,

        /// Quality preset: low|medium|high|max (overrides the document)
        #[arg(short, long)]
        quality: Option<String>,

        /// Platform class: constrained|mobile|desktop
        #[arg(long)]
        platform: Option<String>,
    },

    /// Export a collage to a JPEG
    Export {
        /// Path to the collage.json document
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quality preset: low|medium|high|max (overrides the document)
        #[arg(short, long)]
        quality: Option<String>,

        /// Platform class: constrained|mobile|desktop
        #[arg(long)]
        platform: Option<String>,

        /// Make the rasterizer refuse surfaces above this many pixels
        #[arg(long)]
        raster_ceiling: Option<u64>,
    },

    /// Show the detected platform class and pixel ceilings
    Check {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write_config: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    mosaic_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init {
            photos,
            output,
            force,
            layout,
        } => commands::init::run(photos, output, force, &layout),
        Commands::Layout { inputs, layout } => commands::layout::run(inputs, &layout),
        Commands::Estimate {
            path,
            quality,
            platform,
        } => commands::estimate::run(&config, path, quality, platform).await,
        Commands::Export {
            path,
            output,
            quality,
            platform,
            raster_ceiling,
        } => commands::export::run(&config, path, output, quality, platform, raster_ceiling).await,
        Commands::Check { write_config } => commands::check::run(&config, write_config),
    }
}
