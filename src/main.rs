use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pagepluck::cli;
use pagepluck::config::PluckConfig;
use pagepluck::logging;

#[derive(Parser)]
#[command(name = "pagepluck")]
#[command(about = "Pull a page range out of a PDF as plain text or rendered PNG images")]
#[command(version)]
struct Cli {
    /// TOML config file; command-line flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print extracted text for a page range to stdout
    Text {
        /// Source PDF
        source: Option<PathBuf>,

        /// First page (1-based, inclusive)
        #[arg(short, long)]
        first: Option<u32>,

        /// Last page (1-based, inclusive; clamped to the document)
        #[arg(short, long)]
        last: Option<u32>,
    },

    /// Render a page range to PNG files and dump the table of contents
    Images {
        /// Source PDF
        source: Option<PathBuf>,

        /// First page (1-based, inclusive)
        #[arg(short, long)]
        first: Option<u32>,

        /// Last page (1-based, inclusive; clamped to the document)
        #[arg(short, long)]
        last: Option<u32>,

        /// Directory the PNG files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Magnification factor applied to both axes
        #[arg(short, long)]
        scale: Option<f32>,

        /// Characters of first-page text printed as a preview
        #[arg(long)]
        preview_chars: Option<usize>,
    },

    /// Print the table of contents
    Toc {
        /// Source PDF
        source: Option<PathBuf>,

        /// Emit the entries as JSON instead of indented text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init_logging(&args.log_level)?;

    let mut config = match &args.config {
        Some(path) => PluckConfig::load_from_file(path)?,
        None => PluckConfig::default(),
    };
    config.apply_env();

    match args.command {
        Commands::Text {
            source,
            first,
            last,
        } => {
            if let Some(source) = source {
                config.source = Some(source);
            }
            if let Some(first) = first {
                config.text.first_page = first;
            }
            if let Some(last) = last {
                config.text.last_page = last;
            }
            cli::text_command(&config)
        }
        Commands::Images {
            source,
            first,
            last,
            output_dir,
            scale,
            preview_chars,
        } => {
            if let Some(source) = source {
                config.source = Some(source);
            }
            if let Some(first) = first {
                config.images.first_page = first;
            }
            if let Some(last) = last {
                config.images.last_page = last;
            }
            if let Some(output_dir) = output_dir {
                config.images.output_dir = output_dir;
            }
            if let Some(scale) = scale {
                config.images.scale = scale;
            }
            if let Some(preview_chars) = preview_chars {
                config.images.preview_chars = preview_chars;
            }
            cli::images_command(&config)
        }
        Commands::Toc { source, json } => {
            if let Some(source) = source {
                config.source = Some(source);
            }
            cli::toc_command(&config, json)
        }
    }
}
