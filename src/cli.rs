use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "license-scanner",
    version,
    about = "Read driver's license PDF417 barcodes and extract their fields"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json: bool,
    #[arg(long, global = true, help = "Config file (defaults to the platform config dir)")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered regions in detection order
    Regions,
    /// Parse a decoded payload saved as text ("-" reads stdin)
    Parse {
        file: PathBuf,
        #[arg(long, help = "Region to parse against when no signature matches")]
        region: Option<String>,
    },
    /// Decode a still image of a barcode and parse it
    Decode {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        region: Option<String>,
    },
    /// Run the live scan loop over a directory of frames
    Scan {
        #[arg(long)]
        frames: PathBuf,
        #[arg(long, default_value_t = 10)]
        duration_secs: u64,
        #[arg(long, default_value_t = 100, help = "How long each frame stays current")]
        frame_period_ms: u64,
        #[arg(
            long,
            help = "Where captured frames are saved (default: capture.output_dir, else ./captures)"
        )]
        captures: Option<PathBuf>,
        #[arg(long)]
        region: Option<String>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}
