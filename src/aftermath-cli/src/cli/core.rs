//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::extract::ExtractArgs;

#[derive(Parser)]
#[command(name = "aftermath")]
#[command(about = "World of Tanks Blitz asset extractor", long_about = None)]
pub struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract vehicles, maps, battle types and version into JSON
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Decode every .dvpl container in a tree into a mirrored tree
    #[command(visible_alias = "d")]
    Decode {
        /// Directory holding .dvpl files
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to write decoded files into
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default input directory
        #[arg(long)]
        input: Option<PathBuf>,

        /// Set default output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Set default reference catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Set default reference locale
        #[arg(long)]
        reference_locale: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
