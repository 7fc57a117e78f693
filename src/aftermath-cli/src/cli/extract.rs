//! Extract command arguments

use aftermath::Locale;
use clap::Args;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Game data directory (uses configured default if not provided)
    #[arg(short, long, env = "AFTERMATH_INPUT")]
    pub input: Option<PathBuf>,

    /// Output directory (uses configured default if not provided)
    #[arg(short, long, env = "AFTERMATH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Precomputed reference catalog (JSON keyed by vehicle id)
    #[arg(long, env = "AFTERMATH_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Encyclopedia response to merge into the catalog, as LOCALE=FILE
    #[arg(long, value_name = "LOCALE=FILE")]
    pub encyclopedia: Vec<EncyclopediaSource>,

    /// Locale that other locales are reduced against (default: en)
    #[arg(long)]
    pub reference_locale: Option<String>,

    /// Treat .dvpl files as opaque instead of decoding them
    #[arg(long)]
    pub no_decode: bool,
}

/// One `LOCALE=FILE` encyclopedia argument
#[derive(Debug, Clone)]
pub struct EncyclopediaSource {
    pub locale: Locale,
    pub file: PathBuf,
}

impl FromStr for EncyclopediaSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (locale, file) = s
            .split_once('=')
            .ok_or_else(|| format!("expected LOCALE=FILE, got '{s}'"))?;
        if file.is_empty() {
            return Err(format!("missing file in '{s}'"));
        }

        Ok(Self {
            locale: locale.parse().map_err(|e| format!("{e}"))?,
            file: PathBuf::from(file),
        })
    }
}
