//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up aftermath CLI defaults.

use crate::config::Config;
use aftermath::Locale;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Values to store, `None` leaves the current setting alone
#[derive(Debug, Default)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub reference_locale: Option<String>,
}

impl Settings {
    fn is_empty(&self) -> bool {
        self.input.is_none()
            && self.output.is_none()
            && self.catalog.is_none()
            && self.reference_locale.is_none()
    }
}

/// Handle the configure command
pub fn handle(settings: Settings, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if settings.is_empty() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, settings)?;
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Merge new settings into the config, validating the locale tag
fn apply(config: &mut Config, settings: Settings) -> Result<()> {
    if let Some(tag) = settings.reference_locale {
        let locale: Locale = tag
            .parse()
            .with_context(|| format!("Invalid reference locale '{}'", tag))?;
        config.reference_locale = Some(locale.to_string());
    }
    if settings.input.is_some() {
        config.input_dir = settings.input;
    }
    if settings.output.is_some() {
        config.output_dir = settings.output;
    }
    if settings.catalog.is_some() {
        config.reference_catalog = settings.catalog;
    }
    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    let show = |label: &str, value: Option<String>| match value {
        Some(value) => println!("{:<18} {}", label, value),
        None => println!("{:<18} (not set)", label),
    };

    show("Input directory:", config.input_dir.as_ref().map(|p| p.display().to_string()));
    show("Output directory:", config.output_dir.as_ref().map(|p| p.display().to_string()));
    show(
        "Reference catalog:",
        config.reference_catalog.as_ref().map(|p| p.display().to_string()),
    );
    show("Reference locale:", config.reference_locale.clone());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: aftermath configure [--input DIR] [--output DIR] [--catalog FILE] [--reference-locale TAG]");
    println!("   or: aftermath configure --show");
}
