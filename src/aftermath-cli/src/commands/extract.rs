//! Extract command handler

use aftermath::{Error, Locale, Pipeline, PipelineOptions, ReferenceCatalog};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::{EncyclopediaSource, ExtractArgs};
use crate::config::Config;

/// Handle the extract command
///
/// Documents are exported even when some branches failed; the command then
/// reports the failures and exits with an error.
pub fn handle(args: ExtractArgs, config: &Config) -> Result<()> {
    let input = args
        .input
        .or_else(|| config.input_dir.clone())
        .context("No input directory. Pass --input or run `aftermath configure --input DIR`")?;
    let output = args
        .output
        .or_else(|| config.output_dir.clone())
        .context("No output directory. Pass --output or run `aftermath configure --output DIR`")?;

    let reference_locale = match args.reference_locale.or_else(|| config.reference_locale.clone()) {
        Some(tag) => tag.parse::<Locale>()?,
        None => Locale::english(),
    };

    let catalog = load_catalog(
        args.catalog.or_else(|| config.reference_catalog.clone()),
        &args.encyclopedia,
    )?;

    let options = PipelineOptions {
        reference_locale,
        decode_containers: !args.no_decode,
    };
    let pipeline = Pipeline::new(catalog, options);

    println!("Extracting from {}", input.display());
    let result = pipeline.run(&input);

    let summary = pipeline
        .export(&output)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!("Vehicles:     {}", summary.vehicles);
    println!("Maps:         {}", summary.maps);
    println!("Battle types: {}", summary.battle_types);
    println!("Locales:      {}", summary.locales);
    println!("Wrote {} files to {}", summary.files.len(), output.display());

    match result {
        Ok(()) => Ok(()),
        Err(Error::Aborted(failures)) => {
            eprintln!();
            eprintln!("Failed branches:");
            for failure in &failures {
                eprintln!("  {}", failure);
            }
            bail!("{} branch(es) failed during extraction", failures.len())
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

/// Build the reference catalog from the catalog file and encyclopedia responses
fn load_catalog(path: Option<PathBuf>, encyclopedia: &[EncyclopediaSource]) -> Result<ReferenceCatalog> {
    let mut catalog = match path {
        Some(path) => ReferenceCatalog::load(&path)
            .with_context(|| format!("Failed to load reference catalog {}", path.display()))?,
        None => ReferenceCatalog::new(),
    };

    for source in encyclopedia {
        let json = fs::read_to_string(&source.file)
            .with_context(|| format!("Failed to read {}", source.file.display()))?;
        let merged = catalog
            .merge_encyclopedia(&source.locale, &json)
            .with_context(|| format!("Failed to parse encyclopedia {}", source.file.display()))?;
        tracing::info!(locale = %source.locale, merged, "Merged encyclopedia");
    }

    Ok(catalog)
}
