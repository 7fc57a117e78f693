//! Decode command handler

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Decode every container under `input` into `output`
pub fn handle(input: &Path, output: &Path) -> Result<()> {
    let summary = aftermath_dvpl::decode_tree(input, output)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    println!(
        "Decoded {} files into {} ({} skipped)",
        summary.decoded.len(),
        output.display(),
        summary.skipped
    );

    if summary.failed.is_empty() {
        return Ok(());
    }

    for (path, error) in &summary.failed {
        tracing::warn!(path = %path.display(), "{}", error);
    }
    bail!("{} file(s) could not be decoded", summary.failed.len())
}
