use super::Format;
use crate::structure::Structure;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse document text in the given format
///
/// # Errors
///
/// Returns an error if the text is not valid JSON or TOML respectively
pub fn parse_structure(content: &str, format: Format) -> Result<Structure> {
    let structure = match format {
        Format::Json => serde_json::from_str::<serde_json::Value>(content)
            .map(Structure::from)
            .map_err(crate::ExtendextError::from)?,
        Format::Toml => toml::from_str::<toml::Value>(content)
            .map(Structure::from)
            .map_err(crate::ExtendextError::from)?,
    };

    Ok(structure)
}

/// Read a structure from a JSON or TOML file, chosen by extension
///
/// # Errors
///
/// Returns an error if:
/// - Unable to read the file
/// - Unable to parse the content
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Structure> {
    let path_ref = path.as_ref();
    let format = Format::from_path(path_ref);

    let content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read {}", path_ref.display()))?;

    let structure = parse_structure(&content, format)
        .with_context(|| format!("Failed to parse {}", path_ref.display()))?;

    debug!("Read {:?} document from {}", format, path_ref.display());
    Ok(structure)
}

/// Read several structures in order
///
/// # Errors
///
/// Returns the first read or parse error encountered
pub fn read_structures<I, P>(paths: I) -> Result<Vec<Structure>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(read_structure).collect()
}
