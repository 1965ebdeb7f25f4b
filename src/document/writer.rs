use super::Format;
use crate::structure::Structure;
use crate::ExtendextError;
use chrono::Local;
use std::fs;
use std::path::Path;

/// Render a structure as pretty JSON or TOML text, ending with a newline
///
/// # Errors
///
/// Returns an error if:
/// - Serialization fails
/// - TOML output is requested for a structure TOML cannot express (a
///   non-mapping root or `null` values)
pub fn render_structure(structure: &Structure, format: Format) -> Result<String, ExtendextError> {
    let mut rendered = match format {
        Format::Json => serde_json::to_string_pretty(structure)?,
        Format::Toml => {
            if !structure.is_mapping() {
                return Err(ExtendextError::Unrepresentable(
                    "TOML documents must have a table at the root".to_string(),
                ));
            }
            if contains_null(structure) {
                return Err(ExtendextError::Unrepresentable(
                    "TOML has no null value".to_string(),
                ));
            }
            toml::to_string_pretty(structure)?
        },
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

fn contains_null(structure: &Structure) -> bool {
    match structure {
        Structure::Null => true,
        // Holes in a sequence serialize as null
        Structure::Sequence(_) => {
            structure.items().iter().any(|item| item.is_undefined() || contains_null(item))
        },
        Structure::Mapping(_) => structure.entries().iter().any(|(_, value)| contains_null(value)),
        _ => false,
    }
}

/// Write a structure to a file
///
/// # Errors
///
/// Returns an error if:
/// - Unable to create parent directories
/// - Unable to render the structure
/// - Unable to write to the file
pub fn write_structure<P: AsRef<Path>>(
    path: P,
    structure: &Structure,
    format: Format,
) -> anyhow::Result<()> {
    let path_ref = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)?;
    }

    let rendered = render_structure(structure, format)?;
    fs::write(path_ref, rendered)?;

    Ok(())
}

/// Create a backup of a file with timestamp
///
/// # Errors
///
/// Returns an error if unable to copy the file
pub fn backup_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<String>> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path_ref.with_file_name(format!(
        "{}.backup.{}",
        path_ref.file_name().and_then(|n| n.to_str()).unwrap_or("merged.json"),
        timestamp
    ));

    fs::copy(path_ref, &backup_path)?;

    Ok(Some(backup_path.to_string_lossy().to_string()))
}
