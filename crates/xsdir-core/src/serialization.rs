use crate::domain::{XsdirError, XsdirResult};
use crate::properties::ScatteringCenterPropertiesDatabase;
use std::fs;
use std::path::Path;

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

/// Writes `database` as pretty-printed JSON.
pub fn save_database(database: &ScatteringCenterPropertiesDatabase, path: &Path) -> XsdirResult<()> {
    let content = serde_json::to_string_pretty(database).map_err(|error| {
        XsdirError::internal(
            "INTERNAL.DATABASE_ENCODE",
            format!("failed to encode scattering-center database: {}", error),
        )
    })?;
    write_text_artifact(path, &content).map_err(|error| {
        XsdirError::io_system(
            "IO.DATABASE_WRITE",
            format!("failed to write database '{}': {}", path.display(), error),
        )
    })
}

/// Reads a database written by [`save_database`] and checks its thermal
/// references.
pub fn load_database(path: &Path) -> XsdirResult<ScatteringCenterPropertiesDatabase> {
    let content = fs::read_to_string(path).map_err(|error| {
        XsdirError::io_system(
            "IO.DATABASE_READ",
            format!("failed to read database '{}': {}", path.display(), error),
        )
    })?;
    let database: ScatteringCenterPropertiesDatabase =
        serde_json::from_str(&content).map_err(|error| {
            XsdirError::format(
                "FORMAT.DATABASE_JSON",
                format!("database '{}' is not valid: {}", path.display(), error),
            )
        })?;
    database.validate()?;
    Ok(database)
}
