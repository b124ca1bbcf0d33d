//! Reading and writing serialized result documents.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::CliError;
use crate::result::PanImgResult;

/// Load a [`PanImgResult`] from a JSON file.
pub fn read_result(path: &Path) -> Result<PanImgResult, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result: PanImgResult = serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {}: {}", path.display(), result.summary());
    Ok(result)
}

/// Load and merge several result documents, in the given order.
pub fn read_and_merge<P: AsRef<Path>>(paths: &[P]) -> Result<PanImgResult, CliError> {
    let mut merged = PanImgResult::new();
    for path in paths {
        merged.merge(read_result(path.as_ref())?);
    }
    Ok(merged)
}

/// Serialize a result to JSON text.
pub fn to_json(result: &PanImgResult, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Write a result as JSON to `path`.
pub fn write_result(path: &Path, result: &PanImgResult, pretty: bool) -> Result<(), CliError> {
    let json = to_json(result, pretty).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
