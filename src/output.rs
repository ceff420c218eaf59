//! Writing container snapshots to storage.

use std::fs;
use std::path::Path;

use log::{debug, error};

use crate::error::{Error, Result};

/// A container that can dump its full internal structure as JSON.
pub trait ToJson {
    /// Serializes the structure without modifying it.
    fn to_json(&self) -> Result<String>;
}

/// Serializes `data` and writes the JSON to `path`, replacing any existing file.
///
/// Nothing is written if serialization fails. Failures are logged here and
/// returned so the caller can carry on with its run.
pub fn save_json<T, P>(data: &T, path: P) -> Result<()>
where
    T: ToJson + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = data.to_json().map_err(|err| {
        error!("Error serializing data to JSON: {}", err);
        err
    })?;

    fs::write(path, json.as_bytes()).map_err(|source| {
        error!("Error writing JSON to {}: {}", path.display(), source);
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

/// Creates the directory snapshots are written to, including missing parents.
///
/// Like [`save_json`], a failure is logged and returned; callers may keep
/// going and let each later save report its own failure.
pub fn create_output_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| {
        error!("Error creating output directory {}: {}", dir.display(), source);
        Error::OutputDir {
            path: dir.to_path_buf(),
            source,
        }
    })
}
