//! Parameters of a benchmark run over both containers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings for filling, timing and snapshotting both containers.
///
/// Every field is optional in the config file and falls back to the value of
/// [`RunConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// How many random keys to generate.
    pub key_count: usize,
    /// Keys are drawn uniformly from `-key_range..=key_range`, must not be negative.
    pub key_range: i32,
    /// Fixed bucket count of the hash map.
    pub bucket_count: usize,
    /// Directory the snapshot files are written to.
    pub output_dir: PathBuf,
    /// Seed for the key generator, random when absent.
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Loads a config from a JSON file. Missing fields take their default.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses a config from JSON text and validates it.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings a run cannot start with: no buckets, or a negative
    /// key range (which leaves no keys to draw from).
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(Error::ZeroBuckets);
        }
        if self.key_range < 0 {
            return Err(Error::InvalidKeyRange(self.key_range));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            key_count: 10_000,
            key_range: 10_000,
            bucket_count: 10_000,
            output_dir: PathBuf::from("./output"),
            seed: None,
        }
    }
}
