use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by container construction, snapshot output and configuration.
///
/// Looking up or removing an absent key is never an error; those operations
/// report absence through `Option`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("hash map bucket count must be greater than zero")]
    ZeroBuckets,
    #[error("key range must not be negative, got {0}")]
    InvalidKeyRange(i32),
    #[error("failed to serialize {container} to JSON")]
    Serialize {
        container: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write snapshot to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type of every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;
