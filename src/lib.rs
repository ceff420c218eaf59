//! Two keyed containers over `i32` keys: an ordered map implemented with an
//! AVL tree and a hash map with a fixed number of chained buckets.
//!
//! Both containers can dump their full internal structure as JSON for
//! inspection, see [`ToJson`] and [`save_json`].

pub mod avl_tree;
pub mod config;
pub mod error;
pub mod hash_map;
pub mod output;

pub use avl_tree::AvlTree;
pub use config::RunConfig;
pub use error::{Error, Result};
pub use hash_map::ChainedHashMap;
pub use output::{create_output_dir, save_json, ToJson};

/// Key type shared by both containers.
pub type Key = i32;

#[cfg(test)]
mod tests;
