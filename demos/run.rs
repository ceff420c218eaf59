//! Fills both containers with random keys, times insert/find/remove and
//! writes JSON snapshots of the full and the emptied structures.
//!
//! Usage: `cargo run --example run [config.json]`

use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

use env_logger::Builder;
use log::{info, LevelFilter};
use rand::{rngs::StdRng, Rng, SeedableRng};

use tree_and_map::{create_output_dir, save_json, AvlTree, ChainedHashMap, RunConfig};

fn timed<F: FnMut()>(mut f: F) -> Duration {
    let start = Instant::now();
    f();
    start.elapsed()
}

fn main() -> Result<(), Box<dyn Error>> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(Path::new(&path))?,
        None => RunConfig::default(),
    };
    config.validate()?;
    info!("Running with {:?}", config);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let keys: Vec<i32> = (0..config.key_count)
        .map(|_| rng.gen_range(-config.key_range..=config.key_range))
        .collect();

    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(config.bucket_count)?;

    let tree_insert = timed(|| {
        for key in &keys {
            tree.insert(*key, *key);
        }
    });
    let map_insert = timed(|| {
        for key in &keys {
            map.insert(*key, *key);
        }
    });

    let tree_find = timed(|| {
        for key in &keys {
            tree.find(key);
        }
    });
    let map_find = timed(|| {
        for key in &keys {
            map.find(key);
        }
    });

    // a failed directory or snapshot write is logged and the run continues
    let _ = create_output_dir(&config.output_dir);
    let out = |name: &str| config.output_dir.join(name);

    let _ = save_json(&tree, out("tree_output.json"));
    let _ = save_json(&map, out("map_output.json"));

    let tree_remove = timed(|| {
        for key in &keys {
            tree.remove(key);
        }
    });
    let map_remove = timed(|| {
        for key in &keys {
            map.remove(key);
        }
    });

    let _ = save_json(&tree, out("tree_output_empty.json"));
    let _ = save_json(&map, out("map_output_empty.json"));

    println!(
        "AVL Tree - Insert: {:?}, Find: {:?}, Remove: {:?}",
        tree_insert, tree_find, tree_remove
    );
    println!(
        "HashMap - Insert: {:?}, Find: {:?}, Remove: {:?}",
        map_insert, map_find, map_remove
    );
    Ok(())
}
