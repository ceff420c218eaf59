use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn init_test_logger() {
    INIT.call_once(|| {
        // RUST_LOG overrides the default level
        let _ = Builder::new()
            .filter_level(LevelFilter::Info)
            .parse_default_env()
            .is_test(true)
            .try_init();
    });
}
