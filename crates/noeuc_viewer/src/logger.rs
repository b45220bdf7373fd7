use log::LevelFilter;

/// Initialize the logger at `level`; `RUST_LOG` still refines per module.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}
