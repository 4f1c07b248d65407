use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: LevelFilter) {
    let env = Env::default().default_filter_or(default_level.as_str().to_lowercase());
    if let Err(e) = Builder::from_env(env).format_timestamp_millis().try_init() {
        eprintln!("Logger already initialised: {e}");
    }
}
