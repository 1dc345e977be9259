//! Diagnostics go to stderr through `env_logger`

use env_logger::Env;

/// Install the logger. `RUST_LOG` wins over the verbosity flag.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        Env::default().default_filter_or(default_level),
    )
    .format_timestamp(None)
    .try_init();
}
