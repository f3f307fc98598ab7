//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging with a default filter level.
///
/// `verbose` lowers the default filter to `debug`; `RUST_LOG` still wins.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = Env::default().default_filter_or(default);
    let _ = env_logger::Builder::from_env(env).try_init();
}
