// Third Party
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Set up logging to stdout. `RUST_LOG` takes precedence, otherwise `default_filter` applies.
pub fn init_tracing(crate_name: &str, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(crate_name, level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Show everything `crate_name` logs at `level` or above, and nothing from dependencies.
pub fn default_filter(crate_name: &str, level: Level) -> EnvFilter {
    EnvFilter::new(format!(
        "{}={}",
        crate_name,
        level.to_string().to_lowercase()
    ))
}

/// Exit the process as soon as SIGINT or SIGTERM arrives.
pub fn setup_exit_hooks() -> Result<(), anyhow::Error> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!("Received signal {}, exiting", signal);
            std::process::exit(0);
        }
    });
    Ok(())
}
