use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for command output. `RUST_LOG` wins over `default_level` when set.
pub fn init(default_level: &str, json: bool) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().finish().try_init()
    } else {
        builder.finish().try_init()
    }
}
