use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT: OnceLock<bool> = OnceLock::new();

/// Install the global fmt subscriber (stderr) once. `RUST_LOG` wins over
/// `default_filter`. Returns false if another subscriber was already set.
pub fn init_logging(default_filter: &str) -> bool {
    *INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
}
