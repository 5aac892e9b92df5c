pub mod build_info;
pub mod paths;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "referral_intake=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins over `filter`,
/// which wins over the built-in default.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let directives = filter.unwrap_or(DEFAULT_FILTER);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directives))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A test harness or host binary may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
