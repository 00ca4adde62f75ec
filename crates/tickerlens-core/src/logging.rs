use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "warn,tickerlens_core=debug,tickerlens=debug"
    } else {
        "warn,tickerlens_core=info,tickerlens=info"
    }
}

/// Install the stderr subscriber. Safe to call more than once; only the
/// first call takes effect.
pub fn init(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.debug)));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(config.debug)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(
            environment = config.environment.as_str(),
            base_url = %config.api_base_url,
            "logging initialized"
        );
    }
}
