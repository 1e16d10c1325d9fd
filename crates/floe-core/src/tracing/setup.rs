//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Floe tracing/logging system.
///
/// Reads the `FLOE_LOG` environment variable for per-subsystem log levels.
/// Format: `FLOE_LOG=floe_policy::inheritance=debug,floe_policy::enforcement=info`
///
/// Falls back to `floe=info` if `FLOE_LOG` is not set or is invalid.
/// Output goes to stderr so report bytes on stdout stay clean.
///
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FLOE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("floe=info,floe_core=info,floe_policy=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
