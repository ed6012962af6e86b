//! Diagnostic logging setup.

use std::io;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive, e.g. `source_gates=debug`
pub const LOG_ENV: &str = "SOURCE_GATES_LOG";

static INIT: Once = Once::new();

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "source_gates=info,warn",
        _ => "source_gates=debug,info",
    }
}

/// Install the stderr subscriber.
///
/// `SOURCE_GATES_LOG` wins over `verbosity` when set. Stdout is left to the
/// report tables. Safe to call more than once.
pub fn init_logging(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(false)
                    .with_target(false),
            )
            .with(filter)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "warn");
        assert!(default_directive(1).contains("source_gates=info"));
        assert!(default_directive(5).contains("source_gates=debug"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(0);
        init_logging(2);
    }
}
