//! Tracing subscriber setup for binaries
//!
//! `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
//! Output goes to stderr so command output on stdout stays clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(
                "staffly_access=debug,staffly_layout=debug,staffly_client=debug,staffly_core=debug,info",
            )
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(format: LogFormat, verbose: bool) -> bool {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_refused() {
        let _ = init(LogFormat::Pretty, false);
        assert!(!init(LogFormat::Json, true));
    }
}
