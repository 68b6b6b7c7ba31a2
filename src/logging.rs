//! Logging setup.
//!
//! The library reports through `tracing` macros; binaries call [`init`] once
//! to print those events on stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a filter directive, e.g. `FOLIO_LOG=debug`.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Level used when `FOLIO_LOG` is unset.
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber.
///
/// `FOLIO_LOG` takes priority over the level derived from the flags.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    // An already-installed global subscriber wins.
    let _ = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
