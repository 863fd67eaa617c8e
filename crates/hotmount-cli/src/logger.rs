//! Logging setup for the hotmount CLI.
//!
//! Built on the `tracing` ecosystem: `--verbose` enables debug output for the
//! hotmount crates, `--quiet` limits output to errors, and `RUST_LOG`
//! overrides the default filter otherwise.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "hotmount=debug,hotmount_config=debug,hotmount_cli=debug";
const QUIET_FILTER: &str = "hotmount=error,hotmount_config=error,hotmount_cli=error";
const DEFAULT_FILTER: &str = "hotmount=info,hotmount_config=info,hotmount_cli=info";

/// Initialize the global tracing subscriber.
///
/// Call once at startup. Later calls are ignored, so an application that set
/// up its own subscriber keeps it.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether colored output should be used, honoring `NO_COLOR` and `FORCE_COLOR`.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
