//! Logging setup for the CLI.
//!
//! `RUST_LOG` wins when set; otherwise Folio crates log at `info`, or
//! `debug` with `--verbose`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter directives for the chosen verbosity
///
/// Targets match by prefix, so `folio` covers every `folio_*` crate.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "folio=debug"
    } else {
        "folio=info"
    }
}

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay machine-readable.
pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(verbose)))
        .map_err(|err| anyhow!("invalid log filter: {err}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_the_level() {
        assert_eq!(default_directives(false), "folio=info");
        assert_eq!(default_directives(true), "folio=debug");
        assert!(EnvFilter::try_new(default_directives(true)).is_ok());
    }
}
