// Logging and verbosity control

use tracing_subscriber::EnvFilter;

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Errors only
    Quiet,
    /// `RUST_LOG`, or the configured level
    Normal,
    /// Debug output from every soundboard crate
    Verbose,
}

impl VerbosityLevel {
    /// Resolve CLI flags; `--quiet` wins over `--verbose`
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Build the tracing filter for a verbosity level
///
/// In normal mode `RUST_LOG` takes precedence over `default_level`; an
/// unparsable directive falls back to `info`.
pub fn build_filter(level: VerbosityLevel, default_level: &str) -> EnvFilter {
    match level {
        VerbosityLevel::Quiet => EnvFilter::new("error"),
        VerbosityLevel::Verbose => EnvFilter::new("debug"),
        VerbosityLevel::Normal => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Initialize logging based on CLI flags and the configured level
///
/// Output goes to stderr so command output on stdout stays clean.
pub fn init_logging(verbose: bool, quiet: bool, default_level: &str) {
    let level = VerbosityLevel::from_flags(verbose, quiet);

    // A second initialisation (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, default_level))
        .with_target(level == VerbosityLevel::Verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Verbose);
        assert_eq!(VerbosityLevel::from_flags(true, true), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_filter_for_flags() {
        assert_eq!(build_filter(VerbosityLevel::Quiet, "info").to_string(), "error");
        assert_eq!(build_filter(VerbosityLevel::Verbose, "warn").to_string(), "debug");
    }
}
