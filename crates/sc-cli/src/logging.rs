//! stderr logger setup.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Environment variable holding a log spec such as `info` or `sc_migrate=debug`
pub(crate) const LOG_ENV: &str = "SCROOGE_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Start logging to stderr. The returned handle must outlive all logging.
///
/// `--verbose` wins over `SCROOGE_LOG`.
pub(crate) fn init(verbose: bool) -> Result<LoggerHandle> {
    let spec = log_spec(verbose, std::env::var(LOG_ENV).ok());
    Logger::try_with_str(&spec)
        .with_context(|| format!("invalid log spec `{spec}`"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("Failed to start logger")
}

fn log_spec(verbose: bool, from_env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    from_env
        .filter(|spec| !spec.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_env() {
        assert_eq!(log_spec(true, Some("warn".to_string())), "debug");
    }

    #[test]
    fn test_env_spec_used() {
        assert_eq!(log_spec(false, Some("sc_migrate=debug".to_string())), "sc_migrate=debug");
    }

    #[test]
    fn test_default_level() {
        assert_eq!(log_spec(false, None), "info");
        assert_eq!(log_spec(false, Some("  ".to_string())), "info");
    }
}
