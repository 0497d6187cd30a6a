//! File-based tracing setup.
//!
//! Logs go to a daily-rolling file under `${SCOLAR_HOME}/logs`, never to
//! the terminal: the console owns the alternate screen and stray stderr
//! output would corrupt it. Tokens are never logged in full.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

/// Initializes file logging and returns the flush guard.
///
/// Filter resolution order: `SCOLAR_LOG` env var, then the configured
/// `log_filter`, then `info`. Keep the returned guard alive for the
/// process lifetime or buffered lines are lost on exit.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_file_logging(config_filter: Option<&str>) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, "scolar.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("SCOLAR_LOG")
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(guard)
}

/// Returns a masked version of a token for logging (first 8 chars + ...).
///
/// Tokens are opaque, so the cut must stay on char boundaries.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("access-token-abcdef-123456"), "access-t...");
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token(""), "***");
    }

    #[test]
    fn test_mask_token_multibyte() {
        // A char spanning the 8-byte mark must not split the token.
        assert_eq!(mask_token("aaaaaaaé-rest-of-token"), "aaaaaaaé...");
        assert_eq!(mask_token("ééééééééééééé"), "éééééééé...");
    }
}
