use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("not a valid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported scheme '{0}', only http and https can be probed")]
    UnsupportedScheme(String),
    #[error("URL has no hostname")]
    MissingHost,
}

/// Checks that a raw target is an absolute http(s) URL with a host. Anything
/// else is skippable, not fatal.
pub fn validate_target(raw: &str) -> Result<Url, TargetError> {
    let url = Url::parse(raw)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(TargetError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(TargetError::MissingHost);
    }

    Ok(url)
}

/// Loads a newline-delimited targets file. Lines are trimmed; blank lines and
/// `#` comments are dropped. Entries are not validated here; bad URLs are
/// skipped with a warning at probe time.
pub fn load_targets(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read targets file {}", path.display()))?;

    let targets = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect();

    Ok(targets)
}
