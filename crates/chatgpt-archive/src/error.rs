//! Error types for the archive pipeline.

use std::path::PathBuf;

/// All errors that can abort an archive run.
///
/// Every variant is fatal; the binary maps each one to exit status 1.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to launch browser: {0:#}")]
    BrowserLaunch(anyhow::Error),

    #[error("failed to acquire page: {0:#}")]
    Acquisition(anyhow::Error),

    #[error("cannot resolve stylesheet href {href:?}: {source}")]
    StylesheetUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch stylesheet {url}: {source}")]
    StylesheetFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("stylesheet {url} returned HTTP {status}")]
    StylesheetStatus { url: String, status: u16 },

    #[error("failed to write snapshot to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_message_matches_cli_diagnostic() {
        let err = ArchiveError::InvalidUrl("https://example.com".into());
        assert_eq!(err.to_string(), "Invalid URL: https://example.com");
    }

    #[test]
    fn test_acquisition_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("timed out").context("navigation failed");
        let err = ArchiveError::Acquisition(inner);
        assert_eq!(
            err.to_string(),
            "failed to acquire page: navigation failed: timed out"
        );
    }

    #[test]
    fn test_status_error_names_url() {
        let err = ArchiveError::StylesheetStatus {
            url: "https://cdn.example/app.css".into(),
            status: 404,
        };
        assert!(err.to_string().contains("https://cdn.example/app.css"));
        assert!(err.to_string().contains("404"));
    }
}
