//! Share-link validation.
//!
//! A share link is `https://chatgpt.com/share/<token>` where the token is a
//! run of lowercase hex digits and hyphens. Only the prefix is checked:
//! anything after the token is accepted and ignored.

use crate::error::{ArchiveError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn share_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://chatgpt\.com/share/([0-9a-f-]+)").expect("share regex is valid")
    })
}

/// A validated share link and its conversation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    url: String,
    token: String,
}

impl ShareLink {
    /// Validate `input` and capture its token.
    pub fn parse(input: &str) -> Result<Self> {
        let token = share_pattern()
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ArchiveError::InvalidUrl(input.to_string()))?;

        Ok(Self {
            url: input.to_string(),
            token,
        })
    }

    /// The URL exactly as supplied.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The hex-and-hyphen conversation token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// File name of the snapshot for this link.
    pub fn output_file_name(&self) -> String {
        format!("chatgpt_{}.html", self.token)
    }

    /// Base URL that stylesheet hrefs are resolved against.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|source| ArchiveError::StylesheetUrl {
            href: self.url.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_token() {
        let link = ShareLink::parse("https://chatgpt.com/share/abc123-def456").unwrap();
        assert_eq!(link.token(), "abc123-def456");
        assert_eq!(link.url(), "https://chatgpt.com/share/abc123-def456");
    }

    #[test]
    fn test_output_file_name() {
        let link = ShareLink::parse("https://chatgpt.com/share/6781f0aa-0c1d-8001").unwrap();
        assert_eq!(link.output_file_name(), "chatgpt_6781f0aa-0c1d-8001.html");
    }

    #[test]
    fn test_trailing_segments_are_ignored() {
        let link = ShareLink::parse("https://chatgpt.com/share/abc-123/continue?x=1").unwrap();
        assert_eq!(link.token(), "abc-123");

        // Token stops at the first non-hex character.
        let link = ShareLink::parse("https://chatgpt.com/share/abcXYZ").unwrap();
        assert_eq!(link.token(), "abc");
    }

    #[test]
    fn test_rejects_non_matching_inputs() {
        for input in [
            "",
            "chatgpt.com/share/abc",
            "http://chatgpt.com/share/abc",
            "https://chat.openai.com/share/abc",
            "https://chatgpt.com/share/",
            "https://chatgpt.com/share/XYZ",
            "https://chatgpt.com/c/abc123",
            "https://chatgptXcom/share/abc",
            " https://chatgpt.com/share/abc",
            "https://chatgpt.com/share/ABC",
        ] {
            match ShareLink::parse(input) {
                Err(ArchiveError::InvalidUrl(s)) => assert_eq!(s, input),
                other => panic!("expected InvalidUrl for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_base_url_joins_relative_hrefs() {
        let link = ShareLink::parse("https://chatgpt.com/share/abc").unwrap();
        let base = link.base_url().unwrap();
        assert_eq!(
            base.join("/cdn/assets/root.css").unwrap().as_str(),
            "https://chatgpt.com/cdn/assets/root.css"
        );
        assert_eq!(
            base.join("theme.css").unwrap().as_str(),
            "https://chatgpt.com/share/theme.css"
        );
    }
}
