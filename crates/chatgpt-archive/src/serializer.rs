//! Write the sanitized tree to disk.

use crate::error::{ArchiveError, Result};
use crate::share_url::ShareLink;
use scraper::Html;
use std::path::{Path, PathBuf};

/// Render the tree back to HTML text, doctype included.
pub fn serialize(doc: &Html) -> String {
    doc.html()
}

/// Write `doc` to `dir/chatgpt_<token>.html`, replacing any existing file.
///
/// The write is not atomic; a crash mid-write leaves a partial file.
pub fn write_snapshot(dir: &Path, link: &ShareLink, doc: &Html) -> Result<PathBuf> {
    let path = dir.join(link.output_file_name());
    std::fs::write(&path, serialize(doc)).map_err(|source| ArchiveError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
