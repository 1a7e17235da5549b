//! `chatgpt-archive <url>`: save one shared conversation.

use crate::config::ArchiveConfig;
use crate::pipeline;
use crate::share_url::ShareLink;
use anyhow::Result;

/// Run the archive command.
///
/// The URL is validated before anything touches the network.
pub async fn run(url: &str) -> Result<()> {
    let link = ShareLink::parse(url)?;

    println!("Opening {url}");
    let path = pipeline::run(&link, &ArchiveConfig::default()).await?;
    println!("Saved cleaned HTML to {}", path.display());

    Ok(())
}
