//! The archive pipeline: acquire, sanitize, serialize.

use crate::acquisition::acquire;
use crate::acquisition::http_client::{HttpClient, StylesheetSource};
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::sanitize::sanitize;
use crate::serializer::write_snapshot;
use crate::share_url::ShareLink;
use std::path::PathBuf;
use tracing::{info, warn};

/// Archive one validated share link with the given collaborators.
///
/// Does not shut the renderer down; the caller owns its lifetime.
pub async fn archive(
    link: &ShareLink,
    renderer: &dyn Renderer,
    stylesheets: &dyn StylesheetSource,
    config: &ArchiveConfig,
) -> Result<PathBuf> {
    let html = acquire(renderer, link.url(), &config.acquisition).await?;
    info!("acquired {} bytes of rendered HTML", html.len());

    let base = link.base_url()?;
    let doc = sanitize(&html, &base, stylesheets).await?;

    write_snapshot(&config.output_dir, link, &doc)
}

/// Run [`archive`], then shut `renderer` down whatever the outcome.
///
/// A shutdown failure is logged and never masks the archive result.
pub async fn archive_then_shutdown(
    link: &ShareLink,
    renderer: &dyn Renderer,
    stylesheets: &dyn StylesheetSource,
    config: &ArchiveConfig,
) -> Result<PathBuf> {
    let outcome = archive(link, renderer, stylesheets, config).await;

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e:#}");
    }
    outcome
}

/// Launch Chromium and archive `link` with it.
pub async fn run(link: &ShareLink, config: &ArchiveConfig) -> Result<PathBuf> {
    let renderer = ChromiumRenderer::launch(&config.browser)
        .await
        .map_err(ArchiveError::BrowserLaunch)?;
    let stylesheets = HttpClient::new(config.stylesheet_timeout);

    archive_then_shutdown(link, &renderer, &stylesheets, config).await
}
