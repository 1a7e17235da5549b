//! Page acquisition: render the share page and read back its markup.
//!
//! The share page mounts conversation turns lazily, so a plain load is not
//! enough. Acquisition navigates, waits for network idle, scrolls the whole
//! document in fixed steps, lets rendering settle, then reads the HTML.

pub mod http_client;

use crate::config::AcquisitionSettings;
use crate::error::{ArchiveError, Result};
use crate::renderer::{RenderContext, Renderer};
use tracing::{debug, info, warn};

/// In-page routine that scrolls to the bottom in fixed steps.
///
/// Resolves with the total distance scrolled once it reaches
/// `document.body.scrollHeight`.
pub fn scroll_script(settings: &AcquisitionSettings) -> String {
    format!(
        r#"new Promise((resolve) => {{
    let totalHeight = 0;
    const distance = {step};
    const timer = setInterval(() => {{
        window.scrollBy(0, distance);
        totalHeight += distance;
        if (totalHeight >= document.body.scrollHeight) {{
            clearInterval(timer);
            resolve(totalHeight);
        }}
    }}, {interval});
}})"#,
        step = settings.scroll_step_px,
        interval = settings.scroll_interval.as_millis(),
    )
}

/// Render `url` and return the fully hydrated HTML.
///
/// The context is closed on every path, including failures.
pub async fn acquire(
    renderer: &dyn Renderer,
    url: &str,
    settings: &AcquisitionSettings,
) -> Result<String> {
    let mut ctx = renderer
        .new_context()
        .await
        .map_err(ArchiveError::Acquisition)?;

    let result = render(ctx.as_mut(), url, settings).await;

    if let Err(e) = ctx.close().await {
        warn!("failed to close page: {e:#}");
    }

    result.map_err(ArchiveError::Acquisition)
}

async fn render(
    ctx: &mut dyn RenderContext,
    url: &str,
    settings: &AcquisitionSettings,
) -> anyhow::Result<String> {
    let nav = ctx.navigate(url, settings.navigation_timeout).await?;
    info!(
        "network idle at {} after {}ms",
        nav.final_url, nav.load_time_ms
    );

    let scrolled = ctx.execute_js(&scroll_script(settings)).await?;
    debug!("scrolled {scrolled}px to trigger lazy loading");

    tokio::time::sleep(settings.settle_delay).await;

    ctx.get_html().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NavigationResult;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl Log {
        fn push(&self, s: impl Into<String>) {
            self.0.lock().unwrap().push(s.into());
        }
        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeRenderer {
        log: Arc<Log>,
        fail_navigation: bool,
    }

    struct FakeContext {
        log: Arc<Log>,
        fail_navigation: bool,
    }

    #[async_trait]
    impl Renderer for FakeRenderer {
        async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
            self.log.push("new_context");
            Ok(Box::new(FakeContext {
                log: Arc::clone(&self.log),
                fail_navigation: self.fail_navigation,
            }))
        }
        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl RenderContext for FakeContext {
        async fn navigate(
            &mut self,
            url: &str,
            _timeout: Duration,
        ) -> anyhow::Result<NavigationResult> {
            self.log.push(format!("navigate {url}"));
            if self.fail_navigation {
                bail!("navigation timed out after 30000ms");
            }
            Ok(NavigationResult {
                final_url: url.to_string(),
                load_time_ms: 5,
            })
        }
        async fn execute_js(&self, script: &str) -> anyhow::Result<serde_json::Value> {
            assert!(script.contains("scrollBy"));
            self.log.push("scroll");
            Ok(serde_json::json!(900))
        }
        async fn get_html(&self) -> anyhow::Result<String> {
            self.log.push("get_html");
            Ok("<html><body><p>turn</p></body></html>".to_string())
        }
        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            self.log.push("close");
            Ok(())
        }
    }

    fn fast_settings() -> AcquisitionSettings {
        AcquisitionSettings {
            settle_delay: Duration::ZERO,
            ..AcquisitionSettings::default()
        }
    }

    #[test]
    fn test_scroll_script_uses_configured_step_and_interval() {
        let script = scroll_script(&AcquisitionSettings::default());
        assert!(script.contains("const distance = 300;"));
        assert!(script.contains("}, 100);"));
        assert!(script.contains("document.body.scrollHeight"));
        assert!(script.contains("resolve(totalHeight)"));
    }

    #[tokio::test]
    async fn test_acquire_runs_steps_in_order() {
        let log = Arc::new(Log::default());
        let renderer = FakeRenderer {
            log: Arc::clone(&log),
            fail_navigation: false,
        };

        let html = acquire(&renderer, "https://chatgpt.com/share/abc", &fast_settings())
            .await
            .unwrap();

        assert!(html.contains("<p>turn</p>"));
        assert_eq!(
            log.entries(),
            vec![
                "new_context",
                "navigate https://chatgpt.com/share/abc",
                "scroll",
                "get_html",
                "close",
            ]
        );
    }

    #[tokio::test]
    async fn test_acquire_closes_context_on_navigation_failure() {
        let log = Arc::new(Log::default());
        let renderer = FakeRenderer {
            log: Arc::clone(&log),
            fail_navigation: true,
        };

        let err = acquire(&renderer, "https://chatgpt.com/share/abc", &fast_settings())
            .await
            .unwrap_err();

        assert!(matches!(err, ArchiveError::Acquisition(_)));
        assert!(err.to_string().contains("timed out"));
        let entries = log.entries();
        assert_eq!(entries.last().map(String::as_str), Some("close"));
        assert!(!entries.iter().any(|e| e == "scroll"));
    }
}
