//! Chromium-based renderer using chromiumoxide.

use super::{NavigationResult, RenderContext, Renderer};
use crate::config::{BrowserSettings, CHROMIUM_PATH_ENV};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Lifecycle event Chromium emits once no requests have been in flight
/// for 500ms.
const NETWORK_IDLE_EVENT: &str = "networkIdle";

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    // 1. Explicit path from settings
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.clone());
        }
    }

    // 2. CHATGPT_ARCHIVE_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 3. ~/.cache/chatgpt-archive/chromium/
    if let Some(cache) = dirs::cache_dir() {
        let root = cache.join("chatgpt-archive/chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                root.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome"),
            ]
        } else {
            vec![root.join("chrome-linux64/chrome"), root.join("chrome")]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 4. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 5. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer.
///
/// Every page is opened inside one incognito-style browser context created
/// at launch, so no cookies or storage survive the run.
pub struct ChromiumRenderer {
    browser: Mutex<Option<Browser>>,
    context_id: BrowserContextId,
    handler_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChromiumRenderer {
    /// Launch a headless Chromium instance with a fresh browser context.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let chrome_path = find_chromium(settings.chromium_path.as_ref()).with_context(|| {
            format!("Chromium not found. Install Chrome or set {CHROMIUM_PATH_ENV}.")
        })?;
        debug!("using Chromium at {}", chrome_path.display());

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let context_id = match browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
        {
            Ok(id) => id,
            Err(e) => {
                let _ = browser.close().await;
                handler_task.abort();
                return Err(e).context("failed to create browser context");
            }
        };

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            context_id,
            handler_task: Mutex::new(Some(handler_task)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let guard = self.browser.lock().await;
        let Some(browser) = guard.as_ref() else {
            bail!("browser already shut down");
        };

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(self.context_id.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build target params: {e}"))?;
        let page = browser
            .new_page(params)
            .await
            .context("failed to create new page")?;

        Ok(Box::new(ChromiumContext { page }))
    }

    async fn shutdown(&self) -> Result<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let _ = browser
            .dispose_browser_context(self.context_id.clone())
            .await;
        let closed = browser.close().await.context("failed to close Chromium");
        let _ = browser.wait().await;

        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }

        closed.map(|_| ())
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResult> {
        let start = Instant::now();

        self.page
            .execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .context("failed to enable lifecycle events")?;
        // Subscribe before navigating so the idle event cannot be missed.
        let mut lifecycle = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .context("failed to subscribe to lifecycle events")?;

        let page = &self.page;
        let wait_idle = async move {
            let nav = page
                .execute(NavigateParams::new(url))
                .await
                .context("navigation failed")?;
            if let Some(err) = nav.result.error_text.as_deref() {
                bail!("navigation failed: {err}");
            }
            let loader = nav.result.loader_id.clone();

            while let Some(event) = lifecycle.next().await {
                let same_load = loader.as_ref().map_or(true, |id| *id == event.loader_id);
                if same_load && event.name == NETWORK_IDLE_EVENT {
                    return Ok(());
                }
            }
            bail!("page closed before reaching network idle")
        };

        match tokio::time::timeout(timeout, wait_idle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => bail!("navigation timed out after {}ms", timeout.as_millis()),
        }

        let final_url = self
            .page
            .url()
            .await
            .unwrap_or_default()
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build evaluate params: {e}"))?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .context("JS execution failed")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert JS result: {e:?}"))
    }

    async fn get_html(&self) -> Result<String> {
        self.page.content().await.context("failed to get HTML")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("failed to close page")
    }
}
