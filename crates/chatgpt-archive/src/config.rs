//! Run configuration.
//!
//! The CLI takes no flags; every run uses [`ArchiveConfig::default`]. The
//! struct exists so the library and its tests can shorten delays or point
//! at a specific browser binary.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "CHATGPT_ARCHIVE_CHROMIUM_PATH";

/// Timing of page acquisition.
#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    /// Upper bound on navigation plus network-idle wait.
    pub navigation_timeout: Duration,
    /// Pixels scrolled per tick of the lazy-load scroll loop.
    pub scroll_step_px: u32,
    /// Delay between scroll ticks.
    pub scroll_interval: Duration,
    /// Quiet period after scrolling before the HTML is read.
    pub settle_delay: Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            scroll_step_px: 300,
            scroll_interval: Duration::from_millis(100),
            settle_delay: Duration::from_secs(1),
        }
    }
}

/// How the headless browser is located.
#[derive(Debug, Clone, Default)]
pub struct BrowserSettings {
    /// Explicit binary; when `None` the usual locations are searched.
    pub chromium_path: Option<PathBuf>,
}

/// Everything a single archive run needs.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub acquisition: AcquisitionSettings,
    pub browser: BrowserSettings,
    /// Per-request timeout for stylesheet GETs.
    pub stylesheet_timeout: Duration,
    /// Directory the snapshot is written into.
    pub output_dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            acquisition: AcquisitionSettings::default(),
            browser: BrowserSettings::default(),
            stylesheet_timeout: Duration::from_secs(10),
            output_dir: PathBuf::from("."),
        }
    }
}
