//! Driver configuration types
//!
//! [`HeadlessConfig`] is derived once from process-wide [`Settings`] and is
//! immutable afterwards; every browser session launched by one middleware
//! instance shares it read-only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::settings::{
    BLOCK_ADS_KEY, BROWSER_EXECUTABLE_KEY, DRIVER_ARGUMENTS_KEY, DRIVER_EXECUTABLE_KEY,
    DRIVER_NAME_KEY, Settings,
};
use crate::error::{HeadlessError, Result};

/// Reserved startup-argument token that enables the bundled ad blocker.
///
/// Kept for compatibility with argument lists written against the older
/// token-based toggle; it is stripped before arguments are forwarded to the
/// backend. [`BLOCK_ADS_KEY`] is the first-class way to enable blocking.
pub const BLOCK_ADS_TOKEN: &str = "--block-ads";

/// Closed set of supported browser backends.
///
/// Backend selection is resolved here, at configuration-validation time; an
/// unknown name fails construction instead of failing at first launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Chromium,
    Chrome,
    Brave,
}

impl DriverKind {
    /// Default launch arguments for this backend.
    ///
    /// Container sandbox and automation-stealth arguments shared by all
    /// Chromium-family backends; Brave additionally disables its built-in
    /// shields extension so it cannot interfere with page content.
    #[must_use]
    pub fn default_arguments(self) -> Vec<&'static str> {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-blink-features=AutomationControlled",
            "--no-first-run",
            "--no-default-browser-check",
            "--window-size=1920,1080",
            "--disable-background-timer-throttling",
            "--disable-backgrounding-occluded-windows",
            "--disable-renderer-backgrounding",
            "--mute-audio",
        ];
        if self == Self::Brave {
            args.push("--disable-brave-extension");
        }
        args
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Chrome => "chrome",
            Self::Brave => "brave",
        }
    }
}

impl FromStr for DriverKind {
    type Err = HeadlessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "chrome" => Ok(Self::Chrome),
            "brave" => Ok(Self::Brave),
            other => Err(HeadlessError::NotConfigured(format!(
                "unsupported driver name {other:?} (supported: chromium, chrome, brave)"
            ))),
        }
    }
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable driver configuration shared by every session launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessConfig {
    pub(crate) driver: DriverKind,
    pub(crate) driver_executable: PathBuf,
    pub(crate) browser_executable: Option<PathBuf>,
    pub(crate) driver_arguments: Vec<String>,
    pub(crate) block_ads: bool,
    pub(crate) headless: bool,
    pub(crate) request_timeout_secs: u64,
}

impl HeadlessConfig {
    /// Build a configuration from process-wide settings.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::NotConfigured`] when the driver name or
    /// executable path is absent, or when the driver name is not one of the
    /// supported backends.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let driver_name = settings.get_str(DRIVER_NAME_KEY).ok_or_else(|| {
            HeadlessError::NotConfigured(format!("{DRIVER_NAME_KEY} must be set"))
        })?;
        let driver = driver_name.parse::<DriverKind>()?;

        let driver_executable = settings.get_path(DRIVER_EXECUTABLE_KEY).ok_or_else(|| {
            HeadlessError::NotConfigured(format!("{DRIVER_EXECUTABLE_KEY} must be set"))
        })?;

        let mut config = Self::new(driver, driver_executable);
        if let Some(path) = settings.get_path(BROWSER_EXECUTABLE_KEY) {
            config.browser_executable = Some(path);
        }
        if let Some(args) = settings.get_str_list(DRIVER_ARGUMENTS_KEY) {
            config = config.with_arguments(args);
        }
        if let Some(block) = settings.get_bool(BLOCK_ADS_KEY) {
            config.block_ads = config.block_ads || block;
        }
        Ok(config)
    }

    /// Create a configuration directly from a driver kind and its binary.
    #[must_use]
    pub fn new(driver: DriverKind, driver_executable: impl Into<PathBuf>) -> Self {
        Self {
            driver,
            driver_executable: driver_executable.into(),
            browser_executable: None,
            driver_arguments: Vec::new(),
            block_ads: false,
            headless: true,
            request_timeout_secs: 30,
        }
    }

    /// Set the startup arguments forwarded to the backend.
    ///
    /// The reserved [`BLOCK_ADS_TOKEN`] is recognized here: it toggles the
    /// ad-block flag and is stripped so it is never forwarded as a literal
    /// argument.
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = String>) -> Self {
        self.driver_arguments.clear();
        for argument in arguments {
            if argument == BLOCK_ADS_TOKEN {
                self.block_ads = true;
            } else {
                self.driver_arguments.push(argument);
            }
        }
        self
    }

    /// Override which browser binary the backend launches.
    #[must_use]
    pub fn with_browser_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.browser_executable = Some(path.into());
        self
    }

    /// Enable or disable the bundled content-blocking extension.
    #[must_use]
    pub fn with_block_ads(mut self, block_ads: bool) -> Self {
        self.block_ads = block_ads;
        self
    }

    /// Run the browser with a visible window instead of headless.
    #[must_use]
    pub fn with_head(mut self) -> Self {
        self.headless = false;
        self
    }

    #[must_use]
    pub fn driver(&self) -> DriverKind {
        self.driver
    }

    #[must_use]
    pub fn driver_executable(&self) -> &std::path::Path {
        &self.driver_executable
    }

    #[must_use]
    pub fn browser_executable(&self) -> Option<&std::path::Path> {
        self.browser_executable.as_deref()
    }

    #[must_use]
    pub fn driver_arguments(&self) -> &[String] {
        &self.driver_arguments
    }

    #[must_use]
    pub fn block_ads(&self) -> bool {
        self.block_ads
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    /// CDP request timeout applied to every session.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The binary actually launched: the browser override when present,
    /// otherwise the driver executable itself.
    #[must_use]
    pub(crate) fn launch_executable(&self) -> &std::path::Path {
        self.browser_executable
            .as_deref()
            .unwrap_or(&self.driver_executable)
    }
}
