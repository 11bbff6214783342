//! Session launcher
//!
//! Startup options are assembled once, at middleware construction, from the
//! frozen [`HeadlessConfig`]; every [`launch`](SessionLauncher::launch) then
//! starts a new, independent browser from the same options. Sessions are
//! never pooled or reused.

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::adblock;
use crate::config::HeadlessConfig;
use crate::error::{HeadlessError, Result};
use crate::session::BrowserSession;

/// Launches one fresh browser session per request.
#[derive(Debug)]
pub struct SessionLauncher {
    config: HeadlessConfig,
    /// Staging directory for the bundled ad-block extension; lives as long
    /// as the launcher so every session can load it.
    adblock_dir: Option<tempfile::TempDir>,
}

impl SessionLauncher {
    /// Freeze `config` into a launcher, staging the bundled ad-block
    /// extension when enabled.
    pub(crate) fn new(config: HeadlessConfig) -> Result<Self> {
        let adblock_dir = if config.block_ads() {
            let dir = tempfile::Builder::new()
                .prefix("crawl_headless_adblock_")
                .tempdir()?;
            adblock::stage(dir.path())?;
            Some(dir)
        } else {
            None
        };
        Ok(Self {
            config,
            adblock_dir,
        })
    }

    #[must_use]
    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// Start a new, independent browser session with a unique profile.
    pub async fn launch(&self) -> Result<BrowserSession> {
        let profile_dir = create_profile_dir()?;

        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(self.config.request_timeout())
            .user_data_dir(profile_dir.clone())
            .chrome_executable(self.config.launch_executable().to_path_buf());

        builder = if self.config.headless() {
            builder.headless_mode(self.headless_mode())
        } else {
            builder.with_head()
        };

        for arg in self.config.driver().default_arguments() {
            builder = builder.arg(arg);
        }
        for arg in self.config.driver_arguments() {
            builder = builder.arg(arg.clone());
        }

        if let Some(dir) = &self.adblock_dir {
            let ext = dir.path().display();
            builder = builder
                .arg(format!("--disable-extensions-except={ext}"))
                .arg(format!("--load-extension={ext}"));
        } else {
            builder = builder.arg("--disable-extensions");
        }

        let browser_config = builder.build().map_err(HeadlessError::LaunchConfig)?;

        info!(
            "Launching {} session (profile {})",
            self.config.driver(),
            profile_dir.display()
        );
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    error!("Browser handler error: {e:?}");
                }
            }
            debug!("Browser event handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                let _ = std::fs::remove_dir_all(&profile_dir);
                return Err(e.into());
            }
        };

        Ok(BrowserSession::new(browser, handler_task, page, profile_dir))
    }

    /// Headless mode for the session.
    ///
    /// Old headless (pre-132 Chrome) silently ignores `--load-extension`, so
    /// sessions that must carry the content-blocking extension run the new
    /// headless mode instead.
    fn headless_mode(&self) -> HeadlessMode {
        if self.adblock_dir.is_some() {
            HeadlessMode::New
        } else {
            HeadlessMode::default()
        }
    }
}

/// Create a unique profile directory under the system temp dir.
///
/// UUID naming prevents profile lock contention between concurrent sessions.
/// `create_dir` (not `create_dir_all`) fails on collision instead of silently
/// sharing a profile.
fn create_profile_dir() -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("crawl_headless_profile_{}", Uuid::new_v4()));
    std::fs::create_dir(&path)?;
    debug!("Created profile directory {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriverKind;

    #[test]
    fn launcher_without_adblock_stages_nothing() {
        let config = HeadlessConfig::new(DriverKind::Chromium, "/usr/bin/chromium");
        let launcher = SessionLauncher::new(config).expect("launcher builds");
        assert!(launcher.adblock_dir.is_none());
        assert!(!matches!(launcher.headless_mode(), HeadlessMode::New));
    }

    #[test]
    fn adblock_sessions_use_new_headless_mode() {
        // Old headless drops --load-extension, which would turn blocking
        // into a silent no-op.
        let config =
            HeadlessConfig::new(DriverKind::Chromium, "/usr/bin/chromium").with_block_ads(true);
        let launcher = SessionLauncher::new(config).expect("launcher builds");
        assert!(matches!(launcher.headless_mode(), HeadlessMode::New));
    }

    #[test]
    fn launcher_with_adblock_stages_extension() {
        let config =
            HeadlessConfig::new(DriverKind::Chromium, "/usr/bin/chromium").with_block_ads(true);
        let launcher = SessionLauncher::new(config).expect("launcher builds");
        let dir = launcher.adblock_dir.as_ref().expect("extension staged");
        assert!(dir.path().join("manifest.json").is_file());
        assert!(dir.path().join("rules.json").is_file());
    }

    #[test]
    fn profile_dirs_are_unique() {
        let a = create_profile_dir().expect("first profile");
        let b = create_profile_dir().expect("second profile");
        assert_ne!(a, b);
        let _ = std::fs::remove_dir_all(&a);
        let _ = std::fs::remove_dir_all(&b);
    }
}
