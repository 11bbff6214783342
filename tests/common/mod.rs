//! Shared helpers for integration tests.

#![allow(dead_code)]

use crawl_headless::config::{
    DRIVER_EXECUTABLE_KEY, DRIVER_NAME_KEY, Settings,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Route crate logs through `RUST_LOG` while live tests run.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Locate a Chromium/Chrome binary for live-browser tests.
///
/// `CHROMIUM_PATH` overrides the search; otherwise common install locations
/// are probed.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let candidates = [
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/snap/bin/chromium",
        "/opt/google/chrome/chrome",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Settings pointing at a locally installed Chromium, when one exists.
pub fn chromium_settings() -> Option<Settings> {
    let chromium = find_chromium()?;
    Some(
        Settings::new()
            .with(DRIVER_NAME_KEY, "chromium")
            .with(DRIVER_EXECUTABLE_KEY, chromium.to_string_lossy().as_ref()),
    )
}
