//! Bundled content-blocking extension
//!
//! A minimal declarativeNetRequest extension blocking well-known ad hosts,
//! shipped alongside the code and embedded into the binary. When ad blocking
//! is enabled, the launcher stages these assets into a directory once at
//! construction and loads them into every session it starts.

use std::path::Path;
use tracing::debug;

use crate::error::Result;

pub(crate) const MANIFEST: &str = include_str!("manifest.json");
pub(crate) const RULES: &str = include_str!("rules.json");

/// Write the extension assets into `dir` so the browser can load them as an
/// unpacked extension.
pub(crate) fn stage(dir: &Path) -> Result<()> {
    std::fs::write(dir.join("manifest.json"), MANIFEST)?;
    std::fs::write(dir.join("rules.json"), RULES)?;
    debug!("Staged content-blocking extension at {}", dir.display());
    Ok(())
}
