//! Error surface for the headless fetch shim.
//!
//! Backend (CDP) failures are wrapped but never translated or retried; a
//! failed step aborts the remaining steps for that request and the error
//! reaches the caller as-is.

use std::time::Duration;

/// Errors produced while configuring the middleware or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    /// A required setting is missing or invalid. Fatal at middleware
    /// construction; nothing is launched.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The startup options could not be assembled into a launchable
    /// browser configuration.
    #[error("failed to build browser launch config: {0}")]
    LaunchConfig(String),

    /// An error raised by the browser-automation backend (session start,
    /// navigation, script execution). Propagated untranslated.
    #[error("browser backend error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// A wait condition was never satisfied within its bound.
    #[error("wait condition {condition} not met within {timeout:?}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
    },

    /// The interaction selector matched no element on the live page.
    #[error("no element matched selector {0:?}")]
    ElementNotFound(String),

    /// The live session behind a response has already been closed.
    #[error("browser session already closed")]
    SessionClosed,

    /// The request URL could not be parsed.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request cookie could not be converted into a backend cookie.
    #[error("invalid cookie {name:?}: {reason}")]
    InvalidCookie { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HeadlessError>;
