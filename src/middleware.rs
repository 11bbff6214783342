//! Request-processing hook
//!
//! [`HeadlessMiddleware`] intercepts requests carrying browser directives,
//! drives a freshly launched session through the navigate / cookies / wait /
//! screenshot / script sequence, and returns a [`BrowserResponse`] owning the
//! live session. Requests without directives pass through untouched. There is
//! no retry, no fallback session, and no recovery: any failed step aborts the
//! request and the error reaches the caller as-is.

use tracing::{debug, info, trace};

use crate::config::{HeadlessConfig, Settings};
use crate::error::Result;
use crate::launcher::SessionLauncher;
use crate::request::Request;
use crate::response::BrowserResponse;
use crate::wait;

/// Processing hook delegating request fetches to a browser backend.
#[derive(Debug)]
pub struct HeadlessMiddleware {
    launcher: SessionLauncher,
}

impl HeadlessMiddleware {
    /// Build the middleware from process-wide settings.
    ///
    /// # Errors
    ///
    /// [`HeadlessError::NotConfigured`](crate::HeadlessError::NotConfigured)
    /// when the driver name or executable path is missing, or the driver name
    /// is not a supported backend. Configuration errors are fatal here;
    /// nothing is launched.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(HeadlessConfig::from_settings(settings)?)
    }

    /// Build the middleware from an already-validated configuration.
    pub fn new(config: HeadlessConfig) -> Result<Self> {
        debug!(
            "Headless middleware configured: driver={}, block_ads={}",
            config.driver(),
            config.block_ads()
        );
        Ok(Self {
            launcher: SessionLauncher::new(config)?,
        })
    }

    /// The frozen driver configuration shared by every session.
    #[must_use]
    pub fn config(&self) -> &HeadlessConfig {
        self.launcher.config()
    }

    /// Process one request.
    ///
    /// Returns `Ok(None)` for requests without browser directives — the
    /// pass-through signal telling the surrounding pipeline to fetch the
    /// request through its own stack. For browser requests, performs the full
    /// fetch sequence and returns a response owning the live session; the
    /// caller is responsible for routing that response through
    /// [`finish_response`](Self::finish_response), otherwise the browser
    /// process leaks.
    pub async fn process_request(&self, request: &Request) -> Result<Option<BrowserResponse>> {
        let Some(directives) = request.directives() else {
            trace!("No browser directives, passing through: {}", request.url());
            return Ok(None);
        };

        info!("Fetching through browser: {}", request.url());
        let session = self.launcher.launch().await?;

        session.navigate(request.url()).await?;
        session.set_cookies(request.url(), request.cookies()).await?;

        let wait_timeout = wait::effective_timeout(directives.wait_timeout());
        if let Some(condition) = directives.wait_until() {
            session.wait_until(condition, wait_timeout).await?;
        }

        let screenshot = if directives.screenshot() {
            Some(session.screenshot_png().await?)
        } else {
            None
        };

        if let Some(script) = directives.script() {
            session.execute_script(script).await?;
        }

        let url = session.current_url().await?;
        let body = session.page_html().await?;
        debug!("Browser fetch complete: {url} ({} bytes)", body.len());

        Ok(Some(BrowserResponse::new(
            url,
            body,
            screenshot,
            directives.wait_until().cloned(),
            wait_timeout,
            session,
        )))
    }

    /// Completion step: terminate the session behind `response`.
    ///
    /// Invoked once per response after all of its interaction results have
    /// been processed. A second invocation for the same response fails with
    /// [`HeadlessError::SessionClosed`](crate::HeadlessError::SessionClosed).
    pub async fn finish_response(&self, response: &mut BrowserResponse) -> Result<()> {
        response.close().await
    }
}
