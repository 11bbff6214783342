//! Live browser session owned by a response
//!
//! A [`BrowserSession`] owns one launched browser process, its CDP
//! event-handler task, one page, and the temp profile directory backing the
//! process. Exactly one response owns one session; the session must be closed
//! exactly once via [`BrowserResponse::close`](crate::BrowserResponse::close)
//! or the middleware's completion step. A dropped-but-unclosed session aborts
//! its handler and removes its profile, but does not await graceful browser
//! exit — routing every response through the completion step is the caller's
//! resource contract.

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{HeadlessError, Result};
use crate::selector::Locator;
use crate::wait::{self, WaitUntil};

/// One launched browser: process, event-handler task, page, temp profile.
#[derive(Debug)]
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    profile_dir: Option<PathBuf>,
}

impl BrowserSession {
    pub(crate) fn new(
        browser: Browser,
        handler: JoinHandle<()>,
        page: Page,
        profile_dir: PathBuf,
    ) -> Self {
        Self {
            browser,
            handler,
            page,
            profile_dir: Some(profile_dir),
        }
    }

    /// The live page, for direct interaction beyond what the response
    /// helpers cover.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate to `url` and wait for the load to settle.
    pub(crate) async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {url}");
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Copy request cookies into the session, scoped to the request URL.
    pub(crate) async fn set_cookies(
        &self,
        url: &str,
        cookies: &[(String, String)],
    ) -> Result<()> {
        if cookies.is_empty() {
            return Ok(());
        }
        let url = Url::parse(url)?;
        for (name, value) in cookies {
            let param = CookieParam::builder()
                .name(name.clone())
                .value(value.clone())
                .url(url.as_str())
                .build()
                .map_err(|reason| HeadlessError::InvalidCookie {
                    name: name.clone(),
                    reason,
                })?;
            self.page.set_cookie(param).await?;
        }
        debug!("Copied {} cookies into session", cookies.len());
        Ok(())
    }

    /// Read back a cookie value by name from the live session.
    pub async fn cookie(&self, name: &str) -> Result<Option<String>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value))
    }

    /// Block until `condition` holds, bounded by `timeout`.
    pub async fn wait_until(&self, condition: &WaitUntil, timeout: Duration) -> Result<()> {
        wait::wait_for(&self.page, condition, timeout).await
    }

    /// Capture the current page as a PNG.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        let params = CaptureScreenshotParams {
            format: Some(CaptureScreenshotFormat::Png),
            ..Default::default()
        };
        Ok(self.page.screenshot(params).await?)
    }

    /// Execute a script in the page context, discarding its result.
    pub async fn execute_script(&self, script: &str) -> Result<()> {
        self.page.evaluate(script).await?;
        Ok(())
    }

    /// The current (possibly redirected) page URL.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// The full current page markup.
    pub async fn page_html(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    /// Locate an element and click it.
    ///
    /// CSS queries go through the backend's element lookup; XPath queries are
    /// resolved and clicked in the page context. Either way, a query matching
    /// no element fails with [`HeadlessError::ElementNotFound`]; other
    /// backend failures propagate untranslated.
    pub(crate) async fn click(&self, locator: &Locator) -> Result<()> {
        match locator {
            Locator::Css(query) => {
                // Existence is probed in the page context first so that only
                // a genuine no-match becomes ElementNotFound; transport and
                // session failures from the lookup keep their own error.
                let exists = self.page.evaluate(locator.exists_script()).await?;
                if !exists.into_value::<bool>().unwrap_or(false) {
                    return Err(HeadlessError::ElementNotFound(query.clone()));
                }
                let element = self.page.find_element(query.as_str()).await?;
                element.click().await?;
            }
            Locator::XPath(query) => {
                let result = self.page.evaluate(locator.click_script()).await?;
                if !result.into_value::<bool>().unwrap_or(false) {
                    return Err(HeadlessError::ElementNotFound(query.clone()));
                }
            }
        }
        debug!("Clicked element {:?}", locator.query());
        Ok(())
    }

    /// Terminate the browser and release the session's resources.
    ///
    /// Waits for the process to exit before removing the profile directory,
    /// so the browser has released its file handles.
    pub(crate) async fn close(mut self) -> Result<()> {
        info!("Closing browser session");
        let close_result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler.abort();
        self.cleanup_profile();
        close_result?;
        Ok(())
    }

    fn cleanup_profile(&mut self) {
        if let Some(path) = self.profile_dir.take() {
            debug!("Removing profile directory {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove profile directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if self.profile_dir.is_some() {
            warn!("BrowserSession dropped without close; removing profile in Drop");
            self.cleanup_profile();
        }
    }
}
