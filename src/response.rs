//! Browser-backed response
//!
//! A [`BrowserResponse`] is the page snapshot returned by the middleware plus
//! the owned live session behind it. The snapshot (URL, body) is refreshed by
//! [`click`](BrowserResponse::click); the session is released exactly once by
//! [`close`](BrowserResponse::close) or the middleware's completion step.

use scraper::Html;
use std::time::Duration;

use crate::error::{HeadlessError, Result};
use crate::selector::Locator;
use crate::session::BrowserSession;
use crate::wait::WaitUntil;

/// Encoding of every body produced by the middleware.
pub const RESPONSE_ENCODING: &str = "utf-8";

/// A rendered page snapshot owning the live browser session behind it.
#[derive(Debug)]
pub struct BrowserResponse {
    url: String,
    body: String,
    screenshot: Option<Vec<u8>>,
    /// Wait directive inherited from the originating request, re-applied
    /// after click interactions.
    wait_until: Option<WaitUntil>,
    wait_timeout: Duration,
    session: Option<BrowserSession>,
}

impl BrowserResponse {
    pub(crate) fn new(
        url: String,
        body: String,
        screenshot: Option<Vec<u8>>,
        wait_until: Option<WaitUntil>,
        wait_timeout: Duration,
        session: BrowserSession,
    ) -> Self {
        Self {
            url,
            body,
            screenshot,
            wait_until,
            wait_timeout,
            session: Some(session),
        }
    }

    /// Final (possibly redirected) URL of the snapshot.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Rendered page markup.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    #[must_use]
    pub fn encoding(&self) -> &'static str {
        RESPONSE_ENCODING
    }

    /// PNG screenshot, when the originating request asked for one.
    #[must_use]
    pub fn screenshot(&self) -> Option<&[u8]> {
        self.screenshot.as_deref()
    }

    /// The live session, while it has not been closed.
    #[must_use]
    pub fn session(&self) -> Option<&BrowserSession> {
        self.session.as_ref()
    }

    /// Parse the body for structured extraction.
    #[must_use]
    pub fn parsed(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Click the element matched by `query` and reload the snapshot from the
    /// post-click page state.
    ///
    /// The query is CSS when it parses as a selector, raw XPath otherwise.
    /// When the originating request carried a wait condition it is re-applied
    /// (bounded by its timeout) before the snapshot is refreshed.
    ///
    /// # Errors
    ///
    /// [`HeadlessError::ElementNotFound`] when nothing matches,
    /// [`HeadlessError::WaitTimeout`] when the condition never holds, and
    /// [`HeadlessError::SessionClosed`] after the completion step has run.
    pub async fn click(&mut self, query: &str) -> Result<()> {
        let session = self.session.as_ref().ok_or(HeadlessError::SessionClosed)?;

        session.click(&Locator::parse(query)).await?;
        if let Some(condition) = &self.wait_until {
            session.wait_until(condition, self.wait_timeout).await?;
        }

        self.url = session.current_url().await?;
        self.body = session.page_html().await?;
        Ok(())
    }

    /// Terminate the session. Must be called exactly once; a second call
    /// fails with [`HeadlessError::SessionClosed`].
    pub async fn close(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Err(HeadlessError::SessionClosed),
        }
    }
}
