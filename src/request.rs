//! Request types handed to the middleware
//!
//! A [`Request`] is the pipeline-native fetch request; attaching
//! [`BrowserDirectives`] marks it for browser processing. Directives are
//! inert on their own — a request without them passes through the middleware
//! untouched.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::wait::WaitUntil;

/// A fetch request, optionally augmented with browser directives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    url: String,
    cookies: Vec<(String, String)>,
    browser: Option<BrowserDirectives>,
}

impl Request {
    /// Create a plain request with no browser directives.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cookies: Vec::new(),
            browser: None,
        }
    }

    /// Create a request that the middleware will fetch through a browser,
    /// with default directives (no wait, no screenshot, no script).
    #[must_use]
    pub fn browser(url: impl Into<String>) -> Self {
        Self::new(url).with_directives(BrowserDirectives::default())
    }

    /// Attach browser directives, marking the request for the middleware.
    #[must_use]
    pub fn with_directives(mut self, directives: BrowserDirectives) -> Self {
        self.browser = Some(directives);
        self
    }

    /// Attach a cookie to copy into the browser session after navigation.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Browser directives, when this request is marked for browser fetch.
    #[must_use]
    pub fn directives(&self) -> Option<&BrowserDirectives> {
        self.browser.as_ref()
    }
}

/// Per-request browser directives.
///
/// Defaults are fully inert: no wait condition, no screenshot, no script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserDirectives {
    pub(crate) wait_until: Option<WaitUntil>,
    pub(crate) wait_timeout: Option<Duration>,
    pub(crate) screenshot: bool,
    pub(crate) script: Option<String>,
}

impl BrowserDirectives {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Block after navigation until the condition holds, bounded by the
    /// wait timeout.
    #[must_use]
    pub fn with_wait_until(mut self, condition: WaitUntil) -> Self {
        self.wait_until = Some(condition);
        self
    }

    /// Bound for the wait condition; [`crate::wait::DEFAULT_WAIT_TIMEOUT`]
    /// when unset, capped at [`crate::wait::MAX_WAIT_TIMEOUT`].
    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Capture a PNG screenshot of the loaded page and attach it to the
    /// response.
    #[must_use]
    pub fn with_screenshot(mut self) -> Self {
        self.screenshot = true;
        self
    }

    /// Execute a script in the page context after navigation and waits.
    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    #[must_use]
    pub fn wait_until(&self) -> Option<&WaitUntil> {
        self.wait_until.as_ref()
    }

    #[must_use]
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }

    #[must_use]
    pub fn screenshot(&self) -> bool {
        self.screenshot
    }

    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_request_carries_no_directives() {
        let request = Request::new("https://example.com");
        assert!(request.directives().is_none());
    }

    #[test]
    fn default_directives_are_inert() {
        let request = Request::browser("https://example.com");
        let directives = request.directives().expect("directives attached");
        assert!(directives.wait_until().is_none());
        assert!(directives.wait_timeout().is_none());
        assert!(!directives.screenshot());
        assert!(directives.script().is_none());
    }

    #[test]
    fn cookies_preserve_insertion_order() {
        let request = Request::browser("https://example.com")
            .with_cookie("a", "1")
            .with_cookie("b", "2");
        let names: Vec<&str> = request.cookies().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
