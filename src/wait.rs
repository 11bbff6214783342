//! Wait conditions polled against a live page
//!
//! A [`WaitUntil`] is a predicate over session state. After navigation (and
//! again after a click interaction) the middleware polls the condition every
//! [`POLL_INTERVAL`] until it holds or the effective timeout elapses, at which
//! point the wait fails with [`HeadlessError::WaitTimeout`].

use chromiumoxide::page::Page;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::error::{HeadlessError, Result};
use crate::selector::Locator;

/// Timeout applied when a request specifies a wait condition but no bound.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on any wait bound; requested timeouts above this are clamped.
pub const MAX_WAIT_TIMEOUT: Duration = Duration::from_secs(40);

/// Interval between condition polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A condition the backend polls until true or until the bound elapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitUntil {
    /// An element matching the selector (CSS, or raw XPath fallback) exists.
    ElementPresent(String),
    /// The current page URL contains the substring.
    UrlContains(String),
    /// The document title contains the substring.
    TitleContains(String),
    /// A script evaluated in the page context yields a truthy value.
    Script(String),
}

impl WaitUntil {
    /// Evaluate the condition once against the live page.
    ///
    /// Backend evaluation errors propagate; they are not treated as
    /// "condition not met".
    pub(crate) async fn poll(&self, page: &Page) -> Result<bool> {
        match self {
            Self::ElementPresent(query) => {
                let script = Locator::parse(query).exists_script();
                let result = page.evaluate(script).await?;
                Ok(result.into_value::<bool>().unwrap_or(false))
            }
            Self::UrlContains(fragment) => {
                let url = page.url().await?.unwrap_or_default();
                Ok(url.contains(fragment))
            }
            Self::TitleContains(fragment) => {
                let result = page.evaluate("document.title").await?;
                let title = result.into_value::<String>().unwrap_or_default();
                Ok(title.contains(fragment))
            }
            Self::Script(script) => {
                let result = page.evaluate(script.as_str()).await?;
                let value = result
                    .into_value::<serde_json::Value>()
                    .unwrap_or(serde_json::Value::Null);
                Ok(truthy(&value))
            }
        }
    }

    /// Short description used in timeout errors and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ElementPresent(query) => format!("element_present({query:?})"),
            Self::UrlContains(fragment) => format!("url_contains({fragment:?})"),
            Self::TitleContains(fragment) => format!("title_contains({fragment:?})"),
            Self::Script(_) => "script".to_string(),
        }
    }
}

/// Resolve the effective wait bound: default when unspecified, clamped at
/// the maximum otherwise.
#[must_use]
pub fn effective_timeout(requested: Option<Duration>) -> Duration {
    match requested {
        None => DEFAULT_WAIT_TIMEOUT,
        Some(t) if t > MAX_WAIT_TIMEOUT => MAX_WAIT_TIMEOUT,
        Some(t) => t,
    }
}

/// Poll `condition` against `page` until it holds or `timeout` elapses.
pub(crate) async fn wait_for(page: &Page, condition: &WaitUntil, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    debug!("Waiting up to {timeout:?} for {}", condition.describe());

    loop {
        if condition.poll(page).await? {
            debug!(
                "Condition {} met after {:?}",
                condition.describe(),
                start.elapsed()
            );
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(HeadlessError::WaitTimeout {
                condition: condition.describe(),
                timeout,
            });
        }

        let remaining = timeout - elapsed;
        trace!("Condition not met, {remaining:?} remaining");
        tokio::time::sleep(POLL_INTERVAL.min(remaining)).await;
    }
}

/// JavaScript truthiness over a JSON evaluation result.
fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_timeout_defaults_and_clamps() {
        assert_eq!(effective_timeout(None), DEFAULT_WAIT_TIMEOUT);
        assert_eq!(
            effective_timeout(Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
        assert_eq!(
            effective_timeout(Some(Duration::from_secs(120))),
            MAX_WAIT_TIMEOUT
        );
    }

    #[test]
    fn truthiness_follows_javascript_rules() {
        assert!(!truthy(&serde_json::json!(null)));
        assert!(!truthy(&serde_json::json!(false)));
        assert!(!truthy(&serde_json::json!(0)));
        assert!(!truthy(&serde_json::json!("")));
        assert!(truthy(&serde_json::json!("ready")));
        assert!(truthy(&serde_json::json!(1)));
        assert!(truthy(&serde_json::json!({})));
    }

    #[test]
    fn describe_omits_script_bodies() {
        let condition = WaitUntil::Script("document.readyState === 'complete'".into());
        assert_eq!(condition.describe(), "script");
    }
}
