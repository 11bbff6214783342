//! Selector classification for interaction and wait queries
//!
//! Callers pass a single query string that may be a CSS selector or a raw
//! XPath expression. A query is treated as CSS when `scraper` can parse it;
//! anything it rejects is used verbatim as XPath. Both forms compile to small
//! page-context scripts so existence checks and clicks behave identically for
//! either syntax.

use scraper::Selector;

/// A classified element query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    /// Classify a query: CSS when it parses as a selector, XPath otherwise.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        if Selector::parse(query).is_ok() {
            Self::Css(query.to_string())
        } else {
            Self::XPath(query.to_string())
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Css(q) | Self::XPath(q) => q,
        }
    }

    /// Script returning `true` when at least one element matches.
    #[must_use]
    pub(crate) fn exists_script(&self) -> String {
        match self {
            Self::Css(q) => format!(
                "(function() {{ try {{ return document.querySelector({}) !== null; }} \
                 catch (e) {{ return false; }} }})()",
                js_string(q)
            ),
            Self::XPath(q) => format!(
                "(function() {{ try {{ return document.evaluate({}, document, null, \
                 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue !== null; }} \
                 catch (e) {{ return false; }} }})()",
                js_string(q)
            ),
        }
    }

    /// Script that clicks the first matching element, returning `true` when
    /// one was found.
    #[must_use]
    pub(crate) fn click_script(&self) -> String {
        let lookup = match self {
            Self::Css(q) => format!("document.querySelector({})", js_string(q)),
            Self::XPath(q) => format!(
                "document.evaluate({}, document, null, \
                 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(q)
            ),
        };
        format!(
            "(function() {{ const el = {lookup}; if (el === null) return false; \
             el.click(); return true; }})()"
        )
    }
}

/// Embed a Rust string as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "''".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_queries_are_classified_as_css() {
        assert_eq!(
            Locator::parse("div.results > a#first"),
            Locator::Css("div.results > a#first".into())
        );
        assert_eq!(Locator::parse("body"), Locator::Css("body".into()));
    }

    #[test]
    fn non_css_queries_fall_back_to_xpath() {
        let query = r#"//*[@id="scr-res-table"]/div[1]/table/thead/tr/th[6]"#;
        assert_eq!(Locator::parse(query), Locator::XPath(query.into()));
        assert_eq!(
            Locator::parse("//a[text()='next']"),
            Locator::XPath("//a[text()='next']".into())
        );
    }

    #[test]
    fn scripts_escape_embedded_quotes() {
        let locator = Locator::parse(r#"a[title="it's here"]"#);
        let script = locator.exists_script();
        assert!(script.contains(r#"\"it's here\""#));
        assert!(!script.contains("\n"));
    }
}
