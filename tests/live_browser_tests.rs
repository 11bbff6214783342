//! End-to-end tests driving a real browser.
//!
//! Ignored by default: they need a local Chromium/Chrome install (point
//! `CHROMIUM_PATH` at one) and spawn real browser processes. Run with
//! `cargo test -- --ignored`.

use anyhow::Result;
use crawl_headless::config::BLOCK_ADS_KEY;
use crawl_headless::{
    BrowserDirectives, BrowserResponse, HeadlessError, HeadlessMiddleware, Request, WaitUntil,
};
use scraper::Selector;

mod common;

fn middleware() -> HeadlessMiddleware {
    common::init_tracing();
    let settings = common::chromium_settings()
        .expect("no Chromium install found; set CHROMIUM_PATH");
    HeadlessMiddleware::from_settings(&settings).expect("middleware builds")
}

/// Inline page so the tests stay off the network.
fn data_url(html: &str) -> String {
    format!("data:text/html,{}", urlencoding(html))
}

fn urlencoding(html: &str) -> String {
    html.replace('%', "%25").replace('#', "%23")
}

async fn fetch(middleware: &HeadlessMiddleware, request: &Request) -> Result<BrowserResponse> {
    let response = middleware.process_request(request).await?;
    Ok(response.expect("browser request produces a response"))
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn bare_fetch_returns_rendered_markup_and_live_session() -> Result<()> {
    let middleware = middleware();
    let request = Request::browser(data_url("<h1 id='greeting'>hello</h1>"));

    let mut response = fetch(&middleware, &request).await?;
    assert!(response.session().is_some());
    assert!(response.body().contains("greeting"));
    assert_eq!(response.encoding(), "utf-8");

    middleware.finish_response(&mut response).await?;
    assert!(response.session().is_none());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install and network access"]
async fn request_cookies_are_visible_in_the_session() -> Result<()> {
    let middleware = middleware();
    // Cookies need an http(s) origin; data: URLs cannot carry them.
    let request = Request::browser("https://example.com").with_cookie("session_id", "abc123");

    let mut response = fetch(&middleware, &request).await?;
    let session = response.session().expect("session is live");
    assert_eq!(
        session.cookie("session_id").await?.as_deref(),
        Some("abc123")
    );

    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn screenshot_is_attached_only_when_requested() -> Result<()> {
    let middleware = middleware();
    let url = data_url("<p>screenshot me</p>");

    let request =
        Request::browser(&url).with_directives(BrowserDirectives::new().with_screenshot());
    let mut response = fetch(&middleware, &request).await?;
    let png = response.screenshot().expect("screenshot attached");
    // PNG magic bytes.
    assert_eq!(&png[..4], b"\x89PNG");
    middleware.finish_response(&mut response).await?;

    let request = Request::browser(&url);
    let mut response = fetch(&middleware, &request).await?;
    assert!(response.screenshot().is_none());
    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn script_runs_after_the_wait_condition() -> Result<()> {
    let middleware = middleware();
    let request = Request::browser(data_url("<div id='target'>before</div>")).with_directives(
        BrowserDirectives::new()
            .with_wait_until(WaitUntil::ElementPresent("#target".into()))
            .with_script("document.getElementById('target').textContent = 'after'"),
    );

    let mut response = fetch(&middleware, &request).await?;
    let session = response.session().expect("session is live");
    let html = session.page_html().await?;
    assert!(html.contains("after"));

    let parsed = response.parsed();
    let selector = Selector::parse("#target").expect("valid selector");
    assert!(parsed.select(&selector).next().is_some());

    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn click_reloads_the_snapshot() -> Result<()> {
    let middleware = middleware();
    let page = "<button id='more' \
         onclick=\"document.body.insertAdjacentHTML('beforeend', '<p class=loaded>extra</p>')\">\
         load more</button>";
    let request = Request::browser(data_url(page));

    let mut response = fetch(&middleware, &request).await?;
    assert!(!response.body().contains("loaded"));

    response.click("#more").await?;
    assert!(response.body().contains("loaded"));

    // An XPath query against the same button works through the fallback path.
    response.click("//button[@id='more']").await?;

    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn click_on_missing_element_fails() -> Result<()> {
    let middleware = middleware();
    let request = Request::browser(data_url("<p>nothing to click</p>"));

    let mut response = fetch(&middleware, &request).await?;
    let err = response.click("#absent").await.unwrap_err();
    assert!(matches!(err, HeadlessError::ElementNotFound(_)));

    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn wait_condition_that_never_holds_times_out() -> Result<()> {
    let middleware = middleware();
    let request = Request::browser(data_url("<p>static page</p>")).with_directives(
        BrowserDirectives::new()
            .with_wait_until(WaitUntil::ElementPresent("#never".into()))
            .with_wait_timeout(std::time::Duration::from_secs(2)),
    );

    let err = middleware.process_request(&request).await.unwrap_err();
    assert!(matches!(err, HeadlessError::WaitTimeout { .. }));
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install and network access"]
async fn ad_blocking_stops_known_ad_hosts_from_loading() -> Result<()> {
    common::init_tracing();
    let settings = common::chromium_settings()
        .expect("no Chromium install found; set CHROMIUM_PATH")
        .with(BLOCK_ADS_KEY, true);
    let middleware = HeadlessMiddleware::from_settings(&settings)?;
    assert!(middleware.config().block_ads());

    // The image points at a host on the bundled block list; the extension
    // must fail the load, firing onerror instead of onload.
    let page = "<img src='https://ad.doubleclick.net/pixel.gif' \
         onerror=\"document.title='blocked'\" onload=\"document.title='loaded'\">";
    let request = Request::browser(data_url(page)).with_directives(
        BrowserDirectives::new()
            .with_wait_until(WaitUntil::TitleContains("blocked".into()))
            .with_wait_timeout(std::time::Duration::from_secs(10)),
    );

    let mut response = fetch(&middleware, &request).await?;
    middleware.finish_response(&mut response).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local Chromium/Chrome install"]
async fn session_is_closed_exactly_once() -> Result<()> {
    let middleware = middleware();
    let request = Request::browser(data_url("<p>close me</p>"));

    let mut response = fetch(&middleware, &request).await?;
    middleware.finish_response(&mut response).await?;

    // Interaction and a second close both fail once the session is gone.
    assert!(matches!(
        response.click("p").await.unwrap_err(),
        HeadlessError::SessionClosed
    ));
    assert!(matches!(
        response.close().await.unwrap_err(),
        HeadlessError::SessionClosed
    ));
    Ok(())
}
