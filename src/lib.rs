//! Delegate crawl-pipeline request fetches to a real headless browser.
//!
//! This crate is an integration shim between a crawling pipeline and a
//! browser-automation backend (`chromiumoxide`). A [`Request`] augmented with
//! [`BrowserDirectives`] is fetched through a freshly launched browser
//! session instead of a plain HTTP client; the resulting [`BrowserResponse`]
//! carries the rendered markup plus the live [`BrowserSession`] for further
//! interaction (clicks, script execution) before the session is torn down.
//!
//! ```rust,no_run
//! use crawl_headless::{
//!     config::{DRIVER_EXECUTABLE_KEY, DRIVER_NAME_KEY, Settings},
//!     BrowserDirectives, HeadlessMiddleware, Request, WaitUntil,
//! };
//!
//! # async fn run() -> crawl_headless::Result<()> {
//! let settings = Settings::new()
//!     .with(DRIVER_NAME_KEY, "chromium")
//!     .with(DRIVER_EXECUTABLE_KEY, "/usr/bin/chromium");
//! let middleware = HeadlessMiddleware::from_settings(&settings)?;
//!
//! let request = Request::browser("https://example.com").with_directives(
//!     BrowserDirectives::new().with_wait_until(WaitUntil::ElementPresent("h1".into())),
//! );
//!
//! if let Some(mut response) = middleware.process_request(&request).await? {
//!     println!("{}", response.body());
//!     middleware.finish_response(&mut response).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! One request gets one session; sessions are never pooled, reused, or
//! shared, and a response that is never routed through the completion step
//! leaks its browser process.

pub(crate) mod adblock;
pub mod config;
pub mod error;
pub mod launcher;
pub mod middleware;
pub mod request;
pub mod response;
pub mod selector;
pub mod session;
pub mod wait;

pub use config::{DriverKind, HeadlessConfig, Settings};
pub use error::{HeadlessError, Result};
pub use launcher::SessionLauncher;
pub use middleware::HeadlessMiddleware;
pub use request::{BrowserDirectives, Request};
pub use response::{BrowserResponse, RESPONSE_ENCODING};
pub use selector::Locator;
pub use session::BrowserSession;
pub use wait::{DEFAULT_WAIT_TIMEOUT, MAX_WAIT_TIMEOUT, WaitUntil};
