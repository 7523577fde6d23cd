//! Browser control.
//!
//! [`BrowserSession`] is the only way the rest of the crate touches a page.
//! Elements are addressed by CSS selector and resolved fresh on every call,
//! so no element handle outlives a single operation.

pub mod chromium;
pub mod errors;

use async_trait::async_trait;

pub use chromium::{ChromiumSession, find_chromium};
pub use errors::BrowserError;

/// One exclusively owned browser tab.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` and wait for the navigation to finish.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Focus the element and type `text` into it.
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Empty a text input.
    async fn clear(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Visible text of the first element matching `selector`.
    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError>;

    /// HTML of the page as currently rendered.
    async fn current_document(&mut self) -> Result<String, BrowserError>;
}
