//! Chromium over the DevTools protocol.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::browser::{BrowserError, BrowserSession};
use crate::config::Config;

/// CDP messages that mean a node id no longer points at a live element.
const DETACHED_NODE_MESSAGES: &[&str] = &[
    "No node with given id",
    "Could not find node with given id",
    "Node is detached",
    "Cannot find context with specified id",
];

/// Find a Chrome or Chromium binary on `PATH`.
pub fn find_chromium() -> Option<PathBuf> {
    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
    nav_timeout: Duration,
}

impl ChromiumSession {
    /// Launch a browser and open one blank tab.
    pub async fn launch(config: &Config) -> Result<Self, BrowserError> {
        let chrome_path = config
            .chrome_path()
            .map(PathBuf::from)
            .or_else(find_chromium)
            .ok_or_else(|| BrowserError::Launch("no Chrome or Chromium executable found".into()))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(1600, 1000)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if !config.headless() {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler has to be polled for the browser to make progress.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("devtools event error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            events,
            nav_timeout: config.timeout(),
        })
    }

    /// Close the browser and stop the event pump.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        let closed = self.browser.close().await;
        self.events.abort();
        closed.map(|_| ()).map_err(protocol_error)
    }

    async fn find(&self, selector: &str) -> Result<Element, BrowserError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| lookup_error(selector, e))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    #[instrument(skip(self))]
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };

        match tokio::time::timeout(self.nav_timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Timeout(self.nav_timeout)),
        }
    }

    #[instrument(skip(self))]
    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| element_error(selector, e))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| element_error(selector, e))?
            .type_str(text)
            .await
            .map_err(|e| element_error(selector, e))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&mut self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        element
            .call_js_fn("function() { this.focus(); this.select(); }", false)
            .await
            .map_err(|e| element_error(selector, e))?;
        element
            .press_key("Backspace")
            .await
            .map_err(|e| element_error(selector, e))?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError> {
        let element = self.find(selector).await?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| element_error(selector, e))?;
        Ok(text.unwrap_or_default())
    }

    async fn current_document(&mut self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(protocol_error)
    }
}

fn is_detached(err: &CdpError) -> bool {
    let message = err.to_string();
    DETACHED_NODE_MESSAGES
        .iter()
        .any(|detached| message.contains(detached))
}

/// Errors while resolving a selector: a missing node means "not rendered".
fn lookup_error(selector: &str, err: CdpError) -> BrowserError {
    if matches!(err, CdpError::NotFound) || is_detached(&err) {
        BrowserError::NotFound(selector.to_string())
    } else {
        protocol_error(err)
    }
}

/// Errors while using a resolved element: a missing node means the page
/// re-rendered underneath it.
fn element_error(selector: &str, err: CdpError) -> BrowserError {
    if is_detached(&err) {
        BrowserError::StaleElement(selector.to_string())
    } else {
        protocol_error(err)
    }
}

fn protocol_error(err: CdpError) -> BrowserError {
    BrowserError::Protocol(err.to_string())
}
