use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::browser::{BrowserError, BrowserSession};
use crate::wait::watcher::ChangeWatcher;

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("timed out after {waited:?} waiting for {target}")]
    Timeout { target: String, waited: Duration },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// How long to keep polling and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Something a polling loop can ask "are we there yet?".
#[async_trait]
pub trait Condition: Send {
    async fn satisfied(&mut self, browser: &mut dyn BrowserSession) -> Result<bool, BrowserError>;

    /// Human-readable target, used in timeout errors.
    fn describe(&self) -> String;
}

/// Satisfied once an element matching the selector exists.
#[derive(Debug, Clone)]
pub struct ElementPresent {
    selector: String,
}

impl ElementPresent {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl Condition for ElementPresent {
    async fn satisfied(&mut self, browser: &mut dyn BrowserSession) -> Result<bool, BrowserError> {
        match browser.read_text(&self.selector).await {
            Ok(_) => Ok(true),
            Err(BrowserError::NotFound(_) | BrowserError::StaleElement(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn describe(&self) -> String {
        format!("element {:?}", self.selector)
    }
}

/// Check `condition` every `policy.interval` until it holds or
/// `policy.timeout` has passed. Always checks at least once.
pub async fn poll_until(
    browser: &mut dyn BrowserSession,
    condition: &mut dyn Condition,
    policy: &PollPolicy,
) -> Result<(), WaitError> {
    let started = Instant::now();
    let mut polls = 0_u32;

    loop {
        polls += 1;
        if condition.satisfied(browser).await? {
            debug!(polls, elapsed = ?started.elapsed(), "condition met");
            return Ok(());
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(WaitError::Timeout {
                target: condition.describe(),
                waited,
            });
        }
        sleep(policy.interval.min(policy.timeout - waited)).await;
    }
}

/// Wait for the watched element to show new text and return that text.
pub async fn wait_for_change(
    browser: &mut dyn BrowserSession,
    watcher: &mut ChangeWatcher,
    policy: &PollPolicy,
) -> Result<String, WaitError> {
    poll_until(browser, watcher, policy).await?;
    Ok(watcher.observed().unwrap_or_default().to_string())
}

pub async fn wait_for_element(
    browser: &mut dyn BrowserSession,
    selector: &str,
    policy: &PollPolicy,
) -> Result<(), WaitError> {
    poll_until(browser, &mut ElementPresent::new(selector), policy).await
}
