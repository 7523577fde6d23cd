use async_trait::async_trait;

use crate::browser::{BrowserError, BrowserSession};
use crate::wait::poll::Condition;

/// Outcome of one look at the watched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeState {
    /// New, non-empty text.
    Changed(String),
    /// Same text as the baseline, empty, or not rendered yet.
    Unchanged,
    /// The element was replaced while it was being read.
    Stale,
}

impl ChangeState {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Reports when the text at `selector` differs from a baseline.
///
/// Built right before polling starts and dropped once it reports a change or
/// the poll times out.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    selector: String,
    baseline: String,
    observed: Option<String>,
}

impl ChangeWatcher {
    pub fn new(selector: impl Into<String>, baseline: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            baseline: baseline.into(),
            observed: None,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Text seen by the last check that reported a change.
    pub fn observed(&self) -> Option<&str> {
        self.observed.as_deref()
    }

    pub fn into_observed(self) -> Option<String> {
        self.observed
    }

    /// Compare text that has already been read against the baseline.
    pub fn compare(&self, current: &str) -> ChangeState {
        let current = current.trim();
        if current.is_empty() || current == self.baseline {
            ChangeState::Unchanged
        } else {
            ChangeState::Changed(current.to_string())
        }
    }

    /// Read the element once. Staleness and absence are "no change yet";
    /// anything else is a real failure.
    pub async fn check(
        &mut self,
        browser: &mut dyn BrowserSession,
    ) -> Result<ChangeState, BrowserError> {
        let state = match browser.read_text(&self.selector).await {
            Ok(current) => self.compare(&current),
            Err(BrowserError::StaleElement(_)) => ChangeState::Stale,
            Err(BrowserError::NotFound(_)) => ChangeState::Unchanged,
            Err(e) => return Err(e),
        };

        if let ChangeState::Changed(text) = &state {
            self.observed = Some(text.clone());
        }
        Ok(state)
    }
}

#[async_trait]
impl Condition for ChangeWatcher {
    async fn satisfied(&mut self, browser: &mut dyn BrowserSession) -> Result<bool, BrowserError> {
        Ok(self.check(browser).await?.is_changed())
    }

    fn describe(&self) -> String {
        format!("text of {:?} to change", self.selector)
    }
}
