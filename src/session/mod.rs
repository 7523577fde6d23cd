//! Batch runs against a live browser session.
//!
//! The session is owned by the caller and lent to each step; nothing here
//! keeps a page handle between steps.

pub mod harvest;
pub mod profile;
pub mod translate;

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::browser::{BrowserError, BrowserSession};
use crate::config::Config;
use crate::wait::{PollPolicy, calculate_backoff_delay};

pub use harvest::{HarvestSummary, run_harvest};
pub use profile::{EncyclopediaProfile, ProfileError, SiteProfiles, TranslatorProfile};
pub use translate::{
    SectionPlan, TranslationSummary, choose_translation, run_translation, run_translation_with,
};

/// Knobs shared by every run, taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub poll: PollPolicy,
    pub max_nav_attempts: u32,
    pub backoff_base: Duration,
    pub output_dir: PathBuf,
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll: PollPolicy::new(config.timeout(), config.poll_interval()),
            max_nav_attempts: config.max_nav_attempts(),
            backoff_base: config.backoff_base(),
            output_dir: config.output_dir().to_path_buf(),
        }
    }
}

/// Navigate, retrying transient failures with backoff.
pub async fn navigate_with_retry(
    browser: &mut dyn BrowserSession,
    url: &str,
    settings: &RunSettings,
) -> Result<(), BrowserError> {
    let mut attempt = 0;
    loop {
        match browser.navigate(url).await {
            Ok(()) => return Ok(()),
            Err(e) if e.should_retry() && attempt + 1 < settings.max_nav_attempts => {
                let delay = calculate_backoff_delay(attempt, settings.backoff_base);
                warn!(
                    url,
                    attempt = attempt + 1,
                    max_attempts = settings.max_nav_attempts,
                    "navigation failed, retrying in {}ms: {e}",
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// The result of a run once its browser has been closed. A close failure is
/// logged and never replaces the run's own result.
pub fn settle<T>(outcome: anyhow::Result<T>, closed: Result<(), BrowserError>) -> anyhow::Result<T> {
    if let Err(e) = closed {
        warn!("failed to close browser: {e}");
    }
    outcome
}

#[cfg(test)]
pub(crate) fn test_settings(output_dir: impl Into<PathBuf>) -> RunSettings {
    RunSettings {
        poll: PollPolicy::new(Duration::from_millis(100), Duration::from_millis(5)),
        max_nav_attempts: 3,
        backoff_base: Duration::from_millis(1),
        output_dir: output_dir.into(),
    }
}
