use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use scraper::Html;
use tracing::{info, instrument, warn};

use crate::browser::BrowserSession;
use crate::session::{EncyclopediaProfile, RunSettings, navigate_with_retry};
use crate::vocab::{Harvest, HarvestRules, WordSet, harvest_article, normalize_set};
use crate::wait::{ChangeWatcher, WaitError, wait_for_change, wait_for_element};
use crate::wordfile::{append_words, output_path};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Articles whose words were recorded.
    pub articles: usize,
    /// Articles that failed to load or had no content.
    pub skipped: usize,
    pub words_written: usize,
    pub output: PathBuf,
}

/// Visit `articles` random articles and append their canonical words to
/// `<output_dir>/<output_name>.txt`.
///
/// A word is written at most once per run. An article that fails to load is
/// skipped; the run only stops when the encyclopedia cannot be reached again.
#[instrument(skip(browser, profile, settings))]
pub async fn run_harvest(
    browser: &mut dyn BrowserSession,
    profile: &EncyclopediaProfile,
    settings: &RunSettings,
    articles: usize,
    output_name: &str,
) -> Result<HarvestSummary> {
    let rules = profile.harvest_rules()?;
    let mut summary = HarvestSummary {
        output: output_path(&settings.output_dir, output_name)?,
        ..HarvestSummary::default()
    };

    let mut previous_title = open_main_page(browser, profile, settings).await?;
    let mut seen = WordSet::new();

    for index in 1..=articles {
        match next_article(browser, profile, &rules, settings, &previous_title).await {
            Ok((title, Some(harvest))) => {
                previous_title = title;

                let fresh = normalize_set(&harvest.words)
                    .into_iter()
                    .filter(|word| seen.insert(word.clone()))
                    .collect::<Vec<_>>();
                let report = append_words(&settings.output_dir, output_name, &fresh)?;

                info!(
                    article = index,
                    of = articles,
                    title = %harvest.title,
                    raw = harvest.words.len(),
                    new = report.written,
                    "harvested article"
                );
                summary.articles += 1;
                summary.words_written += report.written;
            }
            Ok((title, None)) => {
                warn!(article = index, %title, "article has no content container, skipping");
                previous_title = title;
                summary.skipped += 1;
            }
            Err(WaitError::Browser(e)) if !e.should_retry() => {
                return Err(e).context(format!("browser session lost at article {index}"));
            }
            Err(e) => {
                warn!(article = index, "failed to load article, skipping: {e}");
                summary.skipped += 1;
                previous_title = open_main_page(browser, profile, settings)
                    .await
                    .context("could not return to the main page")?;
            }
        }
    }

    info!(
        articles = summary.articles,
        skipped = summary.skipped,
        words = summary.words_written,
        output = %summary.output.display(),
        "harvest finished"
    );
    Ok(summary)
}

/// Load the main page and return its current title.
async fn open_main_page(
    browser: &mut dyn BrowserSession,
    profile: &EncyclopediaProfile,
    settings: &RunSettings,
) -> Result<String> {
    navigate_with_retry(browser, &profile.main_page, settings)
        .await
        .with_context(|| format!("failed to open {}", profile.main_page))?;
    wait_for_element(browser, &profile.title_selector, &settings.poll).await?;

    match browser.read_text(&profile.title_selector).await {
        Ok(title) => Ok(title.trim().to_string()),
        Err(e) if e.should_retry() => Ok(String::new()),
        Err(e) => bail!("failed to read main page title: {e}"),
    }
}

/// Open a random article and harvest it once its title has rendered.
async fn next_article(
    browser: &mut dyn BrowserSession,
    profile: &EncyclopediaProfile,
    rules: &HarvestRules,
    settings: &RunSettings,
    previous_title: &str,
) -> Result<(String, Option<Harvest>), WaitError> {
    browser.click(&profile.random_article).await?;

    let mut watcher = ChangeWatcher::new(&profile.title_selector, previous_title);
    let title = wait_for_change(browser, &mut watcher, &settings.poll).await?;

    let html = browser.current_document().await?;
    Ok((title, harvest_document(&html, profile, rules)))
}

fn harvest_document(
    html: &str,
    profile: &EncyclopediaProfile,
    rules: &HarvestRules,
) -> Option<Harvest> {
    let document = Html::parse_document(html);
    harvest_article(&document, &profile.title, &profile.content, rules)
}
