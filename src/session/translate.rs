use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use scraper::Html;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::extractor::{Locator, extract_text};
use crate::session::{RunSettings, TranslatorProfile, navigate_with_retry};
use crate::vocab::{WordSet, normalize_set};
use crate::wait::{ChangeWatcher, WaitError, wait_for_change, wait_for_element};
use crate::wordfile::{append_words, output_path};

/// How a word list is split up. Each section is written out as soon as it
/// is done and the translator is reloaded before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPlan {
    pub sections: usize,
    /// Sections before this one are skipped, for resuming a run.
    pub start_section: usize,
}

impl SectionPlan {
    pub fn new(sections: usize, start_section: usize) -> Self {
        Self {
            sections,
            start_section,
        }
    }

    /// Words per section, so that `sections` sections cover `total` words.
    pub fn section_len(&self, total: usize) -> usize {
        total.div_ceil(self.sections.max(1)).max(1)
    }
}

impl Default for SectionPlan {
    fn default() -> Self {
        Self::new(100, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    pub submitted: usize,
    pub translated: usize,
    /// Words the translator returned unchanged.
    pub untranslated: usize,
    /// Words that timed out or hit a browser error.
    pub failed: usize,
    pub sections: usize,
    pub words_written: usize,
    pub output: PathBuf,
}

/// Pick the word to record for `source`.
///
/// `None` when the translator echoed the word back. A translation of several
/// whitespace-separated words yields one of them at random.
pub fn choose_translation<R: Rng>(source: &str, translation: &str, rng: &mut R) -> Option<String> {
    let translation = translation.trim();
    if translation.is_empty() || translation.to_lowercase() == source.trim().to_lowercase() {
        return None;
    }

    translation
        .split_whitespace()
        .collect::<Vec<_>>()
        .choose(rng)
        .map(|word| word.to_string())
}

/// Translate `words` section by section, appending the canonical
/// translations to `<output_dir>/<output_name>.txt`.
pub async fn run_translation(
    browser: &mut dyn BrowserSession,
    profile: &TranslatorProfile,
    settings: &RunSettings,
    words: &[String],
    plan: SectionPlan,
    output_name: &str,
) -> Result<TranslationSummary> {
    run_translation_with(
        browser,
        profile,
        settings,
        words,
        plan,
        output_name,
        &mut StdRng::from_entropy(),
    )
    .await
}

pub async fn run_translation_with<R: Rng + Send>(
    browser: &mut dyn BrowserSession,
    profile: &TranslatorProfile,
    settings: &RunSettings,
    words: &[String],
    plan: SectionPlan,
    output_name: &str,
    rng: &mut R,
) -> Result<TranslationSummary> {
    let mut summary = TranslationSummary {
        output: output_path(&settings.output_dir, output_name)?,
        ..TranslationSummary::default()
    };
    if words.is_empty() {
        info!("word list is empty, nothing to translate");
        return Ok(summary);
    }

    let section_len = plan.section_len(words.len());
    let sections = words.chunks(section_len).collect::<Vec<_>>();
    if plan.start_section >= sections.len() {
        warn!(
            start_section = plan.start_section,
            sections = sections.len(),
            "start section is past the end of the word list"
        );
        return Ok(summary);
    }
    info!(
        words = words.len(),
        sections = sections.len(),
        section_len,
        start_section = plan.start_section,
        "starting translation"
    );

    open_translator(browser, profile, settings).await?;

    for (section, chunk) in sections.iter().enumerate().skip(plan.start_section) {
        if section > plan.start_section {
            open_translator(browser, profile, settings)
                .await
                .with_context(|| format!("failed to reload translator before section {section}"))?;
        }

        let mut translated = WordSet::new();
        let mut baseline = String::new();

        for (offset, word) in chunk.iter().enumerate() {
            let index = section * section_len + offset;
            summary.submitted += 1;

            match translate_word(browser, profile, settings, word, &baseline).await {
                Ok((observed, text)) => {
                    baseline = observed;
                    match choose_translation(word, &text, rng) {
                        Some(chosen) => {
                            info!(index, word = %word, translation = %chosen, "translated");
                            translated.insert(chosen);
                            summary.translated += 1;
                        }
                        None => {
                            info!(index, word = %word, "no translation, skipping");
                            summary.untranslated += 1;
                        }
                    }
                }
                Err(WaitError::Browser(e)) if !e.should_retry() => {
                    return Err(e).context(format!("browser session lost at word {index}"));
                }
                Err(e) => {
                    warn!(index, section, word = %word, "translation failed, skipping: {e}");
                    summary.failed += 1;
                }
            }

            if let Err(e) = browser.clear(&profile.input).await {
                if !e.should_retry() {
                    return Err(e).context("failed to clear translator input");
                }
                warn!(index, "failed to clear translator input: {e}");
            }
        }

        let report = append_words(&settings.output_dir, output_name, normalize_set(&translated))?;
        summary.sections += 1;
        summary.words_written += report.written;
        info!(
            section = section + 1,
            of = sections.len(),
            written = report.written,
            "section finished"
        );
    }

    info!(
        submitted = summary.submitted,
        translated = summary.translated,
        untranslated = summary.untranslated,
        failed = summary.failed,
        words = summary.words_written,
        output = %summary.output.display(),
        "translation finished"
    );
    Ok(summary)
}

/// Load the translator and pick the language pair.
async fn open_translator(
    browser: &mut dyn BrowserSession,
    profile: &TranslatorProfile,
    settings: &RunSettings,
) -> Result<()> {
    navigate_with_retry(browser, &profile.url, settings)
        .await
        .with_context(|| format!("failed to open {}", profile.url))?;

    for selector in &profile.source_language {
        wait_for_element(browser, selector, &settings.poll)
            .await
            .with_context(|| format!("source language control {selector:?} never appeared"))?;
        browser
            .click(selector)
            .await
            .with_context(|| format!("failed to select source language via {selector:?}"))?;
    }

    for selector in &profile.target_language {
        if let Err(e) = browser.click(selector).await {
            warn!(selector = %selector, "could not click target language control: {e}");
        }
    }

    Ok(())
}

/// Submit one word. Returns the watched element's new text and the
/// translation read from the document.
async fn translate_word(
    browser: &mut dyn BrowserSession,
    profile: &TranslatorProfile,
    settings: &RunSettings,
    word: &str,
    baseline: &str,
) -> Result<(String, String), WaitError> {
    wait_for_element(browser, &profile.input, &settings.poll).await?;
    browser.type_text(&profile.input, word).await?;

    let mut watcher = ChangeWatcher::new(&profile.result, baseline);
    let observed = wait_for_change(browser, &mut watcher, &settings.poll).await?;

    let html = browser.current_document().await?;
    let text = read_result(&html, &profile.result_text);
    if text.is_empty() {
        return Ok((observed.clone(), observed));
    }
    Ok((observed, text))
}

fn read_result(html: &str, locator: &Locator) -> String {
    let document = Html::parse_document(html);
    extract_text(&document, locator).join("")
}
