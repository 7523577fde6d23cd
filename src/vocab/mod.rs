//! Vocabulary harvesting: pick dictionary-like words out of page text and
//! fold them into canonical form.

pub mod filter;
pub mod normalize;

use std::collections::BTreeSet;

use scraper::Html;

use crate::extractor::{Locator, extract_first_text};

pub use filter::{DEFAULT_BOILERPLATE_MARKER, HarvestRules, admit, harvest, harvest_with};
pub use normalize::{normalize, normalize_set};

/// Unique words. Sorted so that output files are reproducible.
pub type WordSet = BTreeSet<String>;

/// Raw words of one article, with the article title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    pub title: String,
    pub words: WordSet,
}

/// Harvest the main content of an article page.
///
/// Returns `None` when the page has no content container. A missing title
/// only leaves `title` empty.
pub fn harvest_article(
    document: &Html,
    title: &Locator,
    content: &Locator,
    rules: &HarvestRules,
) -> Option<Harvest> {
    let text = extract_first_text(document, content)?;
    let title = extract_first_text(document, title).unwrap_or_default();

    Some(Harvest {
        title,
        words: harvest_with(&text, rules),
    })
}
