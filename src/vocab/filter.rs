use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::WordSet;

/// Heading that starts the reference list of an encyclopedia article.
pub const DEFAULT_BOILERPLATE_MARKER: &str = r"References\[edit\]";

static DEFAULT_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_BOILERPLATE_MARKER).unwrap());

static CITATION_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]$").unwrap());

static DIGIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

static INTERIOR_CAPITAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w\p{Lu}\w").unwrap());

static WORD_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w{2,15}$").unwrap());

/// Rules for harvesting words out of article text.
#[derive(Debug, Clone)]
pub struct HarvestRules {
    marker: Regex,
}

impl HarvestRules {
    /// `marker` is a regex; the first token it matches ends the harvest.
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            marker: Regex::new(marker)?,
        })
    }

    pub fn marker(&self) -> &Regex {
        &self.marker
    }
}

impl Default for HarvestRules {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER_REGEX.clone(),
        }
    }
}

pub fn harvest(text: &str) -> WordSet {
    harvest_with(text, &HarvestRules::default())
}

/// Collect the dictionary-like tokens of `text` that come before the
/// boilerplate marker. Tokens keep the case they were found in.
pub fn harvest_with(text: &str, rules: &HarvestRules) -> WordSet {
    text.split_whitespace()
        .take_while(|token| !rules.marker.is_match(token))
        .filter_map(admit)
        .map(str::to_string)
        .collect()
}

/// The admissible core of `token`, with a trailing `[n]` citation removed.
pub fn admit(token: &str) -> Option<&str> {
    let core = CITATION_SUFFIX_REGEX
        .find(token)
        .map_or(token, |citation| &token[..citation.start()]);

    if DIGIT_REGEX.is_match(core) || INTERIOR_CAPITAL_REGEX.is_match(core) {
        return None;
    }

    WORD_SHAPE_REGEX.is_match(core).then_some(core)
}
