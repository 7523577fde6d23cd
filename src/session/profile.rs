use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::extractor::{Descriptor, Locator};
use crate::vocab::{DEFAULT_BOILERPLATE_MARKER, HarvestRules};

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid boilerplate marker: {0}")]
    InvalidMarker(#[from] regex::Error),
}

/// Where things are on the encyclopedia.
///
/// Browser selectors are CSS; `title` and `content` are structural locators
/// applied to the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncyclopediaProfile {
    pub main_page: String,
    /// Link that opens a random article.
    pub random_article: String,
    /// Element whose text changes when a new article has rendered.
    pub title_selector: String,
    pub title: Locator,
    pub content: Locator,
    /// Regex for the token that ends the harvestable part of an article.
    pub boilerplate_marker: String,
}

impl Default for EncyclopediaProfile {
    fn default() -> Self {
        Self {
            main_page: "https://en.wikipedia.org/wiki/Main_Page".into(),
            random_article: "li#n-randompage a".into(),
            title_selector: "h1#firstHeading".into(),
            title: Locator::single(Descriptor::new("h1").attr("id", "firstHeading")),
            content: Locator::single(Descriptor::new("div").attr("class", "mw-content-ltr")),
            boilerplate_marker: DEFAULT_BOILERPLATE_MARKER.into(),
        }
    }
}

impl EncyclopediaProfile {
    pub fn harvest_rules(&self) -> Result<HarvestRules, ProfileError> {
        Ok(HarvestRules::new(&self.boilerplate_marker)?)
    }
}

/// Where things are on the translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorProfile {
    pub url: String,
    /// Clicked in order to pick the source language. All must succeed.
    pub source_language: Vec<String>,
    /// Clicked in order to pick the target language. Failures are logged and
    /// ignored, since the page may already be set up.
    pub target_language: Vec<String>,
    /// Text area the word is typed into.
    pub input: String,
    /// Element watched for the translation to appear.
    pub result: String,
    /// Structural path to the translated text inside the document.
    pub result_text: Locator,
}

impl Default for TranslatorProfile {
    fn default() -> Self {
        let result_container = "tlid-result-transliteration-container result-transliteration-container transliteration-container";
        Self {
            url: "https://translate.google.com/".into(),
            source_language: vec![
                "div.sl-wrap > div > div:nth-child(2) > div[value='en']".into(),
            ],
            target_language: vec![
                "div.tl-wrap > div[aria-label='More']".into(),
                "div.language_list_item_wrapper-zh-TW".into(),
            ],
            input: "textarea".into(),
            result: "div.tlid-result-transliteration-container".into(),
            result_text: Locator::single(Descriptor::new("div").attr("class", result_container))
                .then(Descriptor::new("div").attr(
                    "class",
                    "tlid-transliteration-content transliteration-content full",
                )),
        }
    }
}

/// Both site profiles. Any field missing from a profile file keeps its
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfiles {
    pub encyclopedia: EncyclopediaProfile,
    pub translator: TranslatorProfile,
}

impl SiteProfiles {
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profiles: Self = serde_json::from_str(json)?;
        profiles.validate()?;
        Ok(profiles)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let json = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for url in [&self.encyclopedia.main_page, &self.translator.url] {
            Url::parse(url).map_err(|source| ProfileError::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }
        self.encyclopedia.harvest_rules()?;
        Ok(())
    }
}
