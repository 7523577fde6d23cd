#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use wordharvest::browser::{BrowserError, BrowserSession};
use wordharvest::session::RunSettings;
use wordharvest::wait::PollPolicy;

pub fn settings(output_dir: &Path) -> RunSettings {
    RunSettings {
        poll: PollPolicy::new(Duration::from_millis(200), Duration::from_millis(5)),
        max_nav_attempts: 2,
        backoff_base: Duration::from_millis(1),
        output_dir: output_dir.to_path_buf(),
    }
}

pub fn article_html(title: &str, body: &str) -> String {
    format!(
        r#"<html><body>
<ul><li id="n-randompage"><a href="/wiki/Special:Random">Random article</a></li></ul>
<h1 id="firstHeading">{title}</h1>
<div class="mw-content-ltr mw-parser-output"><p>{body}</p></div>
</body></html>"#
    )
}

/// Encyclopedia whose random link walks through a fixed list of articles.
pub struct FakeEncyclopedia {
    articles: Vec<(String, String)>,
    current: Option<usize>,
    pub clicks: usize,
}

impl FakeEncyclopedia {
    pub fn new(articles: &[(&str, &str)]) -> Self {
        Self {
            articles: articles
                .iter()
                .map(|(title, body)| (title.to_string(), body.to_string()))
                .collect(),
            current: None,
            clicks: 0,
        }
    }

    fn title(&self) -> String {
        match self.current {
            Some(index) => self.articles[index].0.clone(),
            None => "Main Page".to_string(),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeEncyclopedia {
    async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        self.current = None;
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), BrowserError> {
        self.clicks += 1;
        let next = self.current.map_or(0, |index| index + 1);
        self.current = Some(next % self.articles.len());
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, _text: &str) -> Result<(), BrowserError> {
        Err(BrowserError::NotFound(selector.to_string()))
    }

    async fn clear(&mut self, selector: &str) -> Result<(), BrowserError> {
        Err(BrowserError::NotFound(selector.to_string()))
    }

    async fn read_text(&mut self, _selector: &str) -> Result<String, BrowserError> {
        Ok(self.title())
    }

    async fn current_document(&mut self) -> Result<String, BrowserError> {
        Ok(match self.current {
            Some(index) => article_html(&self.articles[index].0, &self.articles[index].1),
            None => article_html("Main Page", ""),
        })
    }
}

/// Translator backed by a dictionary. Unknown words come back unchanged,
/// and words listed in `stalls` never produce a result.
pub struct FakeTranslator {
    dictionary: HashMap<String, String>,
    stalls: Vec<String>,
    typed: String,
    pub navigations: usize,
    pub submitted: Vec<String>,
}

impl FakeTranslator {
    pub fn new(dictionary: &[(&str, &str)]) -> Self {
        Self {
            dictionary: dictionary
                .iter()
                .map(|(word, translation)| (word.to_string(), translation.to_string()))
                .collect(),
            stalls: Vec::new(),
            typed: String::new(),
            navigations: 0,
            submitted: Vec::new(),
        }
    }

    pub fn stall_on(mut self, word: &str) -> Self {
        self.stalls.push(word.to_string());
        self
    }

    fn result(&self) -> String {
        if self.typed.is_empty() || self.stalls.contains(&self.typed) {
            return String::new();
        }
        self.dictionary
            .get(&self.typed)
            .cloned()
            .unwrap_or_else(|| self.typed.clone())
    }
}

#[async_trait]
impl BrowserSession for FakeTranslator {
    async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        self.navigations += 1;
        self.typed.clear();
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn type_text(&mut self, _selector: &str, text: &str) -> Result<(), BrowserError> {
        self.typed.push_str(text);
        self.submitted.push(text.to_string());
        Ok(())
    }

    async fn clear(&mut self, _selector: &str) -> Result<(), BrowserError> {
        self.typed.clear();
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError> {
        if selector == "textarea" {
            return Ok(self.typed.clone());
        }
        Ok(self.result())
    }

    async fn current_document(&mut self) -> Result<String, BrowserError> {
        Ok(format!(
            r#"<html><body>
<div class="tlid-result-transliteration-container result-transliteration-container transliteration-container">
  <div class="tlid-transliteration-content transliteration-content full">{}</div>
</div>
</body></html>"#,
            self.result()
        ))
    }
}

pub fn recorded_words(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split_once(", ").unwrap().0.to_string())
        .collect()
}
