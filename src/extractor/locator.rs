use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use scraper::{Selector, node::Element};
use serde::{Deserialize, Serialize};

use crate::extractor::errors::ExtractError;

/// Expected value of a single attribute.
///
/// The JSON form follows the nested-list layout used by profile files:
/// a string is an exact value, a list is a set of alternatives, and a
/// boolean asks for the attribute to be present (`true`) or absent (`false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrMatch {
    Exact(String),
    AnyOf(Vec<String>),
    Presence(bool),
}

impl AttrMatch {
    fn matches(&self, name: &str, actual: Option<&str>) -> bool {
        match (self, actual) {
            (Self::Presence(wanted), actual) => actual.is_some() == *wanted,
            (Self::Exact(expected), Some(actual)) => value_matches(name, actual, expected),
            (Self::AnyOf(options), Some(actual)) => {
                options.iter().any(|expected| value_matches(name, actual, expected))
            }
            (_, None) => false,
        }
    }
}

impl From<&str> for AttrMatch {
    fn from(value: &str) -> Self {
        Self::Exact(value.to_string())
    }
}

impl From<String> for AttrMatch {
    fn from(value: String) -> Self {
        Self::Exact(value)
    }
}

impl From<Vec<&str>> for AttrMatch {
    fn from(values: Vec<&str>) -> Self {
        Self::AnyOf(values.into_iter().map(str::to_string).collect())
    }
}

impl From<bool> for AttrMatch {
    fn from(present: bool) -> Self {
        Self::Presence(present)
    }
}

/// `class` is a whitespace-separated list: it matches either the whole
/// (whitespace-normalized) list or any single class in it.
fn value_matches(name: &str, actual: &str, expected: &str) -> bool {
    if name != "class" {
        return actual == expected;
    }

    let expected = expected.split_whitespace().collect::<Vec<_>>();
    let classes = actual.split_whitespace().collect::<Vec<_>>();
    match expected.as_slice() {
        [] => classes.is_empty(),
        [single] => classes.contains(single),
        many => classes == many,
    }
}

/// One level of a nested lookup: a tag name plus attribute constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(String, BTreeMap<String, AttrMatch>)",
    into = "(String, BTreeMap<String, AttrMatch>)"
)]
pub struct Descriptor {
    tag: String,
    attrs: BTreeMap<String, AttrMatch>,
}

impl Descriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Add an attribute constraint.
    pub fn attr(mut self, name: impl Into<String>, expected: impl Into<AttrMatch>) -> Self {
        self.attrs.insert(name.into(), expected.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrMatch> {
        &self.attrs
    }

    /// Tag selector for this step. Attribute constraints are checked
    /// separately by [`Descriptor::matches`].
    pub(crate) fn selector(&self) -> Result<Selector, ExtractError> {
        let valid = !self.tag.is_empty()
            && (self.tag == "*"
                || self
                    .tag
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-'));
        if !valid {
            return Err(ExtractError::InvalidTag(self.tag.clone()));
        }

        Selector::parse(&self.tag).map_err(|_| ExtractError::InvalidTag(self.tag.clone()))
    }

    pub(crate) fn matches(&self, element: &Element) -> bool {
        self.attrs
            .iter()
            .all(|(name, expected)| expected.matches(name, element.attr(name)))
    }
}

impl From<(String, BTreeMap<String, AttrMatch>)> for Descriptor {
    fn from((tag, attrs): (String, BTreeMap<String, AttrMatch>)) -> Self {
        Self { tag, attrs }
    }
}

impl From<Descriptor> for (String, BTreeMap<String, AttrMatch>) {
    fn from(descriptor: Descriptor) -> Self {
        (descriptor.tag, descriptor.attrs)
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for (name, expected) in &self.attrs {
            match expected {
                AttrMatch::Exact(value) => write!(f, "[{name}={value:?}]")?,
                AttrMatch::AnyOf(values) => write!(f, "[{name} in {values:?}]")?,
                AttrMatch::Presence(true) => write!(f, "[{name}]")?,
                AttrMatch::Presence(false) => write!(f, "[!{name}]")?,
            }
        }
        Ok(())
    }
}

/// Path of descriptors from the outermost container to the elements wanted.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Descriptor>", into = "Vec<Descriptor>")]
pub struct Locator {
    steps: Vec<Descriptor>,
}

impl Locator {
    pub fn new(steps: Vec<Descriptor>) -> Result<Self, ExtractError> {
        if steps.is_empty() {
            return Err(ExtractError::EmptyLocator);
        }
        Ok(Self { steps })
    }

    /// Single-step locator.
    pub fn single(descriptor: Descriptor) -> Self {
        Self {
            steps: vec![descriptor],
        }
    }

    /// Append an inner step.
    pub fn then(mut self, descriptor: Descriptor) -> Self {
        self.steps.push(descriptor);
        self
    }

    pub fn steps(&self) -> &[Descriptor] {
        &self.steps
    }
}

impl TryFrom<Vec<Descriptor>> for Locator {
    type Error = ExtractError;

    fn try_from(steps: Vec<Descriptor>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<Locator> for Vec<Descriptor> {
    fn from(locator: Locator) -> Self {
        locator.steps
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                write!(f, " > ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_json_layout() {
        let json = r#"[["div", {"class": "outer"}], ["span", {"id": ["a", "b"], "title": true}]]"#;
        let locator: Locator = serde_json::from_str(json).unwrap();

        assert_eq!(locator.steps().len(), 2);
        assert_eq!(locator.steps()[0], Descriptor::new("div").attr("class", "outer"));
        assert_eq!(
            locator.steps()[1],
            Descriptor::new("span")
                .attr("id", vec!["a", "b"])
                .attr("title", true)
        );
    }

    #[test]
    fn test_empty_locator_rejected() {
        assert_eq!(Locator::new(Vec::new()), Err(ExtractError::EmptyLocator));
        assert!(serde_json::from_str::<Locator>("[]").is_err());
    }

    #[test]
    fn test_class_matches_single_or_whole_list() {
        let attr = AttrMatch::from("b");
        assert!(attr.matches("class", Some("a b  c")));
        assert!(!attr.matches("class", Some("abc")));

        let whole = AttrMatch::from("a  b c");
        assert!(whole.matches("class", Some("a b c")));
        assert!(!whole.matches("class", Some("a b")));
    }

    #[test]
    fn test_presence_and_absence() {
        assert!(AttrMatch::Presence(true).matches("href", Some("")));
        assert!(!AttrMatch::Presence(true).matches("href", None));
        assert!(AttrMatch::Presence(false).matches("href", None));
        assert!(!AttrMatch::Exact("x".into()).matches("id", None));
    }

    #[test]
    fn test_invalid_tag() {
        assert!(matches!(
            Descriptor::new("div > p").selector(),
            Err(ExtractError::InvalidTag(_))
        ));
        assert!(Descriptor::new("h1").selector().is_ok());
    }

    #[test]
    fn test_display() {
        let locator = Locator::new(vec![
            Descriptor::new("div").attr("role", "main"),
            Descriptor::new("p"),
        ])
        .unwrap();
        assert_eq!(locator.to_string(), r#"div[role="main"] > p"#);
    }
}
