use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::extractor::{errors::ExtractError, locator::Locator};

/// Walk `locator` through `document`.
///
/// Every step but the last narrows to the first matching element inside the
/// previous one. The last step returns all of its matches, in document order.
/// A single-step locator searches the whole document.
pub fn try_extract<'a>(
    document: &'a Html,
    locator: &Locator,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let (last, path) = locator
        .steps()
        .split_last()
        .ok_or(ExtractError::EmptyLocator)?;
    let last_selector = last.selector()?;

    let Some((first, rest)) = path.split_first() else {
        return Ok(document
            .select(&last_selector)
            .filter(|element| last.matches(element.value()))
            .collect());
    };

    let mut container = document
        .select(&first.selector()?)
        .find(|element| first.matches(element.value()))
        .ok_or_else(|| ExtractError::StructureNotFound {
            index: 0,
            descriptor: first.clone(),
        })?;

    for (offset, step) in rest.iter().enumerate() {
        let selector = step.selector()?;
        container = descendants(container, &selector)
            .find(|element| step.matches(element.value()))
            .ok_or_else(|| ExtractError::StructureNotFound {
                index: offset + 1,
                descriptor: step.clone(),
            })?;
    }

    Ok(descendants(container, &last_selector)
        .filter(|element| last.matches(element.value()))
        .collect())
}

/// Matches strictly inside `container`; the container itself never counts.
fn descendants<'a, 'b>(
    container: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    let scope = container.id();
    container
        .select(selector)
        .filter(move |element| element.id() != scope)
}

/// Like [`try_extract`], but a page that is not in the expected shape gives
/// an empty result. The failing descriptor is logged.
pub fn extract<'a>(document: &'a Html, locator: &Locator) -> Vec<ElementRef<'a>> {
    match try_extract(document, locator) {
        Ok(elements) => elements,
        Err(err) => {
            warn!(%locator, "extraction failed: {err}");
            Vec::new()
        }
    }
}

/// Trimmed visible text of every element [`extract`] finds.
pub fn extract_text(document: &Html, locator: &Locator) -> Vec<String> {
    extract(document, locator)
        .into_iter()
        .map(element_text)
        .collect()
}

/// Trimmed text of the first match, if any.
pub fn extract_first_text(document: &Html, locator: &Locator) -> Option<String> {
    extract(document, locator).into_iter().next().map(element_text)
}

/// Elements whose text never renders as page content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Trimmed visible text of `element`, leaving out script and stylesheet
/// bodies.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| NON_CONTENT_TAGS.contains(&parent.value().name()));
        if !hidden {
            text.push_str(fragment);
        }
    }
    text.trim().to_string()
}
