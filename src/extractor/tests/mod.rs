use std::fs;

use scraper::Html;

use crate::extractor::{
    Descriptor, ExtractError, Locator, extract, extract_first_text, extract_text, try_extract,
};

fn fixture(name: &str) -> Html {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture");
    Html::parse_document(&html)
}

fn result_locator() -> Locator {
    Locator::new(vec![
        Descriptor::new("div").attr(
            "class",
            "tlid-result-transliteration-container result-transliteration-container transliteration-container",
        ),
        Descriptor::new("div").attr(
            "class",
            "tlid-transliteration-content transliteration-content full",
        ),
    ])
    .unwrap()
}

#[test]
fn test_single_step_returns_all_matches_in_order() {
    let document = Html::parse_document(
        r#"<div class="x">one</div><p class="x">no</p><div class="y x">two</div><div>no</div>
           <section><div class="x">three</div></section>"#,
    );
    let locator = Locator::single(Descriptor::new("div").attr("class", "x"));

    assert_eq!(extract_text(&document, &locator), vec!["one", "two", "three"]);
}

#[test]
fn test_nested_walk_only_searches_inside_container() {
    let document = fixture("translator.html");

    assert_eq!(extract_text(&document, &result_locator()), vec!["你好"]);
}

#[test]
fn test_missing_first_container_is_empty() {
    let document = Html::parse_document("<div class='other'><span>text</span></div>");
    let locator = Locator::new(vec![
        Descriptor::new("div").attr("role", "main"),
        Descriptor::new("span"),
    ])
    .unwrap();

    assert!(extract(&document, &locator).is_empty());
    assert!(extract_text(&document, &locator).is_empty());
    assert_eq!(
        try_extract(&document, &locator).unwrap_err(),
        ExtractError::StructureNotFound {
            index: 0,
            descriptor: Descriptor::new("div").attr("role", "main"),
        }
    );
}

#[test]
fn test_missing_intermediate_container_reports_its_index() {
    let document = Html::parse_document(
        r#"<div role="main"><section><p>deep</p></section></div>"#,
    );
    let locator = Locator::new(vec![
        Descriptor::new("div").attr("role", "main"),
        Descriptor::new("article"),
        Descriptor::new("p"),
    ])
    .unwrap();

    match try_extract(&document, &locator) {
        Err(ExtractError::StructureNotFound { index, descriptor }) => {
            assert_eq!(index, 1);
            assert_eq!(descriptor.tag(), "article");
        }
        other => panic!("Expected structure-not-found, got {other:?}"),
    }
}

#[test]
fn test_intermediate_step_takes_first_match() {
    let document = Html::parse_document(
        r#"<ul class="list"><li>a</li><li>b</li></ul><ul class="list"><li>c</li></ul>"#,
    );
    let locator = Locator::new(vec![
        Descriptor::new("ul").attr("class", "list"),
        Descriptor::new("li"),
    ])
    .unwrap();

    assert_eq!(extract_text(&document, &locator), vec!["a", "b"]);
}

#[test]
fn test_same_tag_container_does_not_match_itself() {
    let document = Html::parse_document(
        r#"<div class="outer"><div class="inner">x</div></div>"#,
    );
    let locator = Locator::new(vec![
        Descriptor::new("div").attr("class", "outer"),
        Descriptor::new("div"),
    ])
    .unwrap();

    assert_eq!(extract_text(&document, &locator), vec!["x"]);
}

#[test]
fn test_article_title_and_content() {
    let document = fixture("article.html");

    let title = Locator::single(Descriptor::new("h1").attr("id", "firstHeading"));
    assert_eq!(
        extract_first_text(&document, &title),
        Some("Lighthouse keeper".to_string())
    );

    let content = Locator::single(Descriptor::new("div").attr("class", "mw-content-ltr"));
    let text = extract_first_text(&document, &content).unwrap();
    assert!(text.starts_with("A lighthouse keeper"));
    assert!(text.contains("References[edit]"));
}

#[test]
fn test_invalid_tag_is_empty() {
    let document = fixture("article.html");
    let locator = Locator::single(Descriptor::new("h1#firstHeading"));

    assert!(extract(&document, &locator).is_empty());
    assert!(matches!(
        try_extract(&document, &locator),
        Err(ExtractError::InvalidTag(_))
    ));
}

#[test]
fn test_text_skips_script_and_style_bodies() {
    let document = fixture("styled_article.html");
    let locator = Locator::single(Descriptor::new("div").attr("class", "mw-content-ltr"));

    let text = extract_first_text(&document, &locator).unwrap();
    assert!(text.starts_with("For the bird see seabird."));
    assert!(text.contains("Terns are slender seabirds."));
    assert!(text.ends_with("They dive for fish."));
    for leaked in ["hatnote", "italic", "config", "var", "tracking"] {
        assert!(!text.contains(leaked), "leaked {leaked:?} into {text:?}");
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*", tag in "[a-z]{1,6}", class in "[a-z ]{0,8}") {
            let document = Html::parse_document(&html);
            let locator = Locator::new(vec![
                Descriptor::new(tag.clone()).attr("class", class.as_str()),
                Descriptor::new(tag),
            ]).unwrap();
            let _ = extract_text(&document, &locator);
        }
    }
}
