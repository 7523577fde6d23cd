#![no_main]

use libfuzzer_sys::fuzz_target;
use scraper::Html;

use wordharvest::extractor::{Descriptor, Locator, extract_text};
use wordharvest::vocab::{harvest, normalize_set};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Word harvesting should never panic, and its canonical output must be
    // stable under a second pass.
    let canonical = normalize_set(&harvest(&html));
    assert_eq!(normalize_set(&canonical), canonical);

    let document = Html::parse_document(&html);
    let locator = Locator::single(Descriptor::new("div").attr("class", "content"))
        .then(Descriptor::new("p"));
    let _ = extract_text(&document, &locator);
});
