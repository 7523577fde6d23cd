use std::sync::LazyLock;

use deunicode::deunicode_char;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::vocab::WordSet;

static WORD_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w{2,15}").unwrap());

/// Canonical form of the first 2-15 character word run in `token`:
/// lowercase, with Latin letters reduced to plain ASCII. `None` when there is
/// no such run.
pub fn normalize(token: &str) -> Option<String> {
    let run = WORD_RUN_REGEX.find(token)?.as_str();
    let folded = fold(run);

    // Folding can strip a run down to nothing or grow it past 15 (`ß` -> `ss`).
    WORD_RUN_REGEX
        .find(&folded)
        .map(|canonical| canonical.as_str().to_string())
}

pub fn normalize_set<I, S>(tokens: I) -> WordSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| normalize(token.as_ref()))
        .collect()
}

fn fold(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for c in word
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
    {
        match deunicode_char(c).filter(|_| is_latin_letter(c)) {
            Some(ascii) => folded.push_str(&ascii.to_lowercase()),
            None => folded.push(c),
        }
    }
    folded
}

/// Non-ASCII Latin letters that do not decompose into a base letter plus
/// marks: `ł`, `ø`, `đ`, `æ`, `ß` and the like. Other scripts are left alone.
fn is_latin_letter(c: char) -> bool {
    !c.is_ascii()
        && c.is_alphabetic()
        && matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}' | '\u{FB00}'..='\u{FB06}')
}
