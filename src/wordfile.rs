//! Flat word files: one `word, id` record per line.

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on records written by one call to [`append_words`].
pub const MAX_WORDS_PER_WRITE: usize = 10_000;

/// Ids are drawn from `1..MAX_ID`. Nothing checks them for uniqueness.
pub const MAX_ID: u64 = 9 * 10_u64.pow(10);

const EXTENSION: &str = "txt";

#[derive(Error, Debug)]
pub enum WordFileError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid output name {0:?}")]
    InvalidName(String),
}

/// What [`append_words`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub written: usize,
    /// Words left out because of [`MAX_WORDS_PER_WRITE`].
    pub dropped: usize,
}

/// Words of a word list, in file order.
///
/// Only the text before the first comma is used. Lines without a comma, or
/// with nothing before it, are skipped with a warning.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    let mut words = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match line.split_once(',') {
            Some((word, _id)) if !word.trim().is_empty() => words.push(word.trim().to_string()),
            _ => warn!(line = index + 1, "skipping malformed word list entry {line:?}"),
        }
    }

    words
}

pub fn load_word_list(path: &Path) -> Result<Vec<String>, WordFileError> {
    let contents = fs::read_to_string(path).map_err(|source| WordFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_word_list(&contents))
}

pub fn random_id<R: Rng>(rng: &mut R) -> u64 {
    rng.gen_range(1..MAX_ID)
}

pub fn format_record(word: &str, id: u64) -> String {
    format!("{word}, {id}\n")
}

/// `<dir>/<name>.txt`, ignoring any extension `name` already has.
pub fn output_path(dir: &Path, name: &str) -> Result<PathBuf, WordFileError> {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| WordFileError::InvalidName(name.to_string()))?;

    Ok(dir.join(stem).with_extension(EXTENSION))
}

/// Append up to [`MAX_WORDS_PER_WRITE`] words to `<dir>/<name>.txt`, each with
/// a fresh random id. The directory is created if needed.
pub fn append_words<I, S>(dir: &Path, name: &str, words: I) -> Result<WriteReport, WordFileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    append_words_with(dir, name, words, &mut rand::thread_rng())
}

pub fn append_words_with<I, S, R>(
    dir: &Path,
    name: &str,
    words: I,
    rng: &mut R,
) -> Result<WriteReport, WordFileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    R: Rng,
{
    let path = output_path(dir, name)?;
    let write_error = |source| WordFileError::Write {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(write_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(write_error)?;
    let mut out = BufWriter::new(file);

    let mut written = 0;
    let mut dropped = 0;
    for word in words {
        if written == MAX_WORDS_PER_WRITE {
            dropped += 1;
            continue;
        }
        out.write_all(format_record(word.as_ref(), random_id(rng)).as_bytes())
            .map_err(write_error)?;
        written += 1;
    }
    out.flush().map_err(write_error)?;

    if dropped > 0 {
        warn!(path = %path.display(), dropped, "word limit reached, remaining words not written");
    }
    info!(path = %path.display(), written, "wrote word set");

    Ok(WriteReport {
        path,
        written,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_parse_uses_left_field_in_order() {
        assert_eq!(parse_word_list("alpha, 5\nbeta, 9\n"), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_parse_splits_on_first_comma_only() {
        assert_eq!(parse_word_list("a b, c, 7\n"), vec!["a b"]);
    }

    #[test]
    fn test_parse_skips_malformed_and_blank_lines() {
        let contents = "alpha, 1\nno delimiter here\n\n, 4\r\ngamma,2\r\n";
        assert_eq!(parse_word_list(contents), vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_random_id_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let id = random_id(&mut rng);
            assert!((1..MAX_ID).contains(&id));
        }
    }

    #[test]
    fn test_format_record() {
        assert_eq!(format_record("word", 42), "word, 42\n");
    }

    #[test]
    fn test_output_path_replaces_extension() {
        let dir = Path::new("output");
        assert_eq!(
            output_path(dir, "chinese").unwrap(),
            PathBuf::from("output/chinese.txt")
        );
        assert_eq!(
            output_path(dir, "english.csv").unwrap(),
            PathBuf::from("output/english.txt")
        );
        assert!(matches!(
            output_path(dir, ""),
            Err(WordFileError::InvalidName(_))
        ));
    }
}
