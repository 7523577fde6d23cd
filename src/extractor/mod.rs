//! Structural lookups over a rendered page.
//!
//! A [`Locator`] names a path of nested containers by tag and attributes,
//! outermost first. Pages whose markup does not have that shape produce an
//! empty result instead of an error, so a caller can retry or skip.

pub mod errors;
pub mod locator;
pub mod structure;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;
pub use locator::{AttrMatch, Descriptor, Locator};
pub use structure::{element_text, extract, extract_first_text, extract_text, try_extract};
