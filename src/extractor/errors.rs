use thiserror::Error;

use crate::extractor::locator::Descriptor;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("locator has no descriptors")]
    EmptyLocator,

    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("page has no element for descriptor {index} ({descriptor})")]
    StructureNotFound { index: usize, descriptor: Descriptor },
}
