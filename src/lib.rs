pub mod browser;
pub mod config;
pub mod extractor;
pub mod session;
pub mod vocab;
pub mod wait;
pub mod wordfile;
