//! The lead import pipeline: decode → detect, or decode → map → evaluate → persist.

pub mod decoder;
pub mod detector;
pub mod engine;
pub mod orchestrator;

pub use orchestrator::{commit, detect, DEFAULT_SOURCE, SAMPLE_ROWS};
