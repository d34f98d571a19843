//! Testing utilities and mock implementations.
//!
//! This module provides a mock subtitle source and fixture helpers so
//! finder behavior can be tested without talking to real providers.

mod mock_source;

pub use mock_source::{MockSource, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::finder::{SubtitleCandidate, Video};

    /// A video with a fixed fingerprint, shared across tests.
    pub fn video() -> Video {
        Video::new("The Long Voyage Home", "8e245d9679d31e12", 735_934_464)
    }

    /// Create a candidate for [`video`] with the given language and locator.
    pub fn candidate(language: &str, locator: &str) -> SubtitleCandidate {
        SubtitleCandidate::new(video().name, language, locator)
    }
}
