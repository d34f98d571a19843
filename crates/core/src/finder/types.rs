//! Types for the subtitle search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Content fingerprint of a video file, used by hash-based sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoFingerprint {
    /// Provider-style content hash (lowercase hex).
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// The video a subtitle is being searched for.
///
/// Owned by the caller and read-only for the duration of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Display name, also used in diagnostics.
    pub name: String,
    /// Content fingerprint for hash-based lookups.
    pub fingerprint: VideoFingerprint,
}

impl Video {
    /// Create a video with the given name and fingerprint.
    pub fn new(name: impl Into<String>, hash: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            fingerprint: VideoFingerprint {
                hash: hash.into(),
                size_bytes,
            },
        }
    }
}

/// One subtitle offering returned by a source.
///
/// Identity is structural: two candidates with the same locator refer to
/// the same remote file, regardless of which source returned them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtitleCandidate {
    /// Name of the video this subtitle was found for.
    pub video_name: String,
    /// Language label as reported by the provider (free text, not
    /// necessarily matching the caller's language vocabulary).
    pub language: String,
    /// Download reference for the remote file.
    pub locator: String,
}

impl SubtitleCandidate {
    pub fn new(
        video_name: impl Into<String>,
        language: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            video_name: video_name.into(),
            language: language.into(),
            locator: locator.into(),
        }
    }
}

/// Candidate locators known to have failed download or extraction.
///
/// Built up by the caller across retry attempts; the selector only
/// consults it, never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blacklist(HashSet<String>);

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a locator as failed.
    pub fn insert(&mut self, locator: impl Into<String>) {
        self.0.insert(locator.into());
    }

    pub fn contains(&self, locator: &str) -> bool {
        self.0.contains(locator)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Errors that can occur inside a single source.
///
/// These never escape the finder's fan-out: a failing source degrades to
/// an empty result set for that source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider API error: {0}")]
    ApiError(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Errors surfaced to the caller of a search.
///
/// "No subtitle found" is not among them: an empty outcome is a normal
/// `Ok(None)` result, never an error.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Subtitle search cancelled")]
    Cancelled,

    #[error("Subtitle search failed for {video}: all sources failed")]
    AllSourcesFailed {
        video: String,
        errors: HashMap<String, String>,
    },
}

/// Trait for subtitle lookup sources.
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Source name for logging/diagnostics.
    fn name(&self) -> &str;

    /// Query this provider for subtitles matching the video.
    ///
    /// `preferred_languages` is the caller's ordered preference list;
    /// sources may use it to scope the outgoing query but must not
    /// filter beyond what the provider protocol requires. Returns an
    /// empty vector when the provider has nothing for this video.
    async fn find_subtitles(
        &self,
        video: &Video,
        preferred_languages: &[String],
    ) -> Result<Vec<SubtitleCandidate>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_serialization() {
        let candidate = SubtitleCandidate::new("Some Movie", "English", "http://example.com/s.zip");

        let json = serde_json::to_string(&candidate).unwrap();
        let parsed: SubtitleCandidate = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.video_name, "Some Movie");
        assert_eq!(parsed.language, "English");
        assert_eq!(parsed.locator, "http://example.com/s.zip");
    }

    #[test]
    fn test_blacklist_from_iterator() {
        let blacklist: Blacklist = ["a", "b"].into_iter().collect();
        assert_eq!(blacklist.len(), 2);
        assert!(blacklist.contains("a"));
        assert!(!blacklist.contains("c"));
    }

    #[test]
    fn test_blacklist_insert() {
        let mut blacklist = Blacklist::new();
        assert!(blacklist.is_empty());

        blacklist.insert("http://example.com/failed.zip");
        assert!(blacklist.contains("http://example.com/failed.zip"));
    }

    #[test]
    fn test_video_constructor() {
        let video = Video::new("Movie", "1abc2def", 735_003_648);
        assert_eq!(video.name, "Movie");
        assert_eq!(video.fingerprint.hash, "1abc2def");
        assert_eq!(video.fingerprint.size_bytes, 735_003_648);
    }

    #[test]
    fn test_candidate_identity_is_structural() {
        let a = SubtitleCandidate::new("Movie", "English", "x");
        let b = SubtitleCandidate::new("Movie", "English", "x");
        assert_eq!(a, b);
    }
}
