//! Mock subtitle source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::finder::{SourceError, SubtitleCandidate, SubtitleSource, Video};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// Name of the video that was searched for.
    pub video_name: String,
    /// The preference list the finder passed down.
    pub preferred_languages: Vec<String>,
}

/// Mock implementation of the SubtitleSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates
/// - Track searches for assertions
/// - Simulate failures and slow providers
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions after registering the source with a finder.
#[derive(Clone)]
pub struct MockSource {
    name: String,
    results: Arc<RwLock<Vec<SubtitleCandidate>>>,
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    fail_message: Arc<RwLock<Option<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl MockSource {
    /// Create a mock source with the given name and no results.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            fail_message: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Builder: candidates to return for every search.
    pub fn with_results(mut self, results: Vec<SubtitleCandidate>) -> Self {
        self.results = Arc::new(RwLock::new(results));
        self
    }

    /// Builder: make every search fail with an API error.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.fail_message = Arc::new(RwLock::new(Some(message.into())));
        self
    }

    /// Builder: delay every search, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Arc::new(RwLock::new(Some(delay)));
        self
    }

    /// Replace the configured results.
    pub async fn set_results(&self, results: Vec<SubtitleCandidate>) {
        *self.results.write().await = results;
    }

    /// Make subsequent searches fail, or clear with `None`.
    pub async fn set_failure(&self, message: Option<String>) {
        *self.fail_message.write().await = message;
    }

    /// Get recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl SubtitleSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_subtitles(
        &self,
        video: &Video,
        preferred_languages: &[String],
    ) -> Result<Vec<SubtitleCandidate>, SourceError> {
        self.searches.write().await.push(RecordedSearch {
            video_name: video.name.clone(),
            preferred_languages: preferred_languages.to_vec(),
        });

        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.fail_message.read().await.clone() {
            return Err(SourceError::ApiError(message));
        }

        Ok(self.results.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_returns_configured_results() {
        let source = MockSource::named("mock");
        source
            .set_results(vec![fixtures::candidate("English", "http://dl/en.zip")])
            .await;

        let candidates = source
            .find_subtitles(&fixtures::video(), &["English".to_string()])
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].locator, "http://dl/en.zip");
    }

    #[tokio::test]
    async fn test_records_searches() {
        let source = MockSource::named("mock");

        source
            .find_subtitles(&fixtures::video(), &["English".to_string()])
            .await
            .unwrap();
        source
            .find_subtitles(&fixtures::video(), &["Finnish".to_string()])
            .await
            .unwrap();

        let searches = source.recorded_searches().await;
        assert_eq!(searches.len(), 2);
        assert_eq!(searches[1].preferred_languages, vec!["Finnish".to_string()]);
        assert_eq!(source.search_count().await, 2);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = MockSource::named("mock");
        source.set_failure(Some("provider down".to_string())).await;

        let result = source.find_subtitles(&fixtures::video(), &[]).await;
        assert!(matches!(result, Err(SourceError::ApiError(_))));

        // Failure persists until cleared.
        let result = source.find_subtitles(&fixtures::video(), &[]).await;
        assert!(result.is_err());

        source.set_failure(None).await;
        let result = source.find_subtitles(&fixtures::video(), &[]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let source = MockSource::named("mock");
        let handle = source.clone();

        source
            .find_subtitles(&fixtures::video(), &[])
            .await
            .unwrap();
        assert_eq!(handle.search_count().await, 1);
    }
}
