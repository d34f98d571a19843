//! Subtitle search abstraction.
//!
//! This module provides a `SubtitleSource` trait for querying subtitle
//! providers (OpenSubtitles, etc.) and a `SubtitleFinder` that fans one
//! search out across all registered sources and selects a single best
//! candidate by language preference.

mod language;
mod opensubtitles;
mod selector;
mod types;

pub use language::{labels_match, provider_code, to_provider_codes};
pub use opensubtitles::OpenSubtitlesSource;
pub use selector::select_best;
pub use types::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::FinderConfig;

/// Fan-out search across registered subtitle sources.
///
/// Sources are queried independently; registration order does not affect
/// which sources are asked, but it breaks ties between equally ranked
/// candidates, so register the most trusted source first.
pub struct SubtitleFinder {
    sources: Vec<Arc<dyn SubtitleSource>>,
    source_timeout: Duration,
}

impl SubtitleFinder {
    /// Create a finder with no sources registered.
    pub fn new(config: &FinderConfig) -> Self {
        Self {
            sources: Vec::new(),
            source_timeout: Duration::from_secs(config.source_timeout_secs),
        }
    }

    /// Register a source. Earlier registrations win selection ties.
    pub fn register(&mut self, source: Arc<dyn SubtitleSource>) {
        self.sources.push(source);
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Find the best subtitle for a video, or none.
    ///
    /// Queries every registered source concurrently, pools the results
    /// in registration order and delegates ranking to the selector. A
    /// single failing or hung source degrades to an empty result set for
    /// that source; the search only fails as a whole when every source
    /// failed and nothing was pooled.
    pub async fn find_best(
        &self,
        video: &Video,
        preferred_languages: &[String],
        blacklist: &Blacklist,
    ) -> Result<Option<SubtitleCandidate>, FinderError> {
        debug!(video = %video.name, sources = self.sources.len(), "Starting subtitle search");

        let (pool, source_errors, succeeded) = self.gather(video, preferred_languages).await;

        if pool.is_empty() {
            if succeeded == 0 && !source_errors.is_empty() {
                return Err(FinderError::AllSourcesFailed {
                    video: video.name.clone(),
                    errors: source_errors,
                });
            }
            debug!(video = %video.name, "No candidates from any source");
            return Ok(None);
        }

        Ok(select_best(pool, preferred_languages, blacklist))
    }

    /// Cancellable variant of [`find_best`](Self::find_best).
    ///
    /// Returns `FinderError::Cancelled` as soon as the shutdown channel
    /// fires, abandoning any in-flight source queries.
    pub async fn find_best_with_shutdown(
        &self,
        video: &Video,
        preferred_languages: &[String],
        blacklist: &Blacklist,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<Option<SubtitleCandidate>, FinderError> {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!(video = %video.name, "Subtitle search received shutdown signal");
                Err(FinderError::Cancelled)
            }
            result = self.find_best(video, preferred_languages, blacklist) => result,
        }
    }

    /// Query all sources concurrently and pool candidates in
    /// registration order.
    async fn gather(
        &self,
        video: &Video,
        preferred_languages: &[String],
    ) -> (Vec<SubtitleCandidate>, HashMap<String, String>, usize) {
        let search_futures: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                async move {
                    let name = source.name().to_string();
                    let result = match timeout(
                        self.source_timeout,
                        source.find_subtitles(video, preferred_languages),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(SourceError::Timeout),
                    };
                    (name, result)
                }
            })
            .collect();

        // join_all keeps registration order, which the selector relies
        // on for tie-breaking.
        let results = futures::future::join_all(search_futures).await;

        let mut pool: Vec<SubtitleCandidate> = Vec::new();
        let mut source_errors: HashMap<String, String> = HashMap::new();
        let mut succeeded = 0usize;

        for (name, result) in results {
            match result {
                Ok(candidates) => {
                    debug!(source = %name, results = candidates.len(), "Source query complete");
                    succeeded += 1;
                    pool.extend(candidates);
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "Source query failed");
                    source_errors.insert(name, e.to_string());
                }
            }
        }

        (pool, source_errors, succeeded)
    }
}
