//! OpenSubtitles lookup source.
//!
//! Talks to an OpenSubtitles-style gateway: acquire a session token,
//! search by content hash and byte size with an optional language scope,
//! release the token. The token is private to each call; it is released
//! on every exit path, including search failures.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OpenSubtitlesConfig;

use super::language::to_provider_codes;
use super::types::{SourceError, SubtitleCandidate, SubtitleSource, Video};

/// OpenSubtitles source implementation.
pub struct OpenSubtitlesSource {
    client: Client,
    config: OpenSubtitlesConfig,
}

impl OpenSubtitlesSource {
    /// Create a new OpenSubtitlesSource with the given configuration.
    pub fn new(config: OpenSubtitlesConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Build the language scope for the outgoing query.
    ///
    /// Preferred languages with no provider mapping are dropped; when
    /// none map, the query is either issued unscoped (deferring language
    /// filtering to selection) or skipped, depending on configuration.
    fn language_scope(&self, preferred_languages: &[String]) -> Option<String> {
        let codes = to_provider_codes(preferred_languages);
        if codes.is_empty() {
            None
        } else {
            Some(codes.join(","))
        }
    }

    async fn login(&self) -> Result<String, SourceError> {
        let body = json!({
            "username": self.config.username,
            "password": self.config.password,
            "language": "en",
            "useragent": self.config.user_agent,
        });

        let response: LoginResponse = self
            .post_json("login", &body)
            .await
            .map_err(|e| match e {
                SourceError::ApiError(msg) => SourceError::AuthFailed(msg),
                other => other,
            })?;

        if !status_ok(&response.status) {
            return Err(SourceError::AuthFailed(response.status));
        }

        response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SourceError::AuthFailed("no session token in response".to_string()))
    }

    async fn logout(&self, token: &str) {
        let body = json!({ "token": token });
        // Best effort: a leaked provider session expires on its own, but
        // a failed logout is worth a diagnostic.
        if let Err(e) = self.post_json::<StatusResponse>("logout", &body).await {
            debug!(source = self.name(), error = %e, "Session logout failed");
        }
    }

    async fn search_with_token(
        &self,
        token: &str,
        video: &Video,
        preferred_languages: &[String],
    ) -> Result<Vec<SubtitleCandidate>, SourceError> {
        let mut query = json!({
            "moviehash": video.fingerprint.hash,
            "moviebytesize": video.fingerprint.size_bytes.to_string(),
        });

        match self.language_scope(preferred_languages) {
            Some(scope) => {
                query["sublanguageid"] = json!(scope);
            }
            None if self.config.search_all_when_unmapped => {
                debug!(
                    source = self.name(),
                    "No preferred language maps to provider vocabulary, searching unscoped"
                );
            }
            None => {
                debug!(
                    source = self.name(),
                    "No preferred language maps to provider vocabulary, skipping search"
                );
                return Ok(Vec::new());
            }
        }

        let body = json!({
            "token": token,
            "queries": [query],
        });

        let response: SearchResponse = self.post_json("search", &body).await?;

        if !status_ok(&response.status) {
            return Err(SourceError::ApiError(response.status));
        }

        let entries = response.data.unwrap_or_default();
        debug!(
            source = self.name(),
            results = entries.len(),
            video = %video.name,
            "Provider search complete"
        );

        Ok(entries
            .into_iter()
            .map(|entry| SubtitleCandidate {
                video_name: video.name.clone(),
                language: entry.LanguageName,
                locator: entry.ZipDownloadLink,
            })
            .collect())
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else if e.is_connect() {
                    SourceError::ConnectionFailed(e.to_string())
                } else {
                    SourceError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl SubtitleSource for OpenSubtitlesSource {
    fn name(&self) -> &str {
        "opensubtitles"
    }

    async fn find_subtitles(
        &self,
        video: &Video,
        preferred_languages: &[String],
    ) -> Result<Vec<SubtitleCandidate>, SourceError> {
        let token = self.login().await?;

        // The token must be released no matter how the search went.
        let result = self
            .search_with_token(&token, video, preferred_languages)
            .await;
        self.logout(&token).await;

        if let Err(e) = &result {
            warn!(source = self.name(), video = %video.name, error = %e, "Provider search failed");
        }
        result
    }
}

fn status_ok(status: &str) -> bool {
    status.starts_with("200")
}

// Provider gateway response types
#[derive(Debug, Deserialize)]
struct LoginResponse {
    status: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[allow(dead_code)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    data: Option<Vec<SearchEntry>>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct SearchEntry {
    LanguageName: String,
    ZipDownloadLink: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(config: OpenSubtitlesConfig) -> OpenSubtitlesSource {
        OpenSubtitlesSource::new(config)
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let source = source_with(OpenSubtitlesConfig {
            url: "http://localhost:9000/".to_string(),
            ..OpenSubtitlesConfig::default()
        });
        assert_eq!(source.endpoint("search"), "http://localhost:9000/search");
    }

    #[test]
    fn test_language_scope_maps_known_languages() {
        let source = source_with(OpenSubtitlesConfig::default());
        let languages = vec!["English".to_string(), "Finnish".to_string()];
        assert_eq!(source.language_scope(&languages), Some("eng,fin".to_string()));
    }

    #[test]
    fn test_language_scope_drops_unknown() {
        let source = source_with(OpenSubtitlesConfig::default());
        let languages = vec!["English".to_string(), "Klingon".to_string()];
        assert_eq!(source.language_scope(&languages), Some("eng".to_string()));
    }

    #[test]
    fn test_language_scope_none_when_nothing_maps() {
        let source = source_with(OpenSubtitlesConfig::default());
        let languages = vec!["Klingon".to_string()];
        assert_eq!(source.language_scope(&languages), None);
    }

    #[test]
    fn test_status_ok() {
        assert!(status_ok("200 OK"));
        assert!(!status_ok("401 Unauthorized"));
        assert!(!status_ok(""));
    }

    #[test]
    fn test_search_response_without_data() {
        // Providers answer with no data field when nothing matches.
        let parsed: SearchResponse = serde_json::from_str(r#"{"status": "200 OK"}"#).unwrap();
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_search_response_with_entries() {
        let raw = r#"{
            "status": "200 OK",
            "data": [
                {"LanguageName": "English", "ZipDownloadLink": "http://dl/1.zip"},
                {"LanguageName": "Finnish", "ZipDownloadLink": "http://dl/2.zip"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        let data = parsed.data.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].LanguageName, "English");
        assert_eq!(data[1].ZipDownloadLink, "http://dl/2.zip");
    }

    #[test]
    fn test_login_response_missing_token() {
        let parsed: LoginResponse = serde_json::from_str(r#"{"status": "200 OK"}"#).unwrap();
        assert!(parsed.token.is_none());
    }
}
