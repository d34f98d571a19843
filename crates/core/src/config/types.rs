use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Preferred subtitle languages, highest priority first.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub opensubtitles: Option<OpenSubtitlesConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            finder: FinderConfig::default(),
            opensubtitles: None,
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["English".to_string()]
}

/// Finder fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinderConfig {
    /// Per-source query timeout in seconds (default: 30). A source that
    /// exceeds it is treated as having returned no results.
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: default_source_timeout(),
        }
    }
}

fn default_source_timeout() -> u64 {
    30
}

/// OpenSubtitles source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenSubtitlesConfig {
    /// API endpoint (e.g., "http://api.opensubtitles.org")
    #[serde(default = "default_opensubtitles_url")]
    pub url: String,
    /// User agent string registered with the provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Account username (empty for anonymous sessions)
    #[serde(default)]
    pub username: String,
    /// Account password (empty for anonymous sessions)
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// When no preferred language maps to the provider vocabulary, issue
    /// the search unscoped instead of skipping it (default: true).
    #[serde(default = "default_search_all_when_unmapped")]
    pub search_all_when_unmapped: bool,
}

impl Default for OpenSubtitlesConfig {
    fn default() -> Self {
        Self {
            url: default_opensubtitles_url(),
            user_agent: default_user_agent(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
            search_all_when_unmapped: default_search_all_when_unmapped(),
        }
    }
}

fn default_opensubtitles_url() -> String {
    "http://api.opensubtitles.org".to_string()
}

fn default_user_agent() -> String {
    "subscout v0.1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_search_all_when_unmapped() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.languages, vec!["English".to_string()]);
        assert_eq!(config.finder.source_timeout_secs, 30);
        assert!(config.opensubtitles.is_none());
    }

    #[test]
    fn test_opensubtitles_defaults() {
        let config = OpenSubtitlesConfig::default();
        assert_eq!(config.url, "http://api.opensubtitles.org");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.username.is_empty());
        assert!(config.search_all_when_unmapped);
    }

    #[test]
    fn test_config_deserializes_with_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.languages, vec!["English".to_string()]);
        assert_eq!(config.finder.source_timeout_secs, 30);
    }
}
