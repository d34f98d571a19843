use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one preferred language is set
/// - Finder per-source timeout is not 0
/// - OpenSubtitles URL is not empty when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.languages.is_empty() {
        return Err(ConfigError::ValidationError(
            "languages cannot be empty".to_string(),
        ));
    }

    if config.finder.source_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "finder.source_timeout_secs cannot be 0".to_string(),
        ));
    }

    if let Some(os) = &config.opensubtitles {
        if os.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "opensubtitles.url cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
