pub mod config;
pub mod finder;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FinderConfig,
    OpenSubtitlesConfig,
};
pub use finder::{
    Blacklist, FinderError, OpenSubtitlesSource, SourceError, SubtitleCandidate, SubtitleFinder,
    SubtitleSource, Video, VideoFingerprint,
};
