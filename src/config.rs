use crate::{
    CONFIG_DIRECTORY, CONFIG_FILE, expand_tilde,
    player::{HttpMetadata, MetadataSource, RotatingMetadata},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::info;

/// Station settings read at startup.
///
/// Every field has a default, so a config file only needs the values it
/// wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub station_stream_url: String,
    pub metadata_url: Option<String>,
    pub fallback_stream_url: Option<String>,

    pub station_name: String,
    pub station_slogan: String,
    pub default_artwork: String,

    pub max_retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub auto_reconnect: bool,

    pub default_volume: f32,
    pub metadata_poll_secs: u64,

    pub catalog_path: Option<PathBuf>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            station_stream_url: "https://example.com:8000/stream".to_string(),
            metadata_url: None,
            fallback_stream_url: Some("https://backup.example.com:8000/stream".to_string()),

            station_name: "itsyourradio".to_string(),
            station_slogan: "Your Music, Your Way".to_string(),
            default_artwork: "/images/default-album-art.jpg".to_string(),

            max_retry_attempts: 5,
            retry_delay_ms: 3000,
            auto_reconnect: true,

            default_volume: 0.8,
            metadata_poll_secs: 30,

            catalog_path: None,
        }
    }
}

impl StreamConfig {
    /// Reads the user's config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str::<StreamConfig>(&file_str)
            .with_context(|| format!("parsing {}", path.display()))?;

        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn metadata_interval(&self) -> Duration {
        Duration::from_secs(self.metadata_poll_secs.max(1))
    }

    /// Url a reconnect attempt targets
    pub fn reconnect_url(&self) -> &str {
        self.fallback_stream_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.station_stream_url)
    }

    pub fn metadata_source(&self) -> Result<Arc<dyn MetadataSource>> {
        Ok(match &self.metadata_url {
            Some(url) => Arc::new(HttpMetadata::new(url, &self.default_artwork)?),
            None => Arc::new(RotatingMetadata::with_default_rotation(
                &self.default_artwork,
            )),
        })
    }

    pub fn catalog_path(&self) -> Result<Option<PathBuf>> {
        self.catalog_path.as_ref().map(expand_tilde).transpose()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_station_settings() {
        let config = StreamConfig::default();
        assert_eq!(config.default_volume, 0.8);
        assert_eq!(config.max_retry_attempts, 5);
        assert_eq!(config.retry_delay(), Duration::from_millis(3000));
        assert_eq!(config.metadata_interval(), Duration::from_secs(30));
        assert!(config.auto_reconnect);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
station_stream_url = "https://radio.test/live"
default_volume = 0.5
max_retry_attempts = 2
"#
        )
        .unwrap();

        let config = StreamConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.station_stream_url, "https://radio.test/live");
        assert_eq!(config.default_volume, 0.5);
        assert_eq!(config.max_retry_attempts, 2);
        assert_eq!(config.station_name, "itsyourradio");
        assert_eq!(config.retry_delay_ms, 3000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_volume = \"loud\"").unwrap();

        let err = StreamConfig::load_from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn reconnect_prefers_fallback_url() {
        let mut config = StreamConfig::default();
        assert_eq!(config.reconnect_url(), "https://backup.example.com:8000/stream");

        config.fallback_stream_url = Some(String::new());
        assert_eq!(config.reconnect_url(), "https://example.com:8000/stream");

        config.fallback_stream_url = None;
        assert_eq!(config.reconnect_url(), "https://example.com:8000/stream");
    }

    #[test]
    fn zero_poll_interval_is_raised() {
        let config = StreamConfig {
            metadata_poll_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.metadata_interval(), Duration::from_secs(1));
    }
}
