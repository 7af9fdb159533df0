use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::pass::{ObserverCoordinates, PassError};
use crate::playback::DEFAULT_ANIMATION_CAP;
use crate::scene::{SceneConfig, SvgRenderer, DEFAULT_OBSERVER_RADIUS};
use crate::trajectory::{TrajectoryGenerator, DEFAULT_SATELLITE_RADIUS, DEFAULT_SEGMENTS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid observer: {0}")]
    Observer(PassError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: ObserverCoordinates,
    pub playback: PlaybackConfig,
    pub trajectory: TrajectoryConfig,
    pub web: WebConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Longest real-time animation for a pass, e.g. `15s`.
    #[serde(deserialize_with = "deserialize_duration")]
    pub cap: Duration,
    /// Frame period of the view host, e.g. `16ms`.
    #[serde(deserialize_with = "deserialize_duration")]
    pub frame_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_ANIMATION_CAP,
            frame_interval: Duration::from_millis(16),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    pub segments: usize,
    pub satellite_radius: f64,
    pub observer_radius: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            satellite_radius: DEFAULT_SATELLITE_RADIUS,
            observer_radius: DEFAULT_OBSERVER_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let renderer = SvgRenderer::default();
        Self {
            width: renderer.width,
            height: renderer.height,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.observer.validate().map_err(ConfigError::Observer)?;
        Ok(config)
    }

    /// Config file if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn scene(&self) -> SceneConfig {
        SceneConfig {
            generator: TrajectoryGenerator::new(
                self.trajectory.segments,
                self.trajectory.satellite_radius,
            ),
            observer_radius: self.trajectory.observer_radius,
            animation_cap: self.playback.cap,
        }
    }

    pub fn renderer(&self) -> SvgRenderer {
        SvgRenderer::new(self.view.width, self.view.height)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_str("{}").unwrap();
        assert_eq!(config.playback.cap, Duration::from_secs(15));
        assert_eq!(config.playback.frame_interval, Duration::from_millis(16));
        assert_eq!(config.trajectory.segments, 100);
        assert_eq!(config.web.bind, "127.0.0.1:8080");
        assert_eq!(config.scene(), SceneConfig::default());
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
observer:
  latitude: 41.702
  longitude: -76.014
  altitude: 250
playback:
  cap: 30s
  frame_interval: 33ms
trajectory:
  segments: 200
  satellite_radius: 1.5
web:
  bind: 0.0.0.0:9000
view:
  width: 800
  height: 600
"#;
        let config = Config::from_str(yaml).unwrap();
        assert_eq!(config.observer.latitude, 41.702);
        assert_eq!(config.observer.altitude, 250.0);
        assert_eq!(config.playback.cap, Duration::from_secs(30));
        assert_eq!(config.playback.frame_interval, Duration::from_millis(33));
        assert_eq!(config.trajectory.observer_radius, 1.01);

        let scene = config.scene();
        assert_eq!(scene.generator, TrajectoryGenerator::new(200, 1.5));
        assert_eq!(config.renderer().width, 800);
    }

    #[test]
    fn test_bad_duration() {
        let err = Config::from_str("playback:\n  cap: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_observer_is_validated() {
        let err = Config::from_str("observer:\n  latitude: 95\n  longitude: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Observer(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/pass-viz.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
