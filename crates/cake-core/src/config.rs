use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub greeting: GreetingConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingConfig {
    /// Name shown in the banner and the celebration overlay.
    #[serde(default = "default_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Whether to open the microphone at startup. The card still works
    /// click-only when disabled.
    #[serde(default = "default_audio_enabled")]
    pub enabled: bool,
    /// Normalized loudness [0, 1] above which a breath is registered.
    #[serde(default = "default_blow_threshold")]
    pub blow_threshold: f32,
    /// How long the blowing pulse stays high after the last crossing.
    #[serde(default = "default_blow_cooldown_ms")]
    pub blow_cooldown_ms: u64,
}

impl AudioConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.blow_cooldown_ms)
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_audio_enabled(),
            blow_threshold: default_blow_threshold(),
            blow_cooldown_ms: default_blow_cooldown_ms(),
        }
    }
}

fn default_name() -> String {
    "DEVIKA".to_string()
}

fn default_audio_enabled() -> bool {
    true
}

fn default_blow_threshold() -> f32 {
    0.15
}

fn default_blow_cooldown_ms() -> u64 {
    1000
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> std::path::PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            greeting: GreetingConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.audio.enabled);
        assert_eq!(config.audio.blow_threshold, 0.15);
        assert_eq!(config.audio.blow_cooldown_ms, 1000);
        assert_eq!(config.audio.cooldown(), Duration::from_millis(1000));
        assert!(!config.greeting.name.is_empty());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[greeting]\nname = \"ANA\"\n").unwrap();
        assert_eq!(config.greeting.name, "ANA");
        assert!(config.audio.enabled);
        assert_eq!(config.audio.blow_threshold, 0.15);
    }

    #[test]
    fn test_config_round_trips() {
        let mut config = Config::default();
        config.audio.blow_threshold = 0.25;
        config.audio.enabled = false;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.audio.blow_threshold, 0.25);
        assert!(!back.audio.enabled);
        assert_eq!(back.greeting.name, config.greeting.name);
    }
}
